use sqlx::{Error as SqlxError, PgExecutor};
use tracing::instrument;

use crate::database::aggregate::{assemble_summaries, attach_tags, resource_ids};
use crate::database::connection::DbConnection;
use crate::error::{Entity, RequestError};
use crate::models::feedback::{CommentResponse, FeedbackTally, FeedbackTallyRow};
use crate::models::resource::{
    Resource, ResourceDetail, ResourceId, ResourceSummary, ResourceWithRecommenderRow,
    ResourceWithTags,
};
use crate::models::tag::{ResourceTagRow, TagName};
use crate::models::user::{User, UserId};

impl DbConnection {
    pub async fn list_users(&self) -> Result<Vec<User>, SqlxError> {
        select_users(self.pool()).await
    }

    pub async fn list_tag_names(&self) -> Result<Vec<TagName>, SqlxError> {
        select_tag_names(self.pool()).await
    }

    /// All resources, newest first, with their tags and feedback tally.
    pub async fn list_resources(&self) -> Result<Vec<ResourceSummary>, SqlxError> {
        let mut transaction = self.begin_snapshot().await?;
        let resources = select_resources(transaction.as_mut()).await?;
        let ids = resource_ids(&resources);
        let tags = select_tags_for_resources(transaction.as_mut(), &ids).await?;
        let tallies = select_feedback_tallies(transaction.as_mut(), &ids).await?;
        transaction.commit().await?;
        Ok(assemble_summaries(resources, tags, &tallies))
    }

    pub async fn get_resource(&self, resource_id: ResourceId) -> Result<ResourceDetail, RequestError> {
        let mut transaction = self.begin_snapshot().await?;
        let row = select_resource_with_recommender(transaction.as_mut(), resource_id)
            .await?
            .ok_or(RequestError::NotFound(Entity::Resource))?;
        let tags = select_tags_for_resources(transaction.as_mut(), &[resource_id]).await?;
        let tally = select_feedback_tallies(transaction.as_mut(), &[resource_id])
            .await?
            .first()
            .map(FeedbackTally::from)
            .unwrap_or_default();
        transaction.commit().await?;
        Ok(ResourceDetail {
            resource: row.resource,
            recommender_name: row.recommender_name,
            recommender_is_faculty: row.recommender_is_faculty,
            tags: tags.into_iter().map(TagName::from).collect(),
            tally,
        })
    }

    pub async fn list_to_study(&self, user_id: UserId) -> Result<Vec<ResourceWithTags>, RequestError> {
        let mut transaction = self.begin_snapshot().await?;
        if !user_exists(transaction.as_mut(), user_id).await? {
            return Err(RequestError::NotFound(Entity::User));
        }
        let resources = select_to_study_resources(transaction.as_mut(), user_id).await?;
        let ids = resource_ids(&resources);
        let tags = select_tags_for_resources(transaction.as_mut(), &ids).await?;
        transaction.commit().await?;
        Ok(attach_tags(resources, tags))
    }

    pub async fn list_comments(
        &self,
        resource_id: ResourceId,
    ) -> Result<Vec<CommentResponse>, RequestError> {
        let mut transaction = self.begin_snapshot().await?;
        if !resource_exists(transaction.as_mut(), resource_id).await? {
            return Err(RequestError::NotFound(Entity::Resource));
        }
        let comments = select_comments(transaction.as_mut(), resource_id).await?;
        transaction.commit().await?;
        Ok(comments)
    }

    pub async fn list_resource_tags(
        &self,
        resource_id: ResourceId,
    ) -> Result<Vec<TagName>, RequestError> {
        let mut transaction = self.begin_snapshot().await?;
        if !resource_exists(transaction.as_mut(), resource_id).await? {
            return Err(RequestError::NotFound(Entity::Resource));
        }
        let tags = select_tags_for_resources(transaction.as_mut(), &[resource_id]).await?;
        transaction.commit().await?;
        Ok(tags.into_iter().map(TagName::from).collect())
    }
}

#[instrument(skip(executor))]
pub async fn user_exists<'a, E: PgExecutor<'a>>(
    executor: E,
    user_id: UserId,
) -> Result<bool, SqlxError> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1);")
        .bind(user_id)
        .fetch_one(executor)
        .await
}

#[instrument(skip(executor))]
pub async fn resource_exists<'a, E: PgExecutor<'a>>(
    executor: E,
    resource_id: ResourceId,
) -> Result<bool, SqlxError> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM resources WHERE id = $1);")
        .bind(resource_id)
        .fetch_one(executor)
        .await
}

#[instrument(skip(executor))]
pub async fn url_exists<'a, E: PgExecutor<'a>>(executor: E, url: &str) -> Result<bool, SqlxError> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM resources WHERE url = $1);")
        .bind(url)
        .fetch_one(executor)
        .await
}

#[instrument(skip(executor))]
pub async fn select_users<'a, E: PgExecutor<'a>>(executor: E) -> Result<Vec<User>, SqlxError> {
    sqlx::query_as("SELECT id, name, is_faculty FROM users ORDER BY id;")
        .fetch_all(executor)
        .await
}

#[instrument(skip(executor))]
pub async fn select_tag_names<'a, E: PgExecutor<'a>>(
    executor: E,
) -> Result<Vec<TagName>, SqlxError> {
    sqlx::query_as("SELECT id, name FROM tag_names ORDER BY id;")
        .fetch_all(executor)
        .await
}

#[instrument(skip(executor))]
pub async fn select_resources<'a, E: PgExecutor<'a>>(
    executor: E,
) -> Result<Vec<Resource>, SqlxError> {
    sqlx::query_as(
        "
    SELECT
        id, resource_name, author_name, url, description, content_type, week_no,
        recommender_id, rec_status, rec_message, creation_date
    FROM
        resources
    ORDER BY
        creation_date DESC, id DESC;
    ",
    )
    .fetch_all(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn select_resource_with_recommender<'a, E: PgExecutor<'a>>(
    executor: E,
    resource_id: ResourceId,
) -> Result<Option<ResourceWithRecommenderRow>, SqlxError> {
    sqlx::query_as(
        "
    SELECT
        resources.id AS id, resources.resource_name AS resource_name,
        resources.author_name AS author_name, resources.url AS url,
        resources.description AS description, resources.content_type AS content_type,
        resources.week_no AS week_no, resources.recommender_id AS recommender_id,
        resources.rec_status AS rec_status, resources.rec_message AS rec_message,
        resources.creation_date AS creation_date,
        users.name AS recommender_name, users.is_faculty AS recommender_is_faculty
    FROM
        resources LEFT JOIN users ON resources.recommender_id = users.id
    WHERE
        resources.id = $1;
    ",
    )
    .bind(resource_id)
    .fetch_optional(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn select_to_study_resources<'a, E: PgExecutor<'a>>(
    executor: E,
    user_id: UserId,
) -> Result<Vec<Resource>, SqlxError> {
    sqlx::query_as(
        "
    SELECT
        resources.id AS id, resources.resource_name AS resource_name,
        resources.author_name AS author_name, resources.url AS url,
        resources.description AS description, resources.content_type AS content_type,
        resources.week_no AS week_no, resources.recommender_id AS recommender_id,
        resources.rec_status AS rec_status, resources.rec_message AS rec_message,
        resources.creation_date AS creation_date
    FROM
        to_study_list JOIN resources ON to_study_list.resource_id = resources.id
    WHERE
        to_study_list.user_id = $1
    ORDER BY
        resources.creation_date DESC, resources.id DESC;
    ",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn select_tags_for_resources<'a, E: PgExecutor<'a>>(
    executor: E,
    resource_ids: &[ResourceId],
) -> Result<Vec<ResourceTagRow>, SqlxError> {
    sqlx::query_as(
        "
    SELECT
        tags.resource_id AS resource_id, tag_names.id AS id, tag_names.name AS name
    FROM
        tags JOIN tag_names ON tags.tag_id = tag_names.id
    WHERE
        tags.resource_id = ANY($1)
    ORDER BY
        tags.resource_id, tag_names.id;
    ",
    )
    .bind(resource_ids)
    .fetch_all(executor)
    .await
}

/// Counts explicit verdicts per resource; feedback with `liked IS NULL` is
/// neither a like nor a dislike.
#[instrument(skip(executor))]
pub async fn select_feedback_tallies<'a, E: PgExecutor<'a>>(
    executor: E,
    resource_ids: &[ResourceId],
) -> Result<Vec<FeedbackTallyRow>, SqlxError> {
    sqlx::query_as(
        "
    SELECT
        resource_id,
        COUNT(*) FILTER (WHERE liked IS TRUE) AS likes,
        COUNT(*) FILTER (WHERE liked IS FALSE) AS dislikes
    FROM
        feedback
    WHERE
        resource_id = ANY($1)
    GROUP BY
        resource_id;
    ",
    )
    .bind(resource_ids)
    .fetch_all(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn select_comments<'a, E: PgExecutor<'a>>(
    executor: E,
    resource_id: ResourceId,
) -> Result<Vec<CommentResponse>, SqlxError> {
    sqlx::query_as(
        "
    SELECT
        feedback.id AS id, feedback.user_id AS user_id, feedback.resource_id AS resource_id,
        feedback.liked AS liked, feedback.comment AS comment, users.name AS name
    FROM
        feedback JOIN users ON feedback.user_id = users.id
    WHERE
        feedback.resource_id = $1
    ORDER BY
        feedback.id;
    ",
    )
    .bind(resource_id)
    .fetch_all(executor)
    .await
}
