use sqlx::{Error as SqlxError, PgExecutor};
use tracing::{info, instrument};

use crate::database::connection::DbConnection;
use crate::database::queries::{
    resource_exists, select_tags_for_resources, url_exists, user_exists,
};
use crate::database::utils::{constraint_violation, ConstraintViolation};
use crate::error::{Conflict, Entity, RequestError};
use crate::models::feedback::{CreateFeedbackRequest, Feedback};
use crate::models::resource::{CreateResourceRequest, Resource, ResourceId, ResourceWithTags};
use crate::models::tag::{distinct_tag_ids, validate_tag_name, TagId, TagName};
use crate::models::to_study::ToStudyEntry;
use crate::models::user::{validate_user_name, CreateUserRequest, User, UserId};

/// Maps constraint violations of an insert to the domain outcome: a unique
/// violation is the given conflict, a foreign-key violation means the
/// referenced entity is missing.
fn insert_error(e: SqlxError, on_unique: Option<Conflict>, on_foreign_key: Entity) -> RequestError {
    match (constraint_violation(&e), on_unique) {
        (Some(ConstraintViolation::Unique), Some(conflict)) => RequestError::Conflict(conflict),
        (Some(ConstraintViolation::ForeignKey), _) => RequestError::NotFound(on_foreign_key),
        _ => RequestError::Sqlx(e),
    }
}

impl DbConnection {
    pub async fn create_user(&self, user: &CreateUserRequest) -> Result<User, RequestError> {
        validate_user_name(&user.name)?;
        Ok(insert_user(self.pool(), user).await?)
    }

    pub async fn create_tag_name(&self, name: &str) -> Result<TagName, RequestError> {
        validate_tag_name(name)?;
        insert_tag_name(self.pool(), name)
            .await
            .map_err(|e| insert_error(e, Some(Conflict::DuplicateTagName), Entity::Tag))
    }

    /// Inserts the resource and its tag associations in one transaction. An
    /// unknown tag id or recommender rolls the whole creation back.
    pub async fn create_resource(
        &self,
        request: &CreateResourceRequest,
    ) -> Result<ResourceWithTags, RequestError> {
        request.validate()?;
        let mut transaction = self.pool().begin().await?;
        if url_exists(transaction.as_mut(), &request.url).await? {
            return Err(RequestError::Conflict(Conflict::DuplicateUrl));
        }
        let resource = insert_resource(transaction.as_mut(), request)
            .await
            .map_err(|e| insert_error(e, Some(Conflict::DuplicateUrl), Entity::User))?;
        let tag_ids = distinct_tag_ids(&request.tags);
        if !tag_ids.is_empty() {
            insert_resource_tags(transaction.as_mut(), resource.id, &tag_ids)
                .await
                .map_err(|e| insert_error(e, None, Entity::Tag))?;
        }
        let tags = select_tags_for_resources(transaction.as_mut(), &[resource.id])
            .await?
            .into_iter()
            .map(TagName::from)
            .collect();
        transaction.commit().await?;
        info!(
            "created resource with id: {}, tags: {:?}",
            resource.id, tag_ids
        );
        Ok(ResourceWithTags { resource, tags })
    }

    pub async fn add_to_study(
        &self,
        user_id: UserId,
        resource_id: ResourceId,
    ) -> Result<ToStudyEntry, RequestError> {
        if !user_exists(self.pool(), user_id).await? {
            return Err(RequestError::NotFound(Entity::User));
        }
        if to_study_entry_exists(self.pool(), user_id, resource_id).await? {
            return Err(RequestError::Conflict(Conflict::DuplicateStudyEntry));
        }
        let entry = insert_to_study_entry(self.pool(), user_id, resource_id)
            .await
            .map_err(|e| {
                insert_error(e, Some(Conflict::DuplicateStudyEntry), Entity::Resource)
            })?;
        info!("user {user_id} added resource {resource_id} to the to-study list");
        Ok(entry)
    }

    pub async fn remove_to_study(
        &self,
        user_id: UserId,
        resource_id: ResourceId,
    ) -> Result<ToStudyEntry, RequestError> {
        if !user_exists(self.pool(), user_id).await? {
            return Err(RequestError::NotFound(Entity::User));
        }
        let entry = delete_to_study_entry(self.pool(), user_id, resource_id)
            .await?
            .ok_or(RequestError::NotFound(Entity::ToStudyEntry))?;
        info!("user {user_id} removed resource {resource_id} from the to-study list");
        Ok(entry)
    }

    pub async fn add_feedback(
        &self,
        resource_id: ResourceId,
        request: &CreateFeedbackRequest,
    ) -> Result<Feedback, RequestError> {
        request.validate()?;
        if !resource_exists(self.pool(), resource_id).await? {
            return Err(RequestError::NotFound(Entity::Resource));
        }
        if feedback_exists(self.pool(), request.user_id, resource_id).await? {
            return Err(RequestError::Conflict(Conflict::DuplicateFeedback));
        }
        let feedback = insert_feedback(self.pool(), resource_id, request)
            .await
            .map_err(|e| insert_error(e, Some(Conflict::DuplicateFeedback), Entity::User))?;
        info!(
            "created feedback with id: {} on resource {}",
            feedback.id, resource_id
        );
        Ok(feedback)
    }
}

#[instrument(skip_all)]
pub async fn insert_user<'a, E: PgExecutor<'a>>(
    executor: E,
    user: &CreateUserRequest,
) -> Result<User, SqlxError> {
    let user: User = sqlx::query_as(
        "INSERT INTO users (name, is_faculty) VALUES ($1, $2) RETURNING id, name, is_faculty;",
    )
    .bind(&user.name)
    .bind(user.is_faculty)
    .fetch_one(executor)
    .await?;
    info!("created user with id: {}", user.id);
    Ok(user)
}

#[instrument(skip(executor))]
pub async fn insert_tag_name<'a, E: PgExecutor<'a>>(
    executor: E,
    name: &str,
) -> Result<TagName, SqlxError> {
    sqlx::query_as("INSERT INTO tag_names (name) VALUES ($1) RETURNING id, name;")
        .bind(name)
        .fetch_one(executor)
        .await
}

#[instrument(skip_all)]
pub async fn insert_resource<'a, E: PgExecutor<'a>>(
    executor: E,
    request: &CreateResourceRequest,
) -> Result<Resource, SqlxError> {
    sqlx::query_as(
        "
            INSERT INTO resources (
                resource_name, author_name, url, description, content_type, week_no,
                recommender_id, rec_status, rec_message, creation_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, current_timestamp)
            RETURNING
                id, resource_name, author_name, url, description, content_type, week_no,
                recommender_id, rec_status, rec_message, creation_date;
        ",
    )
    .bind(&request.resource_name)
    .bind(request.author_name.as_deref())
    .bind(&request.url)
    .bind(request.description.as_deref())
    .bind(request.content_type.as_deref())
    .bind(request.week_no)
    .bind(request.recommender_id)
    .bind(request.rec_status.as_deref())
    .bind(request.rec_message.as_deref())
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn insert_resource_tags<'a, E: PgExecutor<'a>>(
    executor: E,
    resource_id: ResourceId,
    tag_ids: &[TagId],
) -> Result<(), SqlxError> {
    sqlx::query(
        "
            INSERT INTO tags (resource_id, tag_id)
            SELECT $1, tag_id FROM UNNEST($2::int[]) AS tag_id;
        ",
    )
    .bind(resource_id)
    .bind(tag_ids)
    .execute(executor)
    .await?;
    Ok(())
}

#[instrument(skip(executor))]
pub async fn to_study_entry_exists<'a, E: PgExecutor<'a>>(
    executor: E,
    user_id: UserId,
    resource_id: ResourceId,
) -> Result<bool, SqlxError> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM to_study_list WHERE user_id = $1 AND resource_id = $2);",
    )
    .bind(user_id)
    .bind(resource_id)
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn insert_to_study_entry<'a, E: PgExecutor<'a>>(
    executor: E,
    user_id: UserId,
    resource_id: ResourceId,
) -> Result<ToStudyEntry, SqlxError> {
    sqlx::query_as(
        "
            INSERT INTO to_study_list (user_id, resource_id)
            VALUES ($1, $2) RETURNING user_id, resource_id;
        ",
    )
    .bind(user_id)
    .bind(resource_id)
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn delete_to_study_entry<'a, E: PgExecutor<'a>>(
    executor: E,
    user_id: UserId,
    resource_id: ResourceId,
) -> Result<Option<ToStudyEntry>, SqlxError> {
    sqlx::query_as(
        "
            DELETE FROM to_study_list
            WHERE user_id = $1 AND resource_id = $2
            RETURNING user_id, resource_id;
        ",
    )
    .bind(user_id)
    .bind(resource_id)
    .fetch_optional(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn feedback_exists<'a, E: PgExecutor<'a>>(
    executor: E,
    user_id: UserId,
    resource_id: ResourceId,
) -> Result<bool, SqlxError> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM feedback WHERE user_id = $1 AND resource_id = $2);",
    )
    .bind(user_id)
    .bind(resource_id)
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn insert_feedback<'a, E: PgExecutor<'a>>(
    executor: E,
    resource_id: ResourceId,
    request: &CreateFeedbackRequest,
) -> Result<Feedback, SqlxError> {
    sqlx::query_as(
        "
            INSERT INTO feedback (user_id, resource_id, liked, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, resource_id, liked, comment;
        ",
    )
    .bind(request.user_id)
    .bind(resource_id)
    .bind(request.liked)
    .bind(request.comment.as_deref())
    .fetch_one(executor)
    .await
}
