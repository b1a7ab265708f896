use sqlx::{Error as SqlxError, Postgres, Transaction};
use tracing::{info, instrument};

use crate::database::connection::DbConnection;

impl DbConnection {
    pub async fn init_schema(&self) -> Result<(), SqlxError> {
        let mut transaction = self.pool().begin().await?;
        create_all_tables(&mut transaction).await?;
        transaction.commit().await?;
        info!("catalog schema created");
        Ok(())
    }

    pub async fn drop_schema(&self) -> Result<(), SqlxError> {
        let mut transaction = self.pool().begin().await?;
        drop_all_tables(&mut transaction).await?;
        transaction.commit().await?;
        info!("catalog schema dropped");
        Ok(())
    }
}

#[instrument(skip_all)]
pub async fn create_all_tables(
    transaction: &mut Transaction<'_, Postgres>,
) -> Result<(), SqlxError> {
    sqlx::query(
        "
            CREATE TABLE users (
                id              int PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
                name            VARCHAR(100) NOT NULL,
                is_faculty      BOOLEAN NOT NULL DEFAULT FALSE
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    sqlx::query(
        "
            CREATE TABLE resources (
                id              int PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
                resource_name   VARCHAR(255) NOT NULL,
                author_name     VARCHAR(255),
                url             VARCHAR(2048) NOT NULL UNIQUE,
                description     TEXT,
                content_type    VARCHAR(50),
                week_no         int,
                recommender_id  int REFERENCES users(id) ON UPDATE CASCADE ON DELETE SET NULL,
                rec_status      VARCHAR(255),
                rec_message     TEXT,
                creation_date   TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT current_timestamp
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    sqlx::query(
        "
            CREATE TABLE tag_names (
                id              int PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
                name            VARCHAR(50) NOT NULL UNIQUE
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    sqlx::query(
        "
            CREATE TABLE tags (
                resource_id     int NOT NULL REFERENCES resources(id) ON UPDATE CASCADE ON DELETE CASCADE,
                tag_id          int NOT NULL REFERENCES tag_names(id) ON UPDATE CASCADE ON DELETE CASCADE,
                CONSTRAINT tags_pkey PRIMARY KEY (resource_id, tag_id)
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    sqlx::query(
        "
            CREATE TABLE to_study_list (
                user_id         int NOT NULL REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE,
                resource_id     int NOT NULL REFERENCES resources(id) ON UPDATE CASCADE ON DELETE CASCADE,
                CONSTRAINT to_study_list_pkey PRIMARY KEY (user_id, resource_id)
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    sqlx::query(
        "
            CREATE TABLE feedback (
                id              int PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
                user_id         int NOT NULL REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE,
                resource_id     int NOT NULL REFERENCES resources(id) ON UPDATE CASCADE ON DELETE CASCADE,
                liked           BOOLEAN,
                comment         TEXT,
                CONSTRAINT feedback_user_resource_key UNIQUE (user_id, resource_id)
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    Ok(())
}

#[instrument(skip_all)]
pub async fn drop_all_tables(transaction: &mut Transaction<'_, Postgres>) -> Result<(), SqlxError> {
    let statements = [
        "DROP TABLE IF EXISTS feedback;",
        "DROP TABLE IF EXISTS to_study_list;",
        "DROP TABLE IF EXISTS tags;",
        "DROP TABLE IF EXISTS tag_names;",
        "DROP TABLE IF EXISTS resources;",
        "DROP TABLE IF EXISTS users;",
    ];
    for statement in &statements {
        sqlx::query(statement).execute(transaction.as_mut()).await?;
    }
    Ok(())
}
