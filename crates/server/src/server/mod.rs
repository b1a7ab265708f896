use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::database::connection::DbConnection;
use crate::models::user::CreateUserRequest;
use crate::server::state::AppState;

pub mod constants;
pub mod extract;
pub mod router;
pub mod state;

pub async fn run_all(config: &AppConfig) -> anyhow::Result<()> {
    let app_state = Arc::new(AppState::try_init(config).await?);
    router::serve(app_state).await?;
    Ok(())
}

pub async fn init_schema(config: &AppConfig) -> anyhow::Result<()> {
    DbConnection::connect(&config.database)
        .await?
        .init_schema()
        .await?;
    Ok(())
}

pub async fn drop_schema(config: &AppConfig) -> anyhow::Result<()> {
    DbConnection::connect(&config.database)
        .await?
        .drop_schema()
        .await?;
    Ok(())
}

pub async fn add_user(config: &AppConfig, name: String, is_faculty: bool) -> anyhow::Result<()> {
    let user = DbConnection::connect(&config.database)
        .await?
        .create_user(&CreateUserRequest { name, is_faculty })
        .await?;
    info!("registered user {} with id: {}", user.name, user.id);
    Ok(())
}

pub async fn add_tag(config: &AppConfig, name: &str) -> anyhow::Result<()> {
    let tag = DbConnection::connect(&config.database)
        .await?
        .create_tag_name(name)
        .await?;
    info!("added tag {} with id: {}", tag.name, tag.id);
    Ok(())
}
