use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::{delete, get};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::RequestError;
use crate::models::envelope::{Created, Envelope};
use crate::models::feedback::{CommentResponse, CreateFeedbackRequest, Feedback};
use crate::models::resource::{
    CreateResourceRequest, ResourceDetail, ResourceId, ResourceSummary, ResourceWithTags,
};
use crate::models::tag::TagName;
use crate::models::to_study::{AddToStudyRequest, ToStudyEntry};
use crate::models::user::{User, UserId};
use crate::server::constants::INDEX_PAGE;
use crate::server::extract::{ApiJson, ApiPath};
use crate::server::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/users", get(list_users))
        .route("/tags", get(list_tags))
        .route("/tags/:resource_id", get(list_resource_tags))
        .route("/resources", get(list_resources).post(create_resource))
        .route("/resources/:resource_id", get(get_resource))
        .route(
            "/to-study-list/:user_id",
            get(list_to_study).post(add_to_study),
        )
        .route(
            "/to-study-list/:user_id/:resource_id",
            delete(remove_to_study),
        )
        .route("/comments/:resource_id", get(list_comments).post(add_comment))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = state.config.server.address.clone();
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("starting server on: {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Envelope<Vec<User>>, RequestError> {
    let users = state.db_connection.list_users().await?;
    Ok(Envelope::success(users))
}

pub async fn list_tags(
    State(state): State<Arc<AppState>>,
) -> Result<Envelope<Vec<TagName>>, RequestError> {
    let tags = state.db_connection.list_tag_names().await?;
    Ok(Envelope::success(tags))
}

pub async fn list_resource_tags(
    State(state): State<Arc<AppState>>,
    ApiPath(resource_id): ApiPath<ResourceId>,
) -> Result<Envelope<Vec<TagName>>, RequestError> {
    let tags = state.db_connection.list_resource_tags(resource_id).await?;
    Ok(Envelope::success(tags))
}

pub async fn list_resources(
    State(state): State<Arc<AppState>>,
) -> Result<Envelope<Vec<ResourceSummary>>, RequestError> {
    let resources = state.db_connection.list_resources().await?;
    Ok(Envelope::success(resources))
}

pub async fn get_resource(
    State(state): State<Arc<AppState>>,
    ApiPath(resource_id): ApiPath<ResourceId>,
) -> Result<Envelope<ResourceDetail>, RequestError> {
    let resource = state.db_connection.get_resource(resource_id).await?;
    Ok(Envelope::success(resource))
}

pub async fn create_resource(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<CreateResourceRequest>,
) -> Result<Envelope<ResourceWithTags>, RequestError> {
    let resource = state.db_connection.create_resource(&payload).await?;
    Ok(Envelope::success(resource))
}

pub async fn list_to_study(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Envelope<Vec<ResourceWithTags>>, RequestError> {
    let resources = state.db_connection.list_to_study(user_id).await?;
    Ok(Envelope::success(resources))
}

pub async fn add_to_study(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<UserId>,
    ApiJson(payload): ApiJson<AddToStudyRequest>,
) -> Result<Created<ToStudyEntry>, RequestError> {
    let entry = state
        .db_connection
        .add_to_study(user_id, payload.resource_id)
        .await?;
    Ok(Created(entry))
}

pub async fn remove_to_study(
    State(state): State<Arc<AppState>>,
    ApiPath((user_id, resource_id)): ApiPath<(UserId, ResourceId)>,
) -> Result<Envelope<ToStudyEntry>, RequestError> {
    let entry = state
        .db_connection
        .remove_to_study(user_id, resource_id)
        .await?;
    Ok(Envelope::success(entry))
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    ApiPath(resource_id): ApiPath<ResourceId>,
) -> Result<Envelope<Vec<CommentResponse>>, RequestError> {
    let comments = state.db_connection.list_comments(resource_id).await?;
    Ok(Envelope::success(comments))
}

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    ApiPath(resource_id): ApiPath<ResourceId>,
    ApiJson(payload): ApiJson<CreateFeedbackRequest>,
) -> Result<Created<Feedback>, RequestError> {
    let feedback = state
        .db_connection
        .add_feedback(resource_id, &payload)
        .await?;
    Ok(Created(feedback))
}
