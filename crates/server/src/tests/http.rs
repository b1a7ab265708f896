use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::db::{init_and_get_db, SERIAL_LOCK};
use crate::config::{AppConfig, ServerConfig};
use crate::database::connection::DbConfig;
use crate::models::user::CreateUserRequest;
use crate::server::router::app;
use crate::server::state::AppState;

async fn init_and_get_app() -> (Router, Arc<AppState>) {
    let db_connection = init_and_get_db().await;
    let state = Arc::new(AppState {
        config: AppConfig {
            server: ServerConfig {
                address: "127.0.0.1:0".to_string(),
            },
            database: DbConfig::development("postgresql://localhost/unused"),
        },
        db_connection,
    });
    (app(state.clone()), state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn resource_body(url: &str, tags: Value) -> Value {
    json!({
        "resource_name": "Intro to graphs",
        "author_name": "Jane Doe",
        "url": url,
        "description": "BFS and DFS",
        "content_type": "article",
        "week_no": 2,
        "rec_status": "recommended",
        "rec_message": "a good start",
        "tags": tags
    })
}

async fn create_user(state: &AppState, name: &str) -> i64 {
    state
        .db_connection
        .create_user(&CreateUserRequest {
            name: name.to_string(),
            is_faculty: false,
        })
        .await
        .unwrap()
        .id as i64
}

async fn post_resource(app: &Router, url: &str) -> i64 {
    let (status, body) = send(app, Method::POST, "/resources", Some(resource_body(url, json!([])))).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn posted_resource_is_served_with_tags_and_counts() {
    let _lock = SERIAL_LOCK.lock().await;
    let (app, state) = init_and_get_app().await;
    state.db_connection.create_tag_name("math").await.unwrap();

    let (status, created) = send(
        &app,
        Method::POST,
        "/resources",
        Some(resource_body(
            "http://example.com/a",
            json!([{"id": 1, "name": "math"}]),
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["status"], "success");
    assert_eq!(created["data"]["url"], "http://example.com/a");
    assert_eq!(created["data"]["tags"], json!([{"id": 1, "name": "math"}]));
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, fetched) = send(&app, Method::GET, &format!("/resources/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "success");
    let data = &fetched["data"];
    assert!(data.is_object());
    assert_eq!(data["id"], id);
    assert_eq!(data["url"], "http://example.com/a");
    assert_eq!(data["resource_name"], "Intro to graphs");
    assert_eq!(data["tags"], json!([{"id": 1, "name": "math"}]));
    assert_eq!(data["likes"], 0);
    assert_eq!(data["dislikes"], 0);

    let (status, listed) = send(&app, Method::GET, "/resources", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["tags"], json!([{"id": 1, "name": "math"}]));
    assert_eq!(listed["data"][0]["likes"], 0);

    let (status, tags) = send(&app, Method::GET, &format!("/tags/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags["data"], json!([{"id": 1, "name": "math"}]));
}

#[tokio::test]
async fn duplicate_url_answers_405() {
    let _lock = SERIAL_LOCK.lock().await;
    let (app, _state) = init_and_get_app().await;

    post_resource(&app, "http://example.com/a").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/resources",
        Some(resource_body("http://example.com/a", json!([]))),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["status"], "failure");
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn overlong_field_answers_400() {
    let _lock = SERIAL_LOCK.lock().await;
    let (app, _state) = init_and_get_app().await;

    let mut body = resource_body("http://example.com/a", json!([]));
    body["content_type"] = json!("x".repeat(60));
    let (status, response) = send(&app, Method::POST, "/resources", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["status"], "failure");

    let (_, listed) = send(&app, Method::GET, "/resources", None).await;
    assert_eq!(listed["data"], json!([]));
}

#[tokio::test]
async fn to_study_list_statuses() {
    let _lock = SERIAL_LOCK.lock().await;
    let (app, state) = init_and_get_app().await;

    let user = create_user(&state, "Ada").await;
    let resource = post_resource(&app, "http://example.com/a").await;
    let uri = format!("/to-study-list/{user}");

    let (status, added) = send(&app, Method::POST, &uri, Some(json!({"resourceId": resource}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added["data"], json!({"user_id": user, "resource_id": resource}));

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({"resourceId": resource}))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["status"], "failure");

    let (status, listed) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["id"], resource);
    assert_eq!(listed["data"][0]["tags"], json!([]));

    let delete_uri = format!("/to-study-list/{user}/{resource}");
    let (status, removed) = send(&app, Method::DELETE, &delete_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["data"], json!({"user_id": user, "resource_id": resource}));

    let (status, _) = send(&app, Method::DELETE, &delete_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/to-study-list/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "user not found");
}

#[tokio::test]
async fn feedback_statuses_and_counts() {
    let _lock = SERIAL_LOCK.lock().await;
    let (app, state) = init_and_get_app().await;

    let ada = create_user(&state, "Ada").await;
    let grace = create_user(&state, "Grace").await;
    let resource = post_resource(&app, "http://example.com/a").await;
    let uri = format!("/comments/{resource}");

    let (status, created) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({"userId": ada, "liked": true, "comment": "clear"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["user_id"], ada);
    assert_eq!(created["data"]["liked"], true);

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({"userId": ada, "liked": false, "comment": "again"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "failure");

    let (status, _) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({"userId": grace, "liked": false})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, comments) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comments["data"].as_array().unwrap().len(), 2);
    assert_eq!(comments["data"][0]["name"], "Ada");
    assert_eq!(comments["data"][1]["name"], "Grace");

    let (_, fetched) = send(&app, Method::GET, &format!("/resources/{resource}"), None).await;
    assert_eq!(fetched["data"]["likes"], 1);
    assert_eq!(fetched["data"]["dislikes"], 1);
}

#[tokio::test]
async fn missing_resource_answers_404_on_every_route() {
    let _lock = SERIAL_LOCK.lock().await;
    let (app, _state) = init_and_get_app().await;

    for uri in ["/resources/404", "/comments/404", "/tags/404"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["status"], "failure");
        assert_eq!(body["error"], "resource not found");
    }
}

#[tokio::test]
async fn lists_users_and_tags() {
    let _lock = SERIAL_LOCK.lock().await;
    let (app, state) = init_and_get_app().await;

    create_user(&state, "Ada").await;
    state.db_connection.create_tag_name("math").await.unwrap();

    let (status, users) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users["data"], json!([{"id": 1, "name": "Ada", "is_faculty": false}]));

    let (status, tags) = send(&app, Method::GET, "/tags", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags["data"], json!([{"id": 1, "name": "math"}]));
}
