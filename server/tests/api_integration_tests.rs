//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use charsheet_server::context::ServerContext;
use charsheet_server::routes;
use charsheet_server::store::{MemoryStore, SqliteStore, reconcile};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt;

/// Router over a fresh in-memory store
fn memory_app() -> Router {
    routes::router(ServerContext::new(Arc::new(MemoryStore::new())))
}

/// Router over a fresh in-memory SQLite database with a reconciled schema
async fn sqlite_app() -> Router {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    reconcile::ensure_schema(&pool)
        .await
        .expect("Failed to reconcile schema");
    routes::router(ServerContext::new(Arc::new(SqliteStore::new(pool))))
}

/// Drive one request through the router and decode the JSON response
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_health_is_always_ok() {
    let app = memory_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_character_crud_flow() {
    let app = memory_app();

    let (status, created) = send(
        &app,
        "POST",
        "/characters",
        Some(json!({"name": "Mira", "class": "Wizard", "level": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], json!("Mira"));
    let id = created["id"].as_i64().unwrap();

    let (status, listed) = send(&app, "GET", "/characters", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/characters/{}", id),
        Some(json!({"level": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["level"], json!(2));
    assert_eq!(updated["name"], json!("Mira"), "untouched fields survive updates");

    let (status, deleted) = send(&app, "DELETE", &format!("/characters/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({"success": true}));

    let (_, listed) = send(&app, "GET", "/characters", None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_post_without_name_is_rejected() {
    let app = memory_app();
    let (status, body) = send(&app, "POST", "/characters", Some(json!({"level": 3}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("name is required"));
}

#[tokio::test]
async fn test_post_with_null_name_is_rejected() {
    let app = memory_app();
    let (status, _) = send(&app, "POST", "/characters", Some(json!({"name": null}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_with_non_object_body_is_rejected() {
    let app = memory_app();
    let (status, _) = send(&app, "POST", "/characters", Some(json!(["Mira"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_alias_columns_are_not_synchronized() {
    let app = memory_app();
    let (status, record) = send(
        &app,
        "POST",
        "/characters",
        Some(json!({"name": "Mira", "str": 14})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["str"], json!(14));
    assert_eq!(record["strength"], Value::Null);
}

#[tokio::test]
async fn test_api_prefix_serves_the_same_routes() {
    let app = memory_app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/characters",
        Some(json!({"name": "Thorin"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, listed) = send(&app, "GET", "/api/characters", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Both mounts see the same store.
    let (_, listed) = send(&app, "GET", "/characters", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_random_character_is_not_persisted() {
    let app = memory_app();
    let (status, sheet) = send(&app, "GET", "/characters/random", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(sheet.get("id").is_none());
    for ability in ["strength", "dexterity", "constitution", "intelligence", "wisdom", "charisma"] {
        let score = sheet[ability].as_i64().unwrap();
        assert!((3..=18).contains(&score), "{} out of range: {}", ability, score);
    }

    let (_, listed) = send(&app, "GET", "/characters", None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_put_unknown_id_is_not_found() {
    let app = memory_app();
    let (status, _) = send(&app, "PUT", "/characters/99", Some(json!({"level": 2}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = memory_app();
    let (status, body) = send(&app, "DELETE", "/characters/99", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
}

#[tokio::test]
async fn test_post_with_existing_id_replaces_in_place() {
    let app = memory_app();
    let (status, _) = send(
        &app,
        "POST",
        "/characters",
        Some(json!({"id": 7, "name": "Mira", "level": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, replaced) = send(
        &app,
        "POST",
        "/characters",
        Some(json!({"id": 7, "name": "Mira the Bold"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "replacing an existing id is not a create");
    assert_eq!(replaced["name"], json!("Mira the Bold"));
    assert_eq!(replaced["level"], Value::Null, "POST is a full replace");

    let (_, listed) = send(&app, "GET", "/characters", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_update_changes_nothing() {
    let app = memory_app();
    let (_, created) = send(
        &app,
        "POST",
        "/characters",
        Some(json!({"name": "Mira", "level": 2, "hp": 12})),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(&app, "PUT", &format!("/characters/{}", id), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, created);
}

#[tokio::test]
async fn test_sqlite_backend_end_to_end() {
    let app = sqlite_app().await;

    let (status, record) = send(
        &app,
        "POST",
        "/characters",
        Some(json!({"name": "Mira", "str": 14, "inspiration": "YES", "quirk": "hums"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = record["id"].as_i64().unwrap();
    assert_eq!(record["str"], json!(14));
    assert_eq!(record["strength"], Value::Null);
    assert_eq!(record["inspiration"], json!(true));
    assert_eq!(record["extras"], json!({"quirk": "hums"}));

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/characters/{}", id),
        Some(json!({"xp": "900"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["experience"], json!(900));
    assert_eq!(updated["str"], json!(14));

    let (status, body) = send(&app, "DELETE", "/characters/424242", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
}

#[tokio::test]
async fn test_list_is_ordered_by_identifier() {
    let app = sqlite_app().await;
    for (id, name) in [(9, "Bram"), (2, "Mira"), (5, "Thorin")] {
        let (status, _) = send(
            &app,
            "POST",
            "/characters",
            Some(json!({"id": id, "name": name})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, listed) = send(&app, "GET", "/characters", None).await;
    let ids: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 5, 9]);
}
