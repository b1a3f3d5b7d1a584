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

//! Character REST API
//!
//! The character routes are mounted twice, at the root and under `/api`;
//! older clients used the prefixed form. Input normalization lives in the
//! resolver; this layer only enforces the one request-level rule (a new
//! character needs a name) and maps outcomes onto status codes. Chosen
//! policies: POST with an existing identifier replaces the record in place,
//! DELETE is idempotent and always reports success.

use crate::context::ServerContext;
use crate::error::ApiError;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, put};
use axum::Router;
use charsheet_common::generator;
use charsheet_common::resolver::{self, Fields};
use charsheet_common::schema::ID_KEY;
use serde_json::{json, Value};

/// Build the application router.
pub fn router(context: ServerContext) -> Router {
    Router::new()
        .merge(character_routes())
        .nest("/api", character_routes())
        .route("/health", get(health))
        .with_state(context)
}

fn character_routes() -> Router<ServerContext> {
    Router::new()
        .route("/characters", get(list_characters).post(create_character))
        .route("/characters/random", get(random_character))
        .route(
            "/characters/{id}",
            put(update_character).delete(delete_character),
        )
}

/// Liveness probe, independent of storage availability.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_characters(
    State(context): State<ServerContext>,
) -> Result<Json<Vec<Fields>>, ApiError> {
    Ok(Json(context.store.list().await?))
}

/// A freshly rolled character sheet; never persisted.
async fn random_character() -> Json<Fields> {
    Json(generator::random_character())
}

async fn create_character(
    State(context): State<ServerContext>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let input = as_object(&body)?;
    let resolved = resolver::resolve_for_insert(input);
    if resolved.columns.get("name").is_none_or(Value::is_null) {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }

    let id = input
        .get(ID_KEY)
        .map(resolver::coerce_integer)
        .and_then(|value| value.as_i64());
    let (record, created) = context.store.upsert(id, resolved).await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(Value::Object(record))))
}

async fn update_character(
    State(context): State<ServerContext>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let input = as_object(&body)?;
    let resolved = resolver::resolve_for_update(input);
    match context.store.update(id, resolved).await? {
        Some(record) => Ok(Json(Value::Object(record))),
        None => Err(ApiError::NotFound),
    }
}

async fn delete_character(
    State(context): State<ServerContext>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let existed = context.store.delete(id).await?;
    if !existed {
        tracing::debug!("Delete of unknown character {}", id);
    }
    Ok(Json(json!({ "success": true })))
}

fn as_object(body: &Value) -> Result<&Fields, ApiError> {
    body.as_object()
        .ok_or_else(|| ApiError::BadRequest("request body must be a JSON object".to_string()))
}
