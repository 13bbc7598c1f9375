use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{CreateLinkRequest, Link, UpdateLinkRequest};
use crate::store::{validate, CreateAction, LinkStore, StoreError, DEFAULT_LIST_LIMIT};

pub struct AppState {
    pub store: Arc<LinkStore>,
    pub public_base_url: Option<String>,
}

#[derive(Serialize)]
pub struct StatusMessage {
    pub status: u16,
    pub message: String,
}

#[derive(Serialize)]
pub struct ShortLinkResponse {
    pub status: u16,
    pub short_link: String,
}

#[derive(Serialize)]
pub struct UpdateResponse {
    pub status: u16,
    pub message: String,
    pub short_link: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResponse {
    pub status: u16,
    pub message: String,
    pub existing_link: String,
    pub options: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub items: Vec<Link>,
    pub count: i64,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub l: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIST_LIMIT
}

fn short_link_base(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(base) = &state.public_base_url {
        return base.trim_end_matches('/').to_string();
    }
    // Behind a proxy the original scheme arrives in x-forwarded-proto.
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get("host")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{scheme}://{host}")
}

fn store_error_response(err: StoreError) -> Response {
    match err {
        StoreError::BadRequest => (
            StatusCode::BAD_REQUEST,
            Json(StatusMessage {
                status: 400,
                message: "bad request".to_string(),
            }),
        )
            .into_response(),
        StoreError::Conflict { existing_link } => (
            StatusCode::CONFLICT,
            Json(ConflictResponse {
                status: 409,
                message: "id already in use".to_string(),
                existing_link,
                options: vec!["cancel", "modify"],
            }),
        )
            .into_response(),
        StoreError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(StatusMessage {
                status: 404,
                message: "item could not be found".to_string(),
            }),
        )
            .into_response(),
        StoreError::Internal(err) => {
            tracing::error!(error = %err, "storage backend failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusMessage {
                    status: 500,
                    message: "internal server error".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Create a short link, allocating an id when none is supplied
pub async fn create_link(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateLinkRequest>,
) -> Response {
    // Anything other than "modify" (e.g. "cancel") counts as no action, so
    // a collision falls through to the 409 conflict branch.
    let action = match payload.action.as_deref() {
        Some("modify") => Some(CreateAction::Modify),
        _ => None,
    };

    match state
        .store
        .create(payload.id.as_deref(), &payload.original_link, action)
        .await
    {
        Ok(link) => (
            StatusCode::OK,
            Json(ShortLinkResponse {
                status: 200,
                short_link: format!("{}/{}", short_link_base(&state, &headers), link.id),
            }),
        )
            .into_response(),
        Err(err) => store_error_response(err),
    }
}

/// Overwrite the target of an existing short link
pub async fn update_link(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<UpdateLinkRequest>,
) -> Response {
    // The body carries a required id of its own; a bad one is rejected the
    // same way as a bad path id.
    if let Err(err) = validate::validate(Some(&payload.id), &payload.original_link) {
        return store_error_response(err);
    }

    match state.store.update(&id, &payload.original_link).await {
        Ok(link) => (
            StatusCode::OK,
            Json(UpdateResponse {
                status: 200,
                message: "updated successfully".to_string(),
                short_link: format!("{}/{}", short_link_base(&state, &headers), link.id),
            }),
        )
            .into_response(),
        Err(err) => store_error_response(err),
    }
}

/// Delete a short link
pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.store.delete(&id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusMessage {
                status: 200,
                message: "delete item successfully".to_string(),
            }),
        )
            .into_response(),
        Err(err) => store_error_response(err),
    }
}

/// List stored links in insertion order
pub async fn list_links(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Response {
    match state.store.list(query.l).await {
        Ok((items, count)) => (StatusCode::OK, Json(ListResponse { items, count })).into_response(),
        Err(err) => store_error_response(err),
    }
}
