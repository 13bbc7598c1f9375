use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::store::{LinkStore, StoreError};

pub struct RedirectState {
    pub store: Arc<LinkStore>,
}

const NOT_FOUND_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>404 - not found</title></head>
  <body>
    <h1>404</h1>
    <p>This short link does not exist.</p>
  </body>
</html>
"#;

/// Resolve a short id and redirect to its target, counting the click
pub async fn redirect_link(
    State(state): State<Arc<RedirectState>>,
    Path(id): Path<String>,
) -> Response {
    match state.store.resolve(&id).await {
        Ok(link) => (StatusCode::FOUND, [(header::LOCATION, link.original_link)]).into_response(),
        Err(StoreError::NotFound) => {
            (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, short_id = %id, "resolve failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
        }
    }
}

/// The root path hands off to the dashboard, like the rest of the frontend
pub async fn root_redirect() -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, "/dashboard".to_string())],
    )
        .into_response()
}
