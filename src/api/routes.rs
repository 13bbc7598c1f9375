use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::store::LinkStore;

use super::handlers::{create_link, delete_link, list_links, update_link, AppState};

pub fn create_api_router(store: Arc<LinkStore>, public_base_url: Option<String>) -> Router {
    let state = Arc::new(AppState {
        store,
        public_base_url,
    });

    Router::new()
        .route("/api/create", post(create_link))
        .route("/api/update/{id}", post(update_link))
        .route("/api/delete/{id}", delete(delete_link))
        .route("/api/list", get(list_links))
        .with_state(state)
}
