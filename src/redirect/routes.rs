use axum::{routing::get, Router};
use std::sync::Arc;

use crate::store::LinkStore;

use super::handlers::{redirect_link, root_redirect, RedirectState};

pub fn create_redirect_router(store: Arc<LinkStore>) -> Router {
    let state = Arc::new(RedirectState { store });

    Router::new()
        .route("/", get(root_redirect))
        .route("/{id}", get(redirect_link))
        .with_state(state)
}
