pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::applications::handlers;
use crate::applications::submission::MAX_REQUEST_BYTES;
use crate::security::admin_gate::require_admin;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/admin/applications", get(handlers::handle_admin_list))
        .route(
            "/admin/applications/delete",
            post(handlers::handle_delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health::health_handler))
        // Public form
        .route("/apply", get(handlers::handle_apply_page))
        .route("/embed/application-form", get(handlers::handle_embed_form))
        .route("/assets/job-form.js", get(handlers::handle_form_script))
        .route(
            "/applications",
            post(handlers::handle_submit).layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES)),
        )
        .merge(admin)
        .with_state(state)
}
