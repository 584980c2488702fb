//! HTTP routes: the JSON session API and the server-rendered page

mod page;
mod page_routes;
mod session_routes;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

/// Create all HTTP routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Session API
        .route("/api/catalog", get(session_routes::get_catalog))
        .route("/api/state", get(session_routes::get_state))
        .route(
            "/api/state/character",
            put(session_routes::select_character),
        )
        .route("/api/state/scene", put(session_routes::set_scene_prompt))
        .route("/api/generate", post(session_routes::start_generation))
        .route("/api/result/image", get(session_routes::get_result_image))
        // Page
        .route("/", get(page_routes::index))
        .route("/character", post(page_routes::post_character))
        .route("/scene", post(page_routes::post_scene))
        .route("/scene/preset", post(page_routes::post_preset))
        .route("/generate", post(page_routes::post_generate))
}
