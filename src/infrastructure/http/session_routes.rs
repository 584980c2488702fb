//! Session API routes
//!
//! JSON endpoints over the single session: catalog, state, selection
//! changes, generate, and the raw bytes of the current illustration.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::application::dto::{
    CatalogDto, GenerateResponseDto, SelectCharacterRequestDto, SessionSnapshotDto,
    SetScenePromptRequestDto,
};
use crate::domain::value_objects::ScenePrompt;
use crate::infrastructure::state::AppState;

/// Characters and scene presets
pub async fn get_catalog() -> Json<CatalogDto> {
    Json(CatalogDto::build())
}

/// Current session state
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<SessionSnapshotDto> {
    let session = state.session.state().await;
    Json(SessionSnapshotDto::from(&session))
}

/// Change the selected character
pub async fn select_character(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SelectCharacterRequestDto>,
) -> Json<SessionSnapshotDto> {
    let session = state.session.select_character(body.character).await;
    Json(SessionSnapshotDto::from(&session))
}

/// Replace the scene text
pub async fn set_scene_prompt(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetScenePromptRequestDto>,
) -> Json<SessionSnapshotDto> {
    let session = state
        .session
        .set_scene_prompt(ScenePrompt::new(body.scene_prompt))
        .await;
    Json(SessionSnapshotDto::from(&session))
}

/// Start a generation; a blank scene or a busy pipeline is reported, not failed
pub async fn start_generation(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<GenerateResponseDto>) {
    match state.session.start_generation().await {
        Some(ticket) => (
            StatusCode::ACCEPTED,
            Json(GenerateResponseDto {
                accepted: true,
                generation_id: Some(ticket.supervise().to_string()),
            }),
        ),
        None => (
            StatusCode::OK,
            Json(GenerateResponseDto {
                accepted: false,
                generation_id: None,
            }),
        ),
    }
}

/// Raw bytes of the current result's image
pub async fn get_result_image(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state.session.state().await;
    let result = session
        .result
        .ok_or_else(|| (StatusCode::NOT_FOUND, "No generated image".to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, result.image.mime_type.clone())],
        result.image.bytes.clone(),
    ))
}
