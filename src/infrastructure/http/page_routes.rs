//! Page routes - the HTML word card page and its form posts
//!
//! Every form post applies one intent to the session and redirects back to `/`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;

use crate::domain::entities::CharacterIdentity;
use crate::domain::value_objects::{ScenePreset, ScenePrompt};
use crate::infrastructure::http::page::render_page;
use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CharacterForm {
    pub character: String,
}

#[derive(Debug, Deserialize)]
pub struct SceneForm {
    pub scene_prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct PresetForm {
    /// Catalog key such as `Beach`
    pub preset: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    /// Absent when the input was disabled during a running generation
    #[serde(default)]
    pub scene_prompt: Option<String>,
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let session = state.session.state().await;
    Html(render_page(&session))
}

pub async fn post_character(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CharacterForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let character: CharacterIdentity = form
        .character
        .parse()
        .map_err(|e: anyhow::Error| (StatusCode::BAD_REQUEST, e.to_string()))?;

    state.session.select_character(character).await;
    Ok(Redirect::to("/"))
}

pub async fn post_scene(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SceneForm>,
) -> Redirect {
    state
        .session
        .set_scene_prompt(ScenePrompt::new(form.scene_prompt))
        .await;
    Redirect::to("/")
}

pub async fn post_preset(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PresetForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let preset: ScenePreset = form
        .preset
        .parse()
        .map_err(|e: anyhow::Error| (StatusCode::BAD_REQUEST, e.to_string()))?;

    state.session.set_scene_prompt(ScenePrompt::from(preset)).await;
    Ok(Redirect::to("/"))
}

/// Store the submitted scene text, then start a generation if allowed
pub async fn post_generate(
    State(state): State<Arc<AppState>>,
    Form(form): Form<GenerateForm>,
) -> Redirect {
    if let Some(scene_prompt) = form.scene_prompt {
        state
            .session
            .set_scene_prompt(ScenePrompt::new(scene_prompt))
            .await;
    }

    match state.session.start_generation().await {
        Some(ticket) => {
            tracing::debug!("Generation {} started from the page", ticket.supervise());
        }
        None => tracing::debug!("Generate form submitted but no generation was started"),
    }
    Redirect::to("/")
}
