//! Session State - The single application state record and its transitions
//!
//! All mutation goes through [`SessionState::apply`], a pure
//! `(state, event) -> state` function. Side effects (the model calls) are
//! driven by the application layer, which feeds their outcomes back in as
//! events.

use std::sync::Arc;

use crate::domain::entities::{CharacterIdentity, GenerationResult};
use crate::domain::value_objects::{GenerationId, ScenePreset, ScenePrompt};

/// The only error text a user ever sees for a failed generation
pub const GENERATION_FAILED_MESSAGE: &str = "生成失败，请检查 API Key 并重试。";

/// Stage of the current generation request.
///
/// In-flight phases carry the id of the request they belong to, so a
/// completion for any other request can be recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Idle,
    GeneratingImage(GenerationId),
    AnalyzingImage(GenerationId),
    Complete,
}

impl PipelinePhase {
    /// Id of the request currently running, if any
    pub fn in_flight(&self) -> Option<GenerationId> {
        match self {
            PipelinePhase::GeneratingImage(id) | PipelinePhase::AnalyzingImage(id) => Some(*id),
            PipelinePhase::Idle | PipelinePhase::Complete => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight().is_some()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelinePhase::Idle => "idle",
            PipelinePhase::GeneratingImage(_) => "generating-image",
            PipelinePhase::AnalyzingImage(_) => "analyzing-image",
            PipelinePhase::Complete => "complete",
        }
    }

    /// Progress caption shown on the generate button
    pub fn caption(&self) -> Option<&'static str> {
        match self {
            PipelinePhase::GeneratingImage(_) => Some("正在绘制场景..."),
            PipelinePhase::AnalyzingImage(_) => Some("正在分析单词..."),
            PipelinePhase::Idle | PipelinePhase::Complete => None,
        }
    }
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything that can happen to the session
#[derive(Debug, Clone)]
pub enum SessionEvent {
    CharacterSelected(CharacterIdentity),
    ScenePromptChanged(ScenePrompt),
    /// User asked for a new card; the id names the request if accepted
    GenerationRequested(GenerationId),
    /// The image exists and the vocabulary call has begun
    AnalysisStarted(GenerationId),
    GenerationSucceeded {
        generation_id: GenerationId,
        result: Arc<GenerationResult>,
    },
    GenerationFailed {
        generation_id: GenerationId,
        message: String,
    },
}

/// Aggregate of selection, phase, result and error
#[derive(Debug, Clone)]
pub struct SessionState {
    pub character: CharacterIdentity,
    pub scene_prompt: ScenePrompt,
    pub phase: PipelinePhase,
    pub result: Option<Arc<GenerationResult>>,
    pub error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            character: CharacterIdentity::default(),
            scene_prompt: ScenePrompt::from(ScenePreset::Concert),
            phase: PipelinePhase::Idle,
            result: None,
            error: None,
        }
    }
}

impl SessionState {
    /// Whether a generate request would be accepted right now
    pub fn can_start_generation(&self) -> bool {
        !self.scene_prompt.is_blank() && !self.phase.is_loading()
    }

    /// Apply one event and return the next state.
    ///
    /// Events that are not legal in the current state leave it unchanged:
    /// a request while blank or busy, or a completion for a request other
    /// than the one in flight.
    pub fn apply(mut self, event: SessionEvent) -> Self {
        match event {
            SessionEvent::CharacterSelected(character) => {
                self.character = character;
            }
            SessionEvent::ScenePromptChanged(scene_prompt) => {
                self.scene_prompt = scene_prompt;
            }
            SessionEvent::GenerationRequested(generation_id) => {
                if self.can_start_generation() {
                    self.phase = PipelinePhase::GeneratingImage(generation_id);
                    self.result = None;
                    self.error = None;
                }
            }
            SessionEvent::AnalysisStarted(generation_id) => {
                if self.phase == PipelinePhase::GeneratingImage(generation_id) {
                    self.phase = PipelinePhase::AnalyzingImage(generation_id);
                }
            }
            SessionEvent::GenerationSucceeded {
                generation_id,
                result,
            } => {
                if self.phase.in_flight() == Some(generation_id) {
                    self.phase = PipelinePhase::Complete;
                    self.result = Some(result);
                }
            }
            SessionEvent::GenerationFailed {
                generation_id,
                message,
            } => {
                if self.phase.in_flight() == Some(generation_id) {
                    self.phase = PipelinePhase::Idle;
                    self.result = None;
                    self.error = Some(message);
                }
            }
        }
        self
    }
}
