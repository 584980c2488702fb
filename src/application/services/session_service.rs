//! Session Service - Owner of the single application state
//!
//! User intents and pipeline outcomes are turned into [`SessionEvent`]s and
//! applied through the pure reducer on [`SessionState`]. Every applied event
//! publishes the new state to subscribers (the WebSocket handler).
//!
//! Generation runs as a spawned task. Only one may be in flight; there is no
//! cancellation, and a completion that no longer matches the in-flight
//! request is dropped by the reducer.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;

use crate::application::ports::outbound::GenerativeModelPort;
use crate::application::services::generation_service::{GenerationService, PipelineStage};
use crate::domain::aggregates::{SessionEvent, SessionState, GENERATION_FAILED_MESSAGE};
use crate::domain::entities::CharacterIdentity;
use crate::domain::value_objects::{GenerationId, ScenePrompt};

/// Capacity of the state update channel; slow subscribers skip ahead
const UPDATE_CHANNEL_CAPACITY: usize = 32;

/// Handle to an accepted generation request
#[derive(Debug)]
pub struct GenerationTicket {
    pub generation_id: GenerationId,
    /// Task driving the pipeline; dropping it does not stop the run
    pub task: JoinHandle<()>,
}

impl GenerationTicket {
    /// Let the run finish in the background, logging it if the task dies
    /// without reaching a completion event.
    pub fn supervise(self) -> GenerationId {
        let generation_id = self.generation_id;
        let task = self.task;
        tokio::spawn(async move {
            if let Err(e) = task.await {
                tracing::error!("Generation {} task ended abnormally: {}", generation_id, e);
            }
        });
        generation_id
    }
}

pub struct SessionService<M: GenerativeModelPort + 'static> {
    state: RwLock<SessionState>,
    generation: Arc<GenerationService<M>>,
    updates: broadcast::Sender<SessionState>,
}

impl<M: GenerativeModelPort + 'static> SessionService<M> {
    pub fn new(generation: GenerationService<M>) -> Self {
        Self::with_state(generation, SessionState::default())
    }

    pub fn with_state(generation: GenerationService<M>, state: SessionState) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(state),
            generation: Arc::new(generation),
            updates,
        }
    }

    /// Current state
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Receive every state produced from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionState> {
        self.updates.subscribe()
    }

    pub async fn select_character(&self, character: CharacterIdentity) -> SessionState {
        self.dispatch(SessionEvent::CharacterSelected(character)).await
    }

    pub async fn set_scene_prompt(&self, scene_prompt: ScenePrompt) -> SessionState {
        self.dispatch(SessionEvent::ScenePromptChanged(scene_prompt)).await
    }

    /// Start a generation for the current selection.
    ///
    /// Returns `None` without touching the state when the scene text is blank
    /// or a generation is already running.
    pub async fn start_generation(self: &Arc<Self>) -> Option<GenerationTicket> {
        let generation_id = GenerationId::new();

        let (character, scene_prompt, snapshot) = {
            let mut state = self.state.write().await;
            if !state.can_start_generation() {
                tracing::debug!(
                    "Ignoring generate request (phase: {}, blank scene: {})",
                    state.phase,
                    state.scene_prompt.is_blank()
                );
                return None;
            }
            let next = std::mem::take(&mut *state)
                .apply(SessionEvent::GenerationRequested(generation_id));
            *state = next;
            (state.character, state.scene_prompt.clone(), state.clone())
        };
        self.publish(snapshot);

        tracing::info!(
            "Starting generation {} for {} in '{}'",
            generation_id,
            character,
            scene_prompt
        );

        let service = Arc::clone(self);
        let task = tokio::spawn(async move {
            service.run_generation(generation_id, character, scene_prompt).await;
        });

        Some(GenerationTicket {
            generation_id,
            task,
        })
    }

    async fn run_generation(
        &self,
        generation_id: GenerationId,
        character: CharacterIdentity,
        scene_prompt: ScenePrompt,
    ) {
        // Stage reports come from inside the pipeline; forward them as events.
        let (stage_tx, mut stage_rx) = mpsc::unbounded_channel::<PipelineStage>();

        let pipeline = self.generation.generate_with_progress(character, &scene_prompt, move |stage| {
            let _ = stage_tx.send(stage);
        });
        let forward_stages = async {
            while let Some(stage) = stage_rx.recv().await {
                if stage == PipelineStage::AnalyzingImage {
                    tracing::info!("Generation {} is analyzing the image", generation_id);
                    self.dispatch(SessionEvent::AnalysisStarted(generation_id)).await;
                }
            }
        };

        // The sender lives in the pipeline's closure, so forwarding ends with it.
        let (outcome, ()) = tokio::join!(pipeline, forward_stages);

        let event = match outcome {
            Ok(result) => {
                tracing::info!("Generation {} complete", generation_id);
                SessionEvent::GenerationSucceeded {
                    generation_id,
                    result: Arc::new(result),
                }
            }
            Err(e) => {
                tracing::error!(
                    "Generation {} failed while {:?}: {}",
                    generation_id,
                    e.stage(),
                    e
                );
                SessionEvent::GenerationFailed {
                    generation_id,
                    message: GENERATION_FAILED_MESSAGE.to_string(),
                }
            }
        };
        self.dispatch(event).await;
    }

    async fn dispatch(&self, event: SessionEvent) -> SessionState {
        let snapshot = {
            let mut state = self.state.write().await;
            let next = std::mem::take(&mut *state).apply(event);
            *state = next;
            state.clone()
        };
        self.publish(snapshot.clone());
        snapshot
    }

    fn publish(&self, snapshot: SessionState) {
        // No subscribers is fine; the state is still current.
        let _ = self.updates.send(snapshot);
    }
}
