//! WebSocket handler for live session updates
//!
//! Each connection gets a snapshot on connect, then every state change the
//! session publishes. Clients may also send intents over the same socket.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};

use crate::application::dto::SessionSnapshotDto;
use crate::domain::entities::CharacterIdentity;
use crate::domain::value_objects::{ClientId, ScenePrompt};
use crate::infrastructure::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let client_id = ClientId::new();

    // Create a channel for sending messages to this client
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    tracing::info!("New WebSocket connection established: {}", client_id);

    // Subscribe before reading the snapshot so no update falls between them
    let mut updates = state.session.subscribe();
    let snapshot = state.session.state().await;
    let _ = tx.send(ServerMessage::StateUpdated {
        state: SessionSnapshotDto::from(&snapshot),
    });

    // Spawn a task to forward messages from the channel to the WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Forward published state changes
    let update_task = {
        let tx = tx.clone();
        tokio::spawn(async move {
            loop {
                match updates.recv().await {
                    Ok(session) => {
                        let msg = ServerMessage::StateUpdated {
                            state: SessionSnapshotDto::from(&session),
                        };
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "Client {} lagged behind by {} state updates",
                            client_id,
                            skipped
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    };

    // Handle incoming messages
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => {
                    if let Some(response) = handle_message(msg, &state).await {
                        if tx.send(response).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to parse message: {}", e);
                    let error = ServerMessage::Error {
                        code: "PARSE_ERROR".to_string(),
                        message: format!("Invalid message format: {}", e),
                    };
                    if tx.send(error).is_err() {
                        break;
                    }
                }
            },
            Ok(Message::Close(_)) => {
                tracing::info!("WebSocket connection closed by client: {}", client_id);
                break;
            }
            Err(e) => {
                tracing::error!("WebSocket error for client {}: {}", client_id, e);
                break;
            }
            _ => {}
        }
    }

    update_task.abort();
    send_task.abort();

    tracing::info!("WebSocket connection terminated: {}", client_id);
}

/// Apply a client intent; state changes reach the client through the update stream
async fn handle_message(msg: ClientMessage, state: &AppState) -> Option<ServerMessage> {
    match msg {
        ClientMessage::SelectCharacter { character } => {
            state.session.select_character(character).await;
            None
        }
        ClientMessage::SetScenePrompt { scene_prompt } => {
            state
                .session
                .set_scene_prompt(ScenePrompt::new(scene_prompt))
                .await;
            None
        }
        ClientMessage::Generate => match state.session.start_generation().await {
            Some(ticket) => {
                tracing::debug!("Generation {} started over WebSocket", ticket.supervise());
                None
            }
            None => Some(ServerMessage::Error {
                code: "GENERATION_REJECTED".to_string(),
                message: "A generation is running or the scene is empty".to_string(),
            }),
        },
        ClientMessage::Ping => Some(ServerMessage::Pong),
    }
}

/// Messages from the browser to the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    SelectCharacter { character: CharacterIdentity },
    SetScenePrompt { scene_prompt: String },
    /// Start a generation for the current selection
    Generate,
    Ping,
}

/// Messages from the server to the browser
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Full view of the session after any change
    StateUpdated { state: SessionSnapshotDto },
    Error { code: String, message: String },
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::SessionState;

    #[test]
    fn test_client_messages_parse() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type": "SelectCharacter", "character": "Zenitsu"}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::SelectCharacter {
                character: CharacterIdentity::Zenitsu
            }
        ));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type": "SetScenePrompt", "scene_prompt": "露营"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::SetScenePrompt { scene_prompt } if scene_prompt == "露营"));

        let msg: ClientMessage = serde_json::from_str(r#"{"type": "Generate"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Generate));
    }

    #[test]
    fn test_unknown_client_message_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type": "Teleport"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(
            r#"{"type": "SelectCharacter", "character": "Pikachu"}"#
        )
        .is_err());
    }

    #[test]
    fn test_state_update_carries_phase() {
        let msg = ServerMessage::StateUpdated {
            state: SessionSnapshotDto::from(&SessionState::default()),
        };
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["type"], "StateUpdated");
        assert_eq!(value["state"]["phase"], "idle");
        assert_eq!(value["state"]["loading"], false);
    }

    #[test]
    fn test_pong_serializes_as_bare_tag() {
        let value = serde_json::to_value(&ServerMessage::Pong).unwrap();
        assert_eq!(value, serde_json::json!({"type": "Pong"}));
    }
}
