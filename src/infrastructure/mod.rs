//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Gemini: image generation and image analysis
//! - HTTP: JSON session API and the word card page
//! - WebSocket: live state updates to the browser
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod gemini;
pub mod http;
pub mod state;
pub mod websocket;
