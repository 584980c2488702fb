//! Application services - Use case implementations

pub mod generation_service;
pub mod llm;
pub mod session_service;

pub use generation_service::{GenerationService, ModelSelection};
pub use session_service::SessionService;
