//! Aggregates - Cluster of domain objects treated as a single unit

pub mod session_state;

pub use session_state::{PipelinePhase, SessionEvent, SessionState, GENERATION_FAILED_MESSAGE};
