//! Application layer - Use cases orchestrating the domain
//!
//! This layer contains:
//! - Ports: the generative model interface the pipeline depends on
//! - Services: prompt building, response parsing, the generation pipeline
//!   and the session controller
//! - DTOs: serializable views of the session for HTTP and WebSocket

pub mod dto;
pub mod ports;
pub mod services;
