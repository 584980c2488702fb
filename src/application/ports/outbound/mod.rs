//! Outbound ports - Interfaces that the application requires from external systems

mod model_port;

pub use model_port::{ContentPart, ContentRequest, ContentResponse, GenerativeModelPort, InlineData};
