//! Domain layer - Core business logic with no I/O
//!
//! This layer contains:
//! - Entities: the character catalog and generated vocabulary cards
//! - Value Objects: scene prompts, bounding boxes, identifiers
//! - Aggregates: the session state and its pure transition function
//! - Domain Services: annotation layout

pub mod aggregates;
pub mod entities;
pub mod services;
pub mod value_objects;
