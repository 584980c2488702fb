//! Domain services - Pure business logic operations

mod annotation;

pub use annotation::{annotation_markers, AnnotationMarker};
