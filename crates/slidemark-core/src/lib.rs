//! # Slidemark Core
//!
//! Core types, errors, and notifications shared by the Slidemark crates.
//! Provides the coordinate and style vocabulary, the annotation error
//! taxonomy, and the canvas notification bus.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod types;

pub use data::{is_hex_color, BoundingBox, Point, ShapeStyle, Size, StyleOverrides};

pub use error::{AnnotationError, Result};

// Re-export event bus for convenience
pub use event_bus::{
    AnnotationEvent, CanvasNotification, EventBus, EventBusConfig, EventCategory, EventFilter,
    SubscriptionId,
};

// Re-export type aliases for convenience
pub use types::{shared, thread_safe, Shared, ThreadSafe};
