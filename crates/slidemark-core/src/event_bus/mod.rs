//! # Notification Bus Module
//!
//! Named canvas notifications (`polygon_created`, `marker_deleted`, ...)
//! are published here instead of being triggered on DOM elements.
//!
//! ## Overview
//!
//! Every canvas owns its own bus, so two annotation surfaces never see each
//! other's notifications. Handlers run synchronously on the publishing
//! thread, in publish order.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use slidemark_core::event_bus::{EventBus, EventFilter, EventCategory};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Marker]),
//!     |notification| println!("{}", notification.event.name()),
//! );
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
