//! Event Bus implementation.
//!
//! Provides the per-canvas EventBus that tools and the registry publish
//! their notifications on.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use uuid::Uuid;

use super::events::{CanvasNotification, EventCategory};

/// Subscription handle for unsubscribing from notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific notifications
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive everything.
    #[default]
    All,
    /// Receive notifications matching any of these categories.
    Categories(Vec<EventCategory>),
    /// Receive notifications emitted on this element.
    Target(String),
}

impl EventFilter {
    /// Check if a notification matches this filter
    pub fn matches(&self, notification: &CanvasNotification) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => {
                categories.contains(&notification.event.category())
            }
            EventFilter::Target(target) => &notification.target == target,
        }
    }
}

/// Type alias for notification handler functions
type EventHandler = Box<dyn Fn(&CanvasNotification) + Send + Sync>;

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Whether to keep notification history.
    pub enable_history: bool,
    /// Maximum number of notifications to retain in history.
    pub max_history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            enable_history: true,
            max_history_size: 1000,
        }
    }
}

/// Per-canvas notification bus
pub struct EventBus {
    /// Registered synchronous handlers
    handlers: Arc<RwLock<HashMap<SubscriptionId, (EventFilter, EventHandler)>>>,
    /// Notification history (optional)
    history: Arc<RwLock<VecDeque<CanvasNotification>>>,
    /// Configuration
    config: EventBusConfig,
}

impl EventBus {
    /// Create a new event bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            history: Arc::new(RwLock::new(VecDeque::new())),
            config,
        }
    }

    /// Publish a notification to all matching subscribers
    ///
    /// Returns the number of handlers that received it.
    pub fn publish(&self, notification: CanvasNotification) -> usize {
        tracing::trace!(
            "Notification {} on {}",
            notification.event.name(),
            notification.target
        );

        if self.config.enable_history {
            self.add_to_history(&notification);
        }

        let handlers = self.handlers.read();
        let mut delivered = 0;
        for (_, (filter, handler)) in handlers.iter() {
            if filter.matches(&notification) {
                handler(&notification);
                delivered += 1;
            }
        }
        delivered
    }

    /// Subscribe to notifications with a synchronous handler
    ///
    /// The handler is called on the publishing thread and must not publish
    /// on the same bus.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&CanvasNotification) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        let mut handlers = self.handlers.write();
        handlers.insert(id, (filter, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Unsubscribe from notifications
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let removed = handlers.remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Notifications published so far, oldest first (if history is enabled)
    pub fn history(&self) -> Vec<CanvasNotification> {
        if !self.config.enable_history {
            return Vec::new();
        }
        self.history.read().iter().cloned().collect()
    }

    /// Names of the notifications in history, oldest first
    pub fn history_names(&self) -> Vec<&'static str> {
        self.history.read().iter().map(|n| n.event.name()).collect()
    }

    /// Clear notification history
    pub fn clear_history(&self) {
        let mut history = self.history.write();
        history.clear();
    }

    /// Get the current configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    fn add_to_history(&self, notification: &CanvasNotification) {
        let mut history = self.history.write();
        history.push_back(notification.clone());

        // Enforce max size
        while history.len() > self.config.max_history_size {
            history.pop_front();
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}
