//! Table event notifications
//!
//! Host-facing events are published on an [`EventBus`] backed by
//! `tokio::sync::broadcast`, which decouples the engine from whoever listens
//! (a page component, an audit log, a test).
//!
//! ```text
//! DataTable::toggle_row() ──┐
//! DataTable::set_sort()  ───┼──▶ EventBus::publish() ──▶ broadcast channel ──▶ subscribers
//! DataTable::set_page()  ───┘
//! ```
//!
//! Each logical change produces at most one event, and selection events carry
//! the complete current selection rather than a diff.

use crate::core::query::{PageState, SortState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events emitted by a table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TableEvent<T> {
    /// The user activated (clicked) a row
    RowActivated { record: T },
    /// The selection changed; carries every selected record
    SelectionChanged { selected: Vec<T> },
    /// The sort state changed
    SortChanged { sort: SortState },
    /// The page index or size changed
    PageChanged { page: PageState },
}

impl<T> TableEvent<T> {
    /// Get the event name
    pub fn name(&self) -> &'static str {
        match self {
            TableEvent::RowActivated { .. } => "row_activated",
            TableEvent::SelectionChanged { .. } => "selection_changed",
            TableEvent::SortChanged { .. } => "sort_changed",
            TableEvent::PageChanged { .. } => "page_changed",
        }
    }
}

/// Envelope wrapping a table event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope<T> {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: TableEvent<T>,
}

impl<T> EventEnvelope<T> {
    pub fn new(event: TableEvent<T>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus for a table
///
/// The bus is cheap to clone and can be shared across threads.
#[derive(Debug)]
pub struct EventBus<T> {
    sender: broadcast::Sender<EventEnvelope<T>>,
}

impl<T: Clone> EventBus<T> {
    /// Create a new EventBus with the given channel capacity
    ///
    /// The capacity determines how many events can be buffered before slow
    /// receivers start losing events (lagged).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails. Without subscribers the event is dropped.
    /// Returns the number of receivers that will receive the event.
    pub fn publish(&self, event: TableEvent<T>) -> usize {
        let envelope = EventEnvelope::new(event);
        tracing::trace!(event = envelope.event.name(), "Publishing table event");
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope<T>> {
        self.sender.subscribe()
    }

    /// Get the current number of active subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Clone> Default for EventBus<T> {
    fn default() -> Self {
        Self::new(1024)
    }
}
