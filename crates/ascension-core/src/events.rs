//! The event sink and the bounded in-memory event log.
//!
//! Actions and the driver only ever append. [`EventLog`] keeps the most
//! recent `capacity` events and silently discards the oldest beyond that.

use std::collections::VecDeque;

use ascension_types::{AgentId, Event};

/// Append-only destination for events.
pub trait EventSink {
    /// Record one event.
    fn record(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn record(&mut self, event: Event) {
        self.push(event);
    }
}

/// Ring buffer of recent events.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<Event>,
    capacity: usize,
    total_recorded: u64,
}

impl EventLog {
    /// An empty log keeping at most `capacity` events (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            total_recorded: 0,
        }
    }

    /// Maximum number of events kept.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of events currently held.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events recorded since creation, including discarded ones.
    pub const fn total_recorded(&self) -> u64 {
        self.total_recorded
    }

    /// Held events, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Event> {
        self.events.iter()
    }

    /// The `n` most recent events, oldest first.
    pub fn recent(&self, n: usize) -> Vec<&Event> {
        let skip = self.events.len().saturating_sub(n);
        self.events.iter().skip(skip).collect()
    }

    /// Held events concerning `actor`, oldest first.
    pub fn for_actor(&self, actor: AgentId) -> Vec<&Event> {
        self.events.iter().filter(|e| e.involves(actor)).collect()
    }

    /// Held major events, oldest first.
    pub fn major(&self) -> Vec<&Event> {
        self.events.iter().filter(|e| e.is_major).collect()
    }

    /// Held events from one tick.
    pub fn at_tick(&self, tick: u64) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }
}

impl EventSink for EventLog {
    fn record(&mut self, event: Event) {
        if self.events.len() >= self.capacity {
            self.events.pop_front();
        }
        tracing::trace!(tick = event.tick, major = event.is_major, text = %event.text, "event");
        self.events.push_back(event);
        self.total_recorded = self.total_recorded.saturating_add(1);
    }
}
