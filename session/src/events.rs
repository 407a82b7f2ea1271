use std::collections::VecDeque;

use lacquer_core::material::MaterialKey;
use lacquer_core::settings::MaterialSettings;

use crate::state::SessionState;

/// Notifications for the UI surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A scene was indexed; these keys are selectable.
    KeysPopulated(Vec<MaterialKey>),
    /// The draft of the active key changed; rebind the form.
    SettingsChanged {
        key: MaterialKey,
        settings: MaterialSettings,
    },
    /// Transient, non-fatal message.
    Status(String),
    /// A save was rejected; the user must pull or force.
    Conflict {
        key: MaterialKey,
        server_settings: MaterialSettings,
        server_revision: u64,
    },
    StateChanged(SessionState),
}

/// Bounded FIFO of session notifications, emptied by the UI with
/// [`drain`](Self::drain).
///
/// A host that stops draining loses the oldest events once `capacity` is
/// reached; [`dropped`](Self::dropped) counts them. Every event carries the
/// full current value, so a UI that missed some only has to apply the
/// latest ones.
pub struct EventQueue<T> {
    events: VecDeque<T>,
    capacity: usize,
    dropped: usize,
}

impl<T> EventQueue<T> {
    /// Events kept by [`new`](Self::new) before the oldest are dropped.
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// A queue holding at most `capacity` events (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    /// Queue an event, evicting the oldest one if the queue is full.
    pub fn send(&mut self, event: T) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
            if self.dropped == 1 || self.dropped.is_power_of_two() {
                log::debug!("Session events are not being drained; {} dropped", self.dropped);
            }
        }
        self.events.push_back(event);
    }

    /// Removes and returns every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        self.events.drain(..).collect()
    }

    /// Queued events, oldest first, without removing them.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events evicted because the queue was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for EventQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("events", &self.events)
            .field("dropped", &self.dropped)
            .finish()
    }
}
