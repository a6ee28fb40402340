//! Change notifications published after the collection is persisted.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FermentEvent {
    /// The stored collection was rewritten (add, delete, import or clear).
    DataUpdated,
}

impl FermentEvent {
    /// Event name observers subscribe to.
    pub fn name(&self) -> &'static str {
        match self {
            FermentEvent::DataUpdated => "fermentDataUpdated",
        }
    }
}

impl fmt::Display for FermentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type Listener = Box<dyn Fn(FermentEvent) + Send + Sync>;

/// Synchronous publish/subscribe hub.
///
/// Listeners run in subscription order on the publishing thread.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(FermentEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn publish(&self, event: FermentEvent) {
        tracing::debug!(event = %event, listeners = self.listeners.len(), "Publishing event");
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
