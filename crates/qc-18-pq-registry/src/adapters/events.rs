//! Event sink adapters.

use crate::events::RegistryEvent;
use crate::ports::outbound::EventSink;
use parking_lot::Mutex;
use tracing::info;

/// Collects published events in memory.
///
/// Used by tests and by the CLI to report what a batch produced.
#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    events: Mutex<Vec<RegistryEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far.
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.events.lock().clone()
    }

    /// Remove and return all collected events.
    pub fn drain(&self) -> Vec<RegistryEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for InMemoryEventSink {
    fn publish(&self, event: RegistryEvent) {
        self.events.lock().push(event);
    }
}

/// Writes each event to the log and drops it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, event: RegistryEvent) {
        info!(
            topic = event.topic(),
            height = event.height(),
            "[qc-18] 📣 {:?}",
            event
        );
    }
}
