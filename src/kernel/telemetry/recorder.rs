use parking_lot::Mutex;
use std::collections::VecDeque;

use super::event::TelemetryEvent;
use super::metrics::{compute_snapshot, TelemetrySnapshot};

const MAX_EVENTS: usize = 10_000;

/// Bounded event log. Shared between the controller and the responder, so
/// recording only needs `&self`.
#[derive(Debug)]
pub struct TelemetryRecorder {
    buffer: Mutex<VecDeque<TelemetryEvent>>,
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(64)),
        }
    }

    pub fn record(&self, event: TelemetryEvent) {
        let mut buffer = self.buffer.lock();
        if buffer.len() >= MAX_EVENTS {
            buffer.pop_front();
        }
        buffer.push_back(event);
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        compute_snapshot(&self.buffer.lock())
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.buffer.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}
