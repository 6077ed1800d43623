use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An asynchronous notification waiting for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub message: String,
    pub category: String,
}

/// Unbounded buffer of pending reports.
///
/// Reports come back out most-recent-first. That ordering is kept on purpose:
/// the newest report is the one delivered first.
#[derive(Debug, Default)]
pub struct ReportQueue {
    pending: Mutex<Vec<Report>>,
}

impl ReportQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, message: impl Into<String>, category: impl Into<String>) {
        let report = Report {
            message: message.into(),
            category: category.into(),
        };
        debug!("A report is added: {:?}", report);
        self.pending.lock().push(report);
    }

    /// Lazily pops reports, newest first. Stopping early leaves the rest queued.
    pub fn drain_all(&self) -> ReportDrain<'_> {
        ReportDrain { queue: self }
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

pub struct ReportDrain<'a> {
    queue: &'a ReportQueue,
}

impl Iterator for ReportDrain<'_> {
    type Item = Report;

    fn next(&mut self) -> Option<Report> {
        // One lock per pop so producers can keep appending between items.
        let report = self.queue.pending.lock().pop();
        if let Some(r) = &report {
            debug!("Next to report: {:?}", r);
        }
        report
    }
}
