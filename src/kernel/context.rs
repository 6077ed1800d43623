use std::sync::Arc;

use super::memory::ConversationMemory;
use super::reports::ReportQueue;
use super::signal::SignalBus;

/// The shared resources every part of the assistant works against.
///
/// Constructed once at startup and handed out by clone; nothing here is a
/// global.
#[derive(Clone, Default)]
pub struct KernelContext {
    pub bus: Arc<SignalBus>,
    pub reports: Arc<ReportQueue>,
    pub memory: Arc<ConversationMemory>,
}

impl KernelContext {
    pub fn new(bus: SignalBus) -> Self {
        Self {
            bus: Arc::new(bus),
            reports: Arc::new(ReportQueue::new()),
            memory: Arc::new(ConversationMemory::new()),
        }
    }

    /// Queue a report and call the user about it. Used by background producers.
    pub async fn report(&self, message: impl Into<String>, category: impl Into<String>) {
        self.reports.enqueue(message, category);
        self.bus
            .start_ringing(super::ringing::RingingMode::NewReport)
            .await;
    }
}
