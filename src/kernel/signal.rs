//! Process-wide signals: termination, the ringing mailbox, and ownership of the
//! ringing task.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::ringing::{self, RingingMode};
use super::time::{tick_duration, TICK_MS};

#[derive(Debug, Default)]
struct RingingState {
    active: bool,
    /// Bumped on every start. A ringing task only acts while its generation is current.
    generation: u64,
    mode: Option<RingingMode>,
}

struct RingingWorker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct SignalBus {
    terminate: CancellationToken,
    mailbox: Mutex<Option<String>>,
    mailbox_ready: Notify,
    ringing: Mutex<RingingState>,
    // Held across start/stop so only one caller manages the ringing task at a time.
    worker: tokio::sync::Mutex<Option<RingingWorker>>,
    tick: Duration,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::with_tick(tick_duration(TICK_MS))
    }

    pub fn with_tick(tick: Duration) -> Self {
        Self {
            terminate: CancellationToken::new(),
            mailbox: Mutex::new(None),
            mailbox_ready: Notify::new(),
            ringing: Mutex::new(RingingState::default()),
            worker: tokio::sync::Mutex::new(None),
            tick,
        }
    }

    // --- Termination ---

    /// Irreversible. Every loop and the ringing task observe it.
    pub fn request_termination(&self) {
        if !self.terminate.is_cancelled() {
            info!("Termination requested");
        }
        self.terminate.cancel();
    }

    pub fn is_terminated(&self) -> bool {
        self.terminate.is_cancelled()
    }

    /// Resolves once termination has been requested.
    pub async fn terminated(&self) {
        self.terminate.cancelled().await
    }

    pub fn termination_token(&self) -> CancellationToken {
        self.terminate.clone()
    }

    // --- Mailbox ---

    /// Last writer wins. Empty messages are ignored.
    pub fn set_ringing_message(&self, msg: impl Into<String>) {
        let msg = msg.into();
        if msg.is_empty() {
            return;
        }
        debug!("Ringing message posted: {}", msg);
        *self.mailbox.lock() = Some(msg);
        self.mailbox_ready.notify_one();
    }

    /// Read-and-clear: a posted message is handed out exactly once.
    pub fn take_ringing_message(&self) -> Option<String> {
        self.mailbox.lock().take()
    }

    pub fn clear_ringing_message(&self) {
        self.mailbox.lock().take();
    }

    /// Waits for the next mailbox message and consumes it.
    /// Returns `None` once termination is requested.
    pub async fn next_ringing_message(&self) -> Option<String> {
        loop {
            if self.is_terminated() {
                return None;
            }
            if let Some(msg) = self.take_ringing_message() {
                return Some(msg);
            }
            tokio::select! {
                _ = self.terminate.cancelled() => return None,
                _ = self.mailbox_ready.notified() => {}
            }
        }
    }

    // --- Ringing ---

    pub fn is_ringing(&self) -> bool {
        self.ringing.lock().active
    }

    pub fn ringing_mode(&self) -> Option<RingingMode> {
        let state = self.ringing.lock();
        if state.active {
            state.mode
        } else {
            None
        }
    }

    /// Spawns the ringing task. Returns `false` (and logs) when ringing is
    /// already active or the process is shutting down.
    pub async fn start_ringing(self: &Arc<Self>, mode: RingingMode) -> bool {
        let mut worker = self.worker.lock().await;

        if self.is_terminated() {
            debug!("Ignoring start_ringing({:?}) during shutdown", mode);
            return false;
        }
        if self.is_ringing() {
            warn!("Something tried to start ringing on mode {:?}, but it is already started.", mode);
            return false;
        }

        // A previous run may still be on its way out after ending itself.
        if let Some(prev) = worker.take() {
            reap(prev).await;
        }

        let generation = {
            let mut state = self.ringing.lock();
            state.active = true;
            state.generation += 1;
            state.mode = Some(mode);
            state.generation
        };

        let cancel = self.terminate.child_token();
        let handle = tokio::spawn(ringing::ring(
            Arc::clone(self),
            mode,
            generation,
            cancel.clone(),
            self.tick,
        ));
        *worker = Some(RingingWorker { cancel, handle });
        true
    }

    /// Clears the active flag and the mailbox, then waits for the ringing task
    /// to exit. A no-op when nothing is ringing.
    pub async fn stop_ringing(&self) {
        let mut worker = self.worker.lock().await;
        {
            let mut state = self.ringing.lock();
            state.active = false;
            state.mode = None;
        }
        self.clear_ringing_message();

        if let Some(prev) = worker.take() {
            info!("The ringing task is running. Stopping it...");
            reap(prev).await;
        }
    }

    pub(crate) fn is_current_ringing(&self, generation: u64) -> bool {
        let state = self.ringing.lock();
        state.active && state.generation == generation
    }

    /// Called by the ringing task when its script ends. Never touches a newer run.
    pub(crate) fn finish_ringing(&self, generation: u64) {
        let mut state = self.ringing.lock();
        if state.generation == generation {
            state.active = false;
            state.mode = None;
        }
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

async fn reap(worker: RingingWorker) {
    worker.cancel.cancel();
    if let Err(e) = worker.handle.await {
        error!("Ringing task failed: {}", e);
    }
}
