use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use super::{carries_wake_name, parse_utterance, wake_index, CaptureOutcome, Listener, WakeOutcome};
use crate::error::{VoiceError, VoiceResult};
use crate::kernel::signal::SignalBus;

/// Stand-in recognizer fed with typed lines.
///
/// Wake phrases are matched against [`super::WAKE_PHRASES`]; commands use the
/// `intent: key=value, ...` form.
pub struct ConsoleListener {
    lines: Mutex<mpsc::Receiver<String>>,
    wake_name: String,
}

impl ConsoleListener {
    pub fn new(lines: mpsc::Receiver<String>, wake_name: impl Into<String>) -> Self {
        Self {
            lines: Mutex::new(lines),
            wake_name: wake_name.into(),
        }
    }
}

#[async_trait]
impl Listener for ConsoleListener {
    async fn listen_for_wakeword(&self, bus: &SignalBus) -> VoiceResult<WakeOutcome> {
        let mut lines = self.lines.lock().await;
        debug!("Going idle...");

        loop {
            tokio::select! {
                msg = bus.next_ringing_message() => {
                    return Ok(match msg {
                        Some(msg) => WakeOutcome::Ringing(msg),
                        None => WakeOutcome::Terminated,
                    });
                }
                line = lines.recv() => {
                    let line = line.ok_or(VoiceError::ChannelClosed)?;
                    if let Some(index) = wake_index(&line) {
                        return Ok(WakeOutcome::Detected(index));
                    }
                }
            }
        }
    }

    async fn listen_for_command(
        &self,
        timeout: Duration,
        engaged: bool,
        bus: &SignalBus,
    ) -> VoiceResult<CaptureOutcome> {
        let mut lines = self.lines.lock().await;
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                msg = bus.next_ringing_message() => {
                    return Ok(match msg {
                        Some(msg) => CaptureOutcome::Ringing(msg),
                        None => CaptureOutcome::Terminated,
                    });
                }
                _ = &mut deadline => return Ok(CaptureOutcome::TimedOut),
                line = lines.recv() => {
                    let line = line.ok_or(VoiceError::ChannelClosed)?;
                    let Some(utterance) = parse_utterance(&line) else {
                        debug!("Not understood: {:?}", line);
                        continue;
                    };
                    if !engaged && !carries_wake_name(&utterance.slots, &self.wake_name) {
                        debug!("Ignoring {:?} without the wake name", utterance.intent);
                        continue;
                    }
                    return Ok(CaptureOutcome::Understood(utterance));
                }
            }
        }
    }
}
