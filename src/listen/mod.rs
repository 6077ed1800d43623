//! Capture side of the assistant.
//!
//! Wake-word spotting and intent/slot extraction are done by an external
//! recognizer. The kernel only sees the [`Listener`] trait: a capture call
//! that can be cut short by the ringing mailbox or by termination.

pub mod console;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::VoiceResult;
use crate::kernel::memory::Slots;
use crate::kernel::signal::SignalBus;

/// Wake phrases, in recognizer index order.
pub const WAKE_PHRASES: [&str; 5] = [
    "hey alex",
    "alex you there",
    "alex you up",
    "alex come up",
    "good morning alex",
];

/// A recognized command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub intent: String,
    pub slots: Slots,
}

impl Utterance {
    pub fn new(intent: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            slots: Slots::new(),
        }
    }

    pub fn slot(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakeOutcome {
    /// Index into [`WAKE_PHRASES`].
    Detected(usize),
    /// The wait was interrupted by a ringing message, already consumed.
    Ringing(String),
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Understood(Utterance),
    /// The capture was interrupted by a ringing message, already consumed.
    Ringing(String),
    TimedOut,
    Terminated,
}

#[async_trait]
pub trait Listener: Send + Sync {
    /// Blocks until a wake phrase is heard, a ringing message is posted, or
    /// termination is requested.
    async fn listen_for_wakeword(&self, bus: &SignalBus) -> VoiceResult<WakeOutcome>;

    /// Blocks until a command is understood, `timeout` elapses, a ringing
    /// message is posted, or termination is requested. With `engaged == false`
    /// only utterances whose `id` slot carries the wake name are returned.
    async fn listen_for_command(
        &self,
        timeout: Duration,
        engaged: bool,
        bus: &SignalBus,
    ) -> VoiceResult<CaptureOutcome>;
}

/// Name gate for disengaged capture ("alexandra" also passes for "alex").
pub fn carries_wake_name(slots: &Slots, wake_name: &str) -> bool {
    slots
        .get("id")
        .map(|id| id.to_lowercase().contains(&wake_name.to_lowercase()))
        .unwrap_or(false)
}

pub fn wake_index(text: &str) -> Option<usize> {
    let normalized = normalize(text);
    WAKE_PHRASES.iter().position(|p| *p == normalized)
}

/// Parses `intent: key=value, key=value`. A bare `intent` has no slots.
pub fn parse_utterance(text: &str) -> Option<Utterance> {
    let text = text.trim();
    let (intent, rest) = match text.split_once(':') {
        Some((intent, rest)) => (intent.trim(), rest),
        None => (text, ""),
    };
    if intent.is_empty() || intent.contains(char::is_whitespace) {
        return None;
    }

    let mut utterance = Utterance::new(intent.to_lowercase());
    for pair in rest.split(',').filter(|p| !p.trim().is_empty()) {
        let (key, value) = pair.split_once('=')?;
        let (key, value) = (key.trim(), normalize(value));
        if key.is_empty() || value.is_empty() {
            return None;
        }
        utterance.slots.insert(key.to_lowercase(), value);
    }
    Some(utterance)
}

fn normalize(text: &str) -> String {
    text.trim()
        .trim_matches(|c: char| matches!(c, '?' | '!' | '.' | ',' | '"'))
        .to_lowercase()
}
