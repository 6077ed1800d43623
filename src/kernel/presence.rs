use serde::{Deserialize, Serialize};

/// Conversational modes of the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Presence {
    /// Waiting for a wake phrase. Nothing else is understood.
    Idle,
    /// Hands-free: commands are taken without the wake name.
    Engaged,
    /// Still listening, but only to utterances that carry the wake name.
    Disengaged,
}

impl Default for Presence {
    fn default() -> Self {
        Self::Idle
    }
}

/// Outcomes of one capture round that may move the presence state.
/// These are requests; the graph decides whether they apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceSignal {
    WakeDetected,
    /// A command resolved to a skill and produced an answer.
    CommandHandled,
    /// Queued reports were read out.
    ReportsDelivered,
    /// Capture ended with nothing understood.
    Silence,
    /// Too many unusable utterances in a row.
    GibberishLimit,
}

pub struct PresenceGraph;

impl PresenceGraph {
    /// Pure function: (current, signal) -> new presence.
    /// Returns `None` when the signal does not move the state.
    pub fn transition(current: Presence, signal: PresenceSignal) -> Option<Presence> {
        use Presence::*;
        use PresenceSignal::*;

        match (current, signal) {
            (Idle, WakeDetected) => Some(Engaged),

            (Engaged, Silence) => Some(Disengaged),
            (Engaged, GibberishLimit) => Some(Disengaged),

            // Answering while disengaged is an implicit re-engagement.
            (Disengaged, CommandHandled) => Some(Engaged),
            (Disengaged, ReportsDelivered) => Some(Engaged),
            (Disengaged, Silence) => Some(Idle),
            (Disengaged, GibberishLimit) => Some(Idle),

            _ => None,
        }
    }
}
