use serde::{Deserialize, Serialize};

use crate::kernel::presence::Presence;
use crate::kernel::ringing::RingingMode;

// Allowed: modes, counts, enums
// Forbidden: utterances, slot values, spoken text

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    PresenceTransition {
        from: Presence,
        to: Presence,
    },

    /// Capture was cut short by a ringing message.
    RingingInterruption {
        mode: Option<RingingMode>,
        reminder: bool,
    },

    ReportsDelivered {
        count: usize,
    },

    Dispatch {
        outcome: DispatchOutcome,
    },

    Confirmation(ConfirmationEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchOutcome {
    Handled,
    Gibberish,
    /// Fallback intent heard while disengaged.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationEvent {
    Installed,
    Answered,
    Declined,
    Abandoned,
    ForceCleared,
}
