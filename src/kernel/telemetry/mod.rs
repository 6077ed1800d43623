//! Conversation telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a write-only side channel. Decision logic never reads it.
//!
//! # PRIVACY INVARIANT
//! Events never carry user content (utterances, slot values, spoken text).
//! Only modes, intents-by-outcome and counts are allowed.

pub mod event;
pub mod metrics;
pub mod recorder;
