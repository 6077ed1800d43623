use serde::Serialize;
use std::collections::VecDeque;

use super::event::{ConfirmationEvent, DispatchOutcome, TelemetryEvent};
use crate::kernel::presence::Presence;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    pub presence_stats: PresenceStats,
    pub dispatch_stats: DispatchStats,
    pub ringing_stats: RingingStats,
    pub confirmation_stats: ConfirmationStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PresenceStats {
    pub transitions: u64,
    pub wakeups: u64,
    pub demotions: u64,
    pub idle_returns: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchStats {
    pub handled: u64,
    pub gibberish: u64,
    pub ignored: u64,
    pub success_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RingingStats {
    pub interruptions: u64,
    pub reminders: u64,
    pub reports_delivered: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfirmationStats {
    pub installed: u64,
    pub answered: u64,
    pub declined: u64,
    pub abandoned: u64,
    pub force_cleared: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::PresenceTransition { from, to } => {
                let p = &mut snap.presence_stats;
                p.transitions += 1;
                match (from, to) {
                    (Presence::Idle, Presence::Engaged) => p.wakeups += 1,
                    (Presence::Engaged, Presence::Disengaged) => p.demotions += 1,
                    (_, Presence::Idle) => p.idle_returns += 1,
                    _ => {}
                }
            }
            TelemetryEvent::RingingInterruption { reminder, .. } => {
                snap.ringing_stats.interruptions += 1;
                if *reminder {
                    snap.ringing_stats.reminders += 1;
                }
            }
            TelemetryEvent::ReportsDelivered { count } => {
                snap.ringing_stats.reports_delivered += *count as u64;
            }
            TelemetryEvent::Dispatch { outcome } => match outcome {
                DispatchOutcome::Handled => snap.dispatch_stats.handled += 1,
                DispatchOutcome::Gibberish => snap.dispatch_stats.gibberish += 1,
                DispatchOutcome::Ignored => snap.dispatch_stats.ignored += 1,
            },
            TelemetryEvent::Confirmation(c) => {
                let s = &mut snap.confirmation_stats;
                match c {
                    ConfirmationEvent::Installed => s.installed += 1,
                    ConfirmationEvent::Answered => s.answered += 1,
                    ConfirmationEvent::Declined => s.declined += 1,
                    ConfirmationEvent::Abandoned => s.abandoned += 1,
                    ConfirmationEvent::ForceCleared => s.force_cleared += 1,
                }
            }
        }
    }

    let d = &mut snap.dispatch_stats;
    let attempts = d.handled + d.gibberish + d.ignored;
    if attempts > 0 {
        d.success_ratio = d.handled as f64 / attempts as f64;
    }

    snap
}
