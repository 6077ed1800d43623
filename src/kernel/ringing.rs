use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::signal::SignalBus;
use super::time::{Tick, TICKS_PER_STEP};

/// Why the user is being called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RingingMode {
    /// Background work queued a report and the user has not picked it up yet.
    NewReport,
    /// A skill asked a question and is waiting for the answer.
    AnswerExpected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingingStep {
    Wait,
    Ring,
    Final,
    End,
}

/// Fixed escalation script for one ringing mode.
#[derive(Debug, Clone, Copy)]
pub struct RingingScript {
    pub steps: &'static [RingingStep],
    pub ring_phrases: &'static [&'static str],
    pub final_call: &'static str,
    /// Empty for a silent close.
    pub end_phrases: &'static [&'static str],
}

use RingingStep::*;

const NEW_REPORT: RingingScript = RingingScript {
    steps: &[Wait, Ring, Wait, Ring, Wait, Final, Wait, End],
    ring_phrases: &["Sir?", "Sir are you there?", "Sir!"],
    final_call: "Anyone?",
    end_phrases: &[],
};

const ANSWER_EXPECTED: RingingScript = RingingScript {
    steps: &[Ring, Wait, Ring, Wait, Final, Wait, End],
    ring_phrases: &["Sir?", "Sir I need your answer.", "Sir!"],
    final_call: "I'm about to cancel your request.",
    end_phrases: &["Ok whatever.", "Ok never mind."],
};

impl RingingMode {
    pub fn script(&self) -> RingingScript {
        match self {
            RingingMode::NewReport => NEW_REPORT,
            RingingMode::AnswerExpected => ANSWER_EXPECTED,
        }
    }
}

impl RingingScript {
    /// Total length of the script in ticks.
    pub fn duration_ticks(&self) -> u64 {
        self.steps.len() as u64 * TICKS_PER_STEP as u64
    }
}

/// Body of the ringing task.
///
/// Runs the mode's script one tick at a time. After every tick it re-checks
/// termination and whether this run is still the live one, so a `stop_ringing`
/// (or a newer run) ends it mid-sequence.
pub(crate) async fn ring(
    bus: Arc<SignalBus>,
    mode: RingingMode,
    generation: u64,
    cancel: CancellationToken,
    tick_len: Duration,
) {
    let script = mode.script();
    let mut pool: Vec<&'static str> = script.ring_phrases.to_vec();
    let mut tick = Tick::new();

    info!("Ringing started. Mode={:?}", mode);

    'script: for step in script.steps {
        for _ in 0..TICKS_PER_STEP {
            if tick.is_step_start() {
                perform(&bus, mode, *step, &script, &mut pool, generation);
            }
            tick = tick.next();

            if bus.is_terminated() || !bus.is_current_ringing(generation) {
                break 'script;
            }

            tokio::select! {
                _ = cancel.cancelled() => break 'script,
                _ = tokio::time::sleep(tick_len) => {}
            }
        }
    }

    bus.finish_ringing(generation);
    debug!("Ringing task exited after {} ticks", tick.frame);
}

fn perform(
    bus: &SignalBus,
    mode: RingingMode,
    step: RingingStep,
    script: &RingingScript,
    pool: &mut Vec<&'static str>,
    generation: u64,
) {
    match step {
        RingingStep::Wait => {}
        RingingStep::Ring => {
            if pool.is_empty() {
                return;
            }
            let idx = rand::rng().random_range(0..pool.len());
            let phrase = pool.swap_remove(idx);
            bus.set_ringing_message(phrase);
        }
        RingingStep::Final => bus.set_ringing_message(script.final_call),
        RingingStep::End => {
            // NewReport closes silently
            if let Some(phrase) = script.end_phrases.choose(&mut rand::rng()) {
                bus.set_ringing_message(*phrase);
                bus.finish_ringing(generation);
                info!("Ringing gave up waiting. Mode={:?}", mode);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_expected_rings_first_and_ends_loud() {
        let script = RingingMode::AnswerExpected.script();
        assert_eq!(script.steps.first(), Some(&RingingStep::Ring));
        assert_eq!(script.steps.last(), Some(&RingingStep::End));
        assert!(!script.end_phrases.is_empty());
        assert_eq!(script.duration_ticks(), 35);
    }

    #[test]
    fn new_report_waits_first_and_ends_silent() {
        let script = RingingMode::NewReport.script();
        assert_eq!(script.steps.first(), Some(&RingingStep::Wait));
        assert!(script.end_phrases.is_empty());
        let rings = script.steps.iter().filter(|s| **s == RingingStep::Ring).count();
        assert!(rings <= script.ring_phrases.len());
    }
}
