//! Dispatch of recognized commands, including the ask-and-wait confirmation
//! protocol.
//!
//! When a skill ends with a follow-up question the responder remembers it as
//! a [`PendingConfirmation`] and starts AnswerExpected ringing. While that
//! ringing lasts, the next utterance is first offered to the pending question.
//! Abandonment is left to the ringing script: once its AnswerExpected run
//! ends, the question is dropped by the next ringing message or utterance,
//! whichever comes first. Neither is handled as an answer.

use futures::StreamExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use super::context::KernelContext;
use super::memory::Slots;
use super::ringing::RingingMode;
use super::speech::Speech;
use super::telemetry::event::{ConfirmationEvent, TelemetryEvent};
use super::telemetry::recorder::TelemetryRecorder;
use crate::listen::Utterance;
use crate::skills::{pick, Skill, SkillMessage, SkillRegistry};

const APOLOGY: &str = "Sorry Sir, I wasn't able to complete your request.";
const ASK_WHAT: &[&str] = &["what", "what do you want"];
const NOT_NOW: &str = "not now";

/// A question a skill is waiting on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    /// Skill that asked and will receive the answer.
    pub intent: String,
    /// What was asked, in words, for "what do you want?".
    pub note: String,
}

pub struct Responder {
    ctx: KernelContext,
    speech: Speech,
    skills: SkillRegistry,
    fallback_intent: String,
    pending: Mutex<Option<PendingConfirmation>>,
    telemetry: Arc<TelemetryRecorder>,
}

impl Responder {
    pub fn new(
        ctx: KernelContext,
        speech: Speech,
        skills: SkillRegistry,
        fallback_intent: impl Into<String>,
        telemetry: Arc<TelemetryRecorder>,
    ) -> Self {
        Self {
            ctx,
            speech,
            skills,
            fallback_intent: fallback_intent.into(),
            pending: Mutex::new(None),
            telemetry,
        }
    }

    pub fn pending(&self) -> Option<PendingConfirmation> {
        self.pending.lock().clone()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// True while the question is still being rung for. Once the AnswerExpected
    /// escalation ends, a leftover question is stale even if other ringing
    /// (a new report) has started since.
    pub fn awaiting_answer(&self) -> bool {
        self.has_pending() && self.ctx.bus.ringing_mode() == Some(RingingMode::AnswerExpected)
    }

    /// Drops a question the escalation gave up on. Leaves any ringing alone.
    /// Returns whether a question was dropped.
    pub fn abandon(&self) -> bool {
        let Some(pending) = self.pending.lock().take() else {
            return false;
        };
        info!("Question about {:?} expired", pending.intent);
        self.telemetry
            .record(TelemetryEvent::Confirmation(ConfirmationEvent::Abandoned));
        true
    }

    pub fn is_fallback(&self, intent: &str) -> bool {
        intent == self.fallback_intent
    }

    /// Drops the pending question and silences its ringing.
    pub async fn clear_expectation(&self) {
        self.pending.lock().take();
        self.ctx.bus.stop_ringing().await;
    }

    /// Used when the conversation goes idle. Only touches the bus when a
    /// question was actually pending, so report ringing keeps calling.
    pub async fn force_clear(&self) {
        if self.pending.lock().is_none() {
            return;
        }
        debug!("Clearing the pending question on the way to idle");
        self.clear_expectation().await;
        self.telemetry
            .record(TelemetryEvent::Confirmation(ConfirmationEvent::ForceCleared));
    }

    /// Handles one recognized utterance. Returns `true` when something useful
    /// was said back; `false` counts as gibberish for the caller.
    pub async fn respond(&self, utterance: Utterance) -> bool {
        let Utterance { intent, mut slots } = utterance;
        slots.remove("id");

        if let Some(pending) = self.pending() {
            if self.awaiting_answer() {
                return self.resolve_pending(pending, intent, slots).await;
            }
            // The escalation already gave up: the utterance was most likely
            // meant for the dropped question, so it is not dispatched.
            self.abandon();
            return false;
        }

        if let Some(skill) = self.skills.task(&intent) {
            return self.run_skill(&intent, slots, skill).await;
        }
        if let Some(skill) = self.skills.general(&intent) {
            return self.run_skill(&intent, slots, skill).await;
        }

        debug!("No associated task for: {}", intent);
        false
    }

    async fn resolve_pending(&self, pending: PendingConfirmation, intent: String, slots: Slots) -> bool {
        let target = if self.is_fallback(&intent) {
            let ask = slots.get("ask").map(String::as_str);
            if ask.is_some_and(|a| ASK_WHAT.contains(&a)) {
                return self.speech.say(&pending.note, &pending.intent).await;
            }
            // Only a question-shaped reply can put the question off.
            if ask.is_some() && slots.values().any(|v| v == NOT_NOW) {
                self.clear_expectation().await;
                self.telemetry
                    .record(TelemetryEvent::Confirmation(ConfirmationEvent::Declined));
                let ok = pick(&["OK.", "OK then!"]).unwrap_or_default();
                self.speech.say(&ok, &self.fallback_intent).await;
                return true;
            }

            // Carry the earlier request forward; the answer's slots win.
            let merged = match self.ctx.memory.last_request() {
                Some(last) if last.intent == pending.intent => {
                    let mut merged = last.slots;
                    merged.extend(slots);
                    merged
                }
                _ => slots,
            };
            self.skills
                .task(&pending.intent)
                .map(|skill| (pending.intent.clone(), merged, skill))
        } else {
            // A direct request for another skill supersedes the question.
            self.skills.task(&intent).map(|skill| (intent, slots, skill))
        };

        let Some((intent, slots, skill)) = target else {
            debug!("Utterance does not answer the pending question");
            return false;
        };

        self.clear_expectation().await;
        self.telemetry
            .record(TelemetryEvent::Confirmation(ConfirmationEvent::Answered));
        self.run_skill(&intent, slots, skill).await
    }

    /// Speaks every prior line, then the final answer. A final answer with a
    /// follow-up installs it as the pending question. No answer at all, or an
    /// empty one, gets an apology and counts as a failed dispatch.
    async fn run_skill(&self, intent: &str, slots: Slots, skill: Arc<dyn Skill>) -> bool {
        let mut messages = skill.process(slots, self.ctx.clone());

        while let Some(message) = messages.next().await {
            match message {
                SkillMessage::Prior(text) => {
                    self.speech.say(&text, intent).await;
                }
                SkillMessage::Final { message, follow_up } => {
                    if message.is_empty() {
                        self.speech.say(APOLOGY, intent).await;
                        return false;
                    }
                    match follow_up {
                        Some(question) => self.install(question, &message, intent).await,
                        None => {
                            self.speech.say(&message, intent).await;
                        }
                    }
                    return true;
                }
            }
        }

        debug!("Skill {} produced no answer", intent);
        self.speech.say(APOLOGY, intent).await;
        false
    }

    async fn install(&self, question: PendingConfirmation, message: &str, intent: &str) {
        *self.pending.lock() = Some(question);
        self.telemetry
            .record(TelemetryEvent::Confirmation(ConfirmationEvent::Installed));
        self.speech.ask(message, intent).await;

        // A question outranks report ringing; the reports stay queued.
        if self.ctx.bus.ringing_mode() == Some(RingingMode::NewReport) {
            self.ctx.bus.stop_ringing().await;
        }
        self.ctx.bus.start_ringing(RingingMode::AnswerExpected).await;
    }
}
