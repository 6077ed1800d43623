use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::confirm::Responder;
use super::context::KernelContext;
use super::presence::{Presence, PresenceGraph, PresenceSignal};
use super::ringing::RingingMode;
use super::speech::{Speaker, Speech};
use super::telemetry::event::{DispatchOutcome, TelemetryEvent};
use super::telemetry::recorder::TelemetryRecorder;
use crate::config::EngagementConfig;
use crate::listen::{CaptureOutcome, Listener, Utterance, WakeOutcome};
use crate::skills::wakeup::wakeup_response;
use crate::skills::SkillRegistry;

/// Pause before retrying a wake-word capture that failed outright.
const CAPTURE_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct EngagementState {
    pub presence: Presence,
    /// Unusable utterances since entering the current mode.
    pub gibberish_count: u32,
    pub last_activity: Instant,
}

impl Default for EngagementState {
    fn default() -> Self {
        Self {
            presence: Presence::Idle,
            gibberish_count: 0,
            last_activity: Instant::now(),
        }
    }
}

/// Drives the idle -> engaged -> disengaged -> idle conversation loop.
///
/// Each [`step`](Self::step) performs exactly one capture for the current
/// mode and applies its outcome. Captures are cut short by the ringing
/// mailbox, which is how background reports and reminders get a word in.
pub struct EngagementController {
    config: EngagementConfig,
    ctx: KernelContext,
    listener: Arc<dyn Listener>,
    speech: Speech,
    responder: Responder,
    telemetry: Arc<TelemetryRecorder>,
    state: EngagementState,
}

impl EngagementController {
    pub fn new(
        config: EngagementConfig,
        ctx: KernelContext,
        listener: Arc<dyn Listener>,
        speaker: Arc<dyn Speaker>,
        skills: SkillRegistry,
    ) -> Self {
        let telemetry = Arc::new(TelemetryRecorder::new());
        let speech = Speech::new(speaker, Arc::clone(&ctx.memory));
        let responder = Responder::new(
            ctx.clone(),
            speech.clone(),
            skills,
            config.fallback_intent.clone(),
            Arc::clone(&telemetry),
        );

        Self {
            config,
            ctx,
            listener,
            speech,
            responder,
            telemetry,
            state: EngagementState::default(),
        }
    }

    pub fn presence(&self) -> Presence {
        self.state.presence
    }

    pub fn state(&self) -> &EngagementState {
        &self.state
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    pub fn telemetry(&self) -> &TelemetryRecorder {
        &self.telemetry
    }

    /// Runs until termination is requested.
    pub async fn run(&mut self) {
        info!("Conversation loop started. Presence: {:?}", self.state.presence);
        while !self.ctx.bus.is_terminated() {
            self.step().await;
        }
        info!("Conversation loop stopped");
    }

    pub async fn step(&mut self) {
        match self.state.presence {
            Presence::Idle => self.idle_step().await,
            Presence::Engaged => self.engaged_step().await,
            Presence::Disengaged => self.disengaged_step().await,
        }
    }

    async fn idle_step(&mut self) {
        match self.listener.listen_for_wakeword(&self.ctx.bus).await {
            Ok(WakeOutcome::Detected(index)) => match wakeup_response(index) {
                Some(reply) => {
                    self.speech.say(&reply, "wakeup").await;
                    self.apply(PresenceSignal::WakeDetected).await;
                }
                None => debug!("Non-used wakeup phrase detected: {}", index),
            },
            Ok(WakeOutcome::Ringing(msg)) => {
                // Something wants the user while idle: say it and keep waiting.
                info!("Ringing detected while idle");
                self.record_interruption(false);
                self.speech.say(&msg, "ringing").await;
            }
            Ok(WakeOutcome::Terminated) => {}
            Err(e) => {
                warn!("Wake word capture failed: {}", e);
                tokio::select! {
                    _ = self.ctx.bus.terminated() => {}
                    _ = tokio::time::sleep(CAPTURE_RETRY_DELAY) => {}
                }
            }
        }
    }

    async fn engaged_step(&mut self) {
        debug!("Engaged. Listening...");
        match self.capture(self.config.engaged_timeout(), true).await {
            CaptureOutcome::Ringing(msg) => {
                self.on_ringing(msg).await;
            }
            CaptureOutcome::Understood(utterance) => {
                if self.dispatch(utterance).await {
                    return;
                }
                self.state.gibberish_count += 1;
                if self.state.gibberish_count > self.config.engaged_gibberish_limit {
                    self.apply(PresenceSignal::GibberishLimit).await;
                }
            }
            CaptureOutcome::TimedOut => {
                debug!("Nothing understood. Disengaging...");
                self.apply(PresenceSignal::Silence).await;
            }
            CaptureOutcome::Terminated => {}
        }
    }

    async fn disengaged_step(&mut self) {
        debug!("Not engaged. Listening for the wake name...");
        match self.capture(self.config.disengaged_timeout(), false).await {
            CaptureOutcome::Ringing(msg) => {
                if self.on_ringing(msg).await {
                    self.apply(PresenceSignal::ReportsDelivered).await;
                }
            }
            CaptureOutcome::Understood(utterance) => {
                if self.responder.is_fallback(&utterance.intent) {
                    self.telemetry.record(TelemetryEvent::Dispatch {
                        outcome: DispatchOutcome::Ignored,
                    });
                    self.count_disengaged_gibberish().await;
                } else if self.dispatch(utterance).await {
                    self.apply(PresenceSignal::CommandHandled).await;
                } else {
                    self.count_disengaged_gibberish().await;
                }
            }
            CaptureOutcome::TimedOut => {
                debug!("Nothing understood. Going idle...");
                self.apply(PresenceSignal::Silence).await;
            }
            CaptureOutcome::Terminated => {}
        }
    }

    async fn count_disengaged_gibberish(&mut self) {
        self.state.gibberish_count += 1;
        // Trips on the first utterance past the limit (the 6th with the default 5).
        if self.state.gibberish_count > self.config.disengaged_gibberish_limit {
            info!("Max gibberish limit reached. Going idle...");
            self.apply(PresenceSignal::GibberishLimit).await;
        }
    }

    /// A failing recognizer counts as hearing nothing.
    async fn capture(&self, timeout: Duration, engaged: bool) -> CaptureOutcome {
        match self
            .listener
            .listen_for_command(timeout, engaged, &self.ctx.bus)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Capture failed, treating as nothing understood: {}", e);
                CaptureOutcome::TimedOut
            }
        }
    }

    async fn dispatch(&mut self, utterance: Utterance) -> bool {
        debug!("Processing intent={}", utterance.intent);
        let handled = self.responder.respond(utterance).await;
        let outcome = if handled {
            self.state.last_activity = Instant::now();
            DispatchOutcome::Handled
        } else {
            DispatchOutcome::Gibberish
        };
        self.telemetry.record(TelemetryEvent::Dispatch { outcome });
        handled
    }

    /// A question still being rung for turns the message into a reminder.
    /// Otherwise the ringing was about reports: stop it and read them out.
    /// Returns whether reports were delivered.
    async fn on_ringing(&mut self, msg: String) -> bool {
        if self.responder.has_pending() {
            match self.ctx.bus.ringing_mode() {
                Some(RingingMode::AnswerExpected) => {
                    self.record_interruption(true);
                    self.speech.ask(&msg, "ringing").await;
                    return false;
                }
                None => {
                    // The escalation's closing line: say it and drop the question.
                    self.record_interruption(true);
                    self.speech.say(&msg, "ringing").await;
                    self.responder.abandon();
                    return false;
                }
                Some(RingingMode::NewReport) => {
                    self.responder.abandon();
                }
            }
        }

        self.record_interruption(false);
        self.ctx.bus.stop_ringing().await;
        self.deliver_reports().await;
        true
    }

    /// Reads out queued reports, newest first, addressing the user on the first.
    async fn deliver_reports(&mut self) -> usize {
        let mut delivered = 0;
        for report in self.ctx.reports.drain_all() {
            let text = if delivered == 0 {
                format!("{}, {}", self.config.title, report.message)
            } else {
                report.message
            };
            self.speech.say(&text, &report.category).await;
            delivered += 1;

            if self.ctx.bus.is_terminated() {
                break;
            }
        }
        self.state.last_activity = Instant::now();
        self.telemetry
            .record(TelemetryEvent::ReportsDelivered { count: delivered });
        delivered
    }

    fn record_interruption(&self, reminder: bool) {
        self.telemetry.record(TelemetryEvent::RingingInterruption {
            mode: self.ctx.bus.ringing_mode(),
            reminder,
        });
    }

    async fn apply(&mut self, signal: PresenceSignal) {
        let from = self.state.presence;
        let Some(to) = PresenceGraph::transition(from, signal) else {
            return;
        };

        info!("Presence {:?} -> {:?} ({:?})", from, to, signal);
        self.state.presence = to;
        self.state.gibberish_count = 0;
        if to == Presence::Engaged {
            self.state.last_activity = Instant::now();
        }
        self.telemetry
            .record(TelemetryEvent::PresenceTransition { from, to });

        if to == Presence::Idle {
            self.responder.force_clear().await;
        }
    }
}
