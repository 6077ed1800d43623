mod common;

use alex::kernel::context::KernelContext;
use alex::kernel::presence::Presence;
use alex::listen::Utterance;
use alex::skills::SkillRegistry;
use alex::{EngagementConfig, EngagementController};
use common::{Heard, RecordingSpeaker, ScriptedListener};
use std::sync::Arc;

fn harness(
    script: Vec<Heard>,
) -> (EngagementController, KernelContext, Arc<ScriptedListener>, Arc<RecordingSpeaker>) {
    let ctx = KernelContext::default();
    let listener = Arc::new(ScriptedListener::new(script));
    let speaker = Arc::new(RecordingSpeaker::new());
    let controller = EngagementController::new(
        EngagementConfig::default(),
        ctx.clone(),
        listener.clone(),
        speaker.clone(),
        SkillRegistry::with_defaults(),
    );
    (controller, ctx, listener, speaker)
}

fn unknown() -> Heard {
    Heard::Says(Utterance::new("weather").slot("cmd", "forecast"))
}

#[tokio::test]
async fn wake_then_command_stays_engaged() {
    let (mut controller, ctx, _, speaker) = harness(vec![
        Heard::Wake(0),
        Heard::Says(Utterance::new("time").slot("ask", "tell me").slot("obj", "time")),
    ]);

    controller.run().await;

    assert_eq!(controller.presence(), Presence::Engaged);
    let lines = speaker.lines();
    assert_eq!(lines.len(), 3, "wake reply, courtesy line, answer: {:?}", lines);
    assert!(lines[2].starts_with("It's"));
    assert_eq!(ctx.memory.last_request().map(|r| r.intent).as_deref(), Some("time"));
    assert_eq!(controller.telemetry().snapshot().dispatch_stats.handled, 1);
}

#[tokio::test]
async fn unused_wake_phrase_keeps_idle() {
    let (mut controller, _, _, speaker) = harness(vec![Heard::Wake(7)]);

    controller.step().await;

    assert_eq!(controller.presence(), Presence::Idle);
    assert!(speaker.lines().is_empty());
}

#[tokio::test]
async fn repeated_gibberish_disengages() {
    let (mut controller, _, _, _) = harness(vec![Heard::Wake(1), unknown(), unknown()]);

    controller.step().await;
    controller.step().await;
    controller.step().await;
    assert_eq!(controller.presence(), Presence::Engaged);
    assert_eq!(controller.state().gibberish_count, 2);

    let (mut controller, _, _, _) =
        harness(vec![Heard::Wake(1), unknown(), unknown(), unknown()]);
    controller.run().await;
    assert_eq!(controller.presence(), Presence::Disengaged);
    assert_eq!(controller.state().gibberish_count, 0);
    assert_eq!(controller.telemetry().snapshot().dispatch_stats.gibberish, 3);
}

#[tokio::test]
async fn silence_walks_down_to_idle() {
    let (mut controller, _, _, _) = harness(vec![Heard::Wake(0), Heard::Silence, Heard::Silence]);

    controller.step().await;
    controller.step().await;
    assert_eq!(controller.presence(), Presence::Disengaged);
    controller.step().await;
    assert_eq!(controller.presence(), Presence::Idle);

    let stats = controller.telemetry().snapshot().presence_stats;
    assert_eq!(stats.transitions, 3);
}

#[tokio::test]
async fn broken_capture_counts_as_silence() {
    let (mut controller, _, _, _) = harness(vec![Heard::Wake(0), Heard::Broken]);

    controller.step().await;
    controller.step().await;

    assert_eq!(controller.presence(), Presence::Disengaged);
}

#[tokio::test(start_paused = true)]
async fn broken_wake_capture_backs_off_and_retries() {
    let (mut controller, _, listener, _) = harness(vec![Heard::Broken, Heard::Wake(0)]);

    controller.step().await;
    assert_eq!(controller.presence(), Presence::Idle);
    controller.step().await;
    assert_eq!(controller.presence(), Presence::Engaged);
    assert_eq!(listener.remaining(), 0);
}

#[tokio::test]
async fn reports_are_read_newest_first_with_one_address() {
    let (mut controller, ctx, _, speaker) = harness(vec![Heard::Wake(0)]);
    controller.step().await;

    ctx.reports.enqueue("The build finished.", "builds");
    ctx.reports.enqueue("It will rain.", "weather");
    ctx.bus.set_ringing_message("Sir?");
    controller.step().await;

    let lines = speaker.lines();
    assert_eq!(&lines[1..], ["Sir, It will rain.", "The build finished."]);
    assert!(ctx.reports.is_empty());
    assert_eq!(controller.presence(), Presence::Engaged);

    let stats = controller.telemetry().snapshot().ringing_stats;
    assert_eq!(stats.interruptions, 1);
    assert_eq!(stats.reports_delivered, 2);
}

#[tokio::test]
async fn reports_reengage_a_disengaged_user() {
    let (mut controller, ctx, _, speaker) = harness(vec![Heard::Wake(0), Heard::Silence]);
    controller.step().await;
    controller.step().await;
    assert_eq!(controller.presence(), Presence::Disengaged);

    ctx.reports.enqueue("Mail from Ana.", "mail");
    ctx.bus.set_ringing_message("Sir are you there?");
    controller.step().await;

    assert_eq!(controller.presence(), Presence::Engaged);
    assert_eq!(speaker.lines().last().map(String::as_str), Some("Sir, Mail from Ana."));
}

#[tokio::test]
async fn ringing_while_idle_is_spoken_without_waking() {
    let (mut controller, ctx, _, speaker) = harness(vec![]);
    ctx.bus.set_ringing_message("Anyone?");

    controller.step().await;

    assert_eq!(controller.presence(), Presence::Idle);
    assert_eq!(speaker.lines(), vec!["Anyone?"]);
    assert_eq!(ctx.memory.last_thought().map(|t| t.about).as_deref(), Some("ringing"));
}

#[tokio::test]
async fn disengaged_ignores_fallback_until_limit() {
    let mut script = vec![Heard::Wake(0), Heard::Silence];
    for _ in 0..6 {
        script.push(Heard::Says(Utterance::new("general").slot("id", "alex").slot("ans", "yes")));
    }
    let (mut controller, _, _, speaker) = harness(script);

    controller.run().await;

    assert_eq!(controller.presence(), Presence::Idle);
    assert_eq!(speaker.lines().len(), 1, "only the wake reply is spoken");
    assert_eq!(controller.telemetry().snapshot().dispatch_stats.ignored, 6);
}

#[tokio::test]
async fn named_command_reengages() {
    let (mut controller, ctx, _, _) = harness(vec![
        Heard::Wake(0),
        Heard::Silence,
        Heard::Says(Utterance::new("time").slot("id", "alex").slot("cmd", "what time")),
    ]);

    controller.step().await;
    controller.step().await;
    controller.step().await;

    assert_eq!(controller.presence(), Presence::Engaged);
    let last = ctx.memory.last_request().unwrap();
    assert!(!last.slots.contains_key("id"), "id slot is stripped before dispatch");
}

#[tokio::test]
async fn failed_speech_is_not_remembered() {
    let ctx = KernelContext::default();
    let mut controller = EngagementController::new(
        EngagementConfig::default(),
        ctx.clone(),
        Arc::new(ScriptedListener::new(vec![Heard::Wake(0)])),
        Arc::new(RecordingSpeaker::broken()),
        SkillRegistry::with_defaults(),
    );

    controller.step().await;

    assert_eq!(controller.presence(), Presence::Engaged);
    assert!(ctx.memory.last_thought().is_none());
}
