use alex::error::VoiceError;
use alex::kernel::signal::SignalBus;
use alex::listen::console::ConsoleListener;
use alex::listen::{CaptureOutcome, Listener, Utterance, WakeOutcome};
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::test]
async fn typed_wake_phrase_is_detected() {
    let bus = SignalBus::new();
    let (tx, rx) = mpsc::channel(8);
    let listener = ConsoleListener::new(rx, "alex");

    tx.send("what's up".into()).await.unwrap();
    tx.send("Good morning Alex!".into()).await.unwrap();

    let outcome = listener.listen_for_wakeword(&bus).await.unwrap();
    assert_eq!(outcome, WakeOutcome::Detected(4));
}

#[tokio::test]
async fn disengaged_capture_requires_wake_name() {
    let bus = SignalBus::new();
    let (tx, rx) = mpsc::channel(8);
    let listener = ConsoleListener::new(rx, "alex");

    tx.send("time: cmd=what time".into()).await.unwrap();
    tx.send("time: cmd=what time, id=Alex".into()).await.unwrap();

    let outcome = listener
        .listen_for_command(Duration::from_secs(5), false, &bus)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        CaptureOutcome::Understood(Utterance::new("time").slot("cmd", "what time").slot("id", "alex"))
    );
}

#[tokio::test(start_paused = true)]
async fn capture_times_out_in_silence() {
    let bus = SignalBus::new();
    let (_tx, rx) = mpsc::channel::<String>(8);
    let listener = ConsoleListener::new(rx, "alex");

    let outcome = listener
        .listen_for_command(Duration::from_secs(20), true, &bus)
        .await
        .unwrap();
    assert_eq!(outcome, CaptureOutcome::TimedOut);
}

#[tokio::test]
async fn ringing_message_interrupts_capture() {
    let bus = SignalBus::new();
    let (_tx, rx) = mpsc::channel::<String>(8);
    let listener = ConsoleListener::new(rx, "alex");

    bus.set_ringing_message("Sir?");
    let outcome = listener
        .listen_for_command(Duration::from_secs(20), true, &bus)
        .await
        .unwrap();
    assert_eq!(outcome, CaptureOutcome::Ringing("Sir?".into()));
    assert_eq!(bus.take_ringing_message(), None, "the message is consumed");
}

#[tokio::test]
async fn closed_input_is_an_error() {
    let bus = SignalBus::new();
    let (tx, rx) = mpsc::channel::<String>(8);
    let listener = ConsoleListener::new(rx, "alex");
    drop(tx);

    let err = listener.listen_for_wakeword(&bus).await.unwrap_err();
    assert!(matches!(err, VoiceError::ChannelClosed));
}
