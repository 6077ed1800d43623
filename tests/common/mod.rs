#![allow(dead_code)]

use alex::error::{VoiceError, VoiceResult};
use alex::kernel::signal::SignalBus;
use alex::kernel::speech::Speaker;
use alex::listen::{CaptureOutcome, Listener, Utterance, WakeOutcome};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

/// One thing the scripted recognizer "hears".
#[derive(Debug, Clone)]
pub enum Heard {
    Wake(usize),
    Says(Utterance),
    Silence,
    Broken,
}

/// Recognizer that replays a fixed script. A posted ringing message always
/// wins over the next scripted entry. Once the script runs out it requests
/// termination.
#[derive(Default)]
pub struct ScriptedListener {
    script: Mutex<VecDeque<Heard>>,
}

impl ScriptedListener {
    pub fn new(script: impl IntoIterator<Item = Heard>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }

    fn next(&self, bus: &SignalBus) -> Option<Heard> {
        let next = self.script.lock().pop_front();
        if next.is_none() {
            bus.request_termination();
        }
        next
    }
}

#[async_trait]
impl Listener for ScriptedListener {
    async fn listen_for_wakeword(&self, bus: &SignalBus) -> VoiceResult<WakeOutcome> {
        loop {
            if let Some(msg) = bus.take_ringing_message() {
                return Ok(WakeOutcome::Ringing(msg));
            }
            match self.next(bus) {
                None => return Ok(WakeOutcome::Terminated),
                Some(Heard::Wake(index)) => return Ok(WakeOutcome::Detected(index)),
                Some(Heard::Broken) => return Err(VoiceError::Capture("microphone unplugged".into())),
                Some(_) => continue,
            }
        }
    }

    async fn listen_for_command(
        &self,
        _timeout: Duration,
        _engaged: bool,
        bus: &SignalBus,
    ) -> VoiceResult<CaptureOutcome> {
        if let Some(msg) = bus.take_ringing_message() {
            return Ok(CaptureOutcome::Ringing(msg));
        }
        match self.next(bus) {
            None => Ok(CaptureOutcome::Terminated),
            Some(Heard::Says(utterance)) => Ok(CaptureOutcome::Understood(utterance)),
            Some(Heard::Broken) => Err(VoiceError::Capture("microphone unplugged".into())),
            Some(Heard::Wake(_)) | Some(Heard::Silence) => Ok(CaptureOutcome::TimedOut),
        }
    }
}

/// Speaker that keeps every rendered line.
#[derive(Default)]
pub struct RecordingSpeaker {
    lines: Mutex<Vec<String>>,
    broken: bool,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn broken() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            broken: true,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn render(&self, text: &str) -> VoiceResult<()> {
        if self.broken {
            return Err(VoiceError::Speech("no output device".into()));
        }
        self.lines.lock().push(text.to_string());
        Ok(())
    }
}
