use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use uuid::Uuid;

/// Slot name -> spoken value, as extracted by the recognizer.
pub type Slots = BTreeMap<String, String>;

const MEMORY_LIMIT: usize = 10;
const THOUGHT_MERGE_WINDOW_SECS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Completed,
    AnswerExpected,
    Cancelled,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub intent: String,
    pub slots: Slots,
    pub status: RequestStatus,
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThoughtKind {
    Say,
    Ask,
}

/// One spoken turn. Consecutive utterances about the same topic fold into a
/// single entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThoughtEntry {
    pub timestamp: DateTime<Utc>,
    pub about: String,
    pub kind: ThoughtKind,
    pub message: String,
}

#[derive(Debug, Default)]
struct Histories {
    requests: VecDeque<RequestEntry>,
    thoughts: VecDeque<ThoughtEntry>,
}

/// Short conversation history: what the user asked and what was said back.
/// Both histories hold the last 10 entries, oldest evicted first.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    inner: Mutex<Histories>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self, intent: &str, slots: &Slots, status: RequestStatus, note: &str) {
        if intent.is_empty() || slots.is_empty() {
            return;
        }
        let entry = RequestEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            intent: intent.to_string(),
            slots: slots.clone(),
            status,
            note: note.to_string(),
        };
        push_bounded(&mut self.inner.lock().requests, entry);
    }

    pub fn record_thought(&self, message: &str, about: &str, kind: ThoughtKind) {
        self.record_thought_at(message, about, kind, Utc::now());
    }

    /// Same as [`record_thought`](Self::record_thought) with an explicit clock reading.
    pub fn record_thought_at(&self, message: &str, about: &str, kind: ThoughtKind, now: DateTime<Utc>) {
        if message.is_empty() || about.is_empty() {
            return;
        }
        let mut inner = self.inner.lock();

        if let Some(last) = inner.thoughts.back_mut() {
            let fresh = now - last.timestamp < Duration::seconds(THOUGHT_MERGE_WINDOW_SECS);
            if fresh && last.about == about {
                last.message.push(' ');
                last.message.push_str(message);
                last.timestamp = now;
                return;
            }
        }

        push_bounded(
            &mut inner.thoughts,
            ThoughtEntry {
                timestamp: now,
                about: about.to_string(),
                kind,
                message: message.to_string(),
            },
        );
    }

    pub fn last_request(&self) -> Option<RequestEntry> {
        self.inner.lock().requests.back().cloned()
    }

    pub fn last_thought(&self) -> Option<ThoughtEntry> {
        self.inner.lock().thoughts.back().cloned()
    }

    pub fn requests(&self) -> Vec<RequestEntry> {
        self.inner.lock().requests.iter().cloned().collect()
    }

    pub fn thoughts(&self) -> Vec<ThoughtEntry> {
        self.inner.lock().thoughts.iter().cloned().collect()
    }
}

fn push_bounded<T>(buf: &mut VecDeque<T>, item: T) {
    if buf.len() >= MEMORY_LIMIT {
        buf.pop_front();
    }
    buf.push_back(item);
}
