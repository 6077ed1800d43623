use chrono::{Local, Timelike};

use super::pick;

/// Reply to a wake phrase, by recognizer index. `None` for phrases that are
/// detected but not used.
pub fn wakeup_response(index: usize) -> Option<String> {
    wakeup_response_at(index, Local::now().hour())
}

pub fn wakeup_response_at(index: usize, hour: u32) -> Option<String> {
    match index {
        0 => pick(&["Hey?", "Sir?", "Boss?", "Tell me?"]),
        1 => pick(&["Always!", "I'm here?", "Sir?", "Always Sir.", "Yes."]),
        2 => pick(&["At your service Sir.", "At your service!", "Always Sir."]),
        3 => pick(&["At your service Sir.", "What can I do for you?", "Tell me?"]),
        4 if hour > 11 => Some("Hello Sir.".to_string()),
        4 => pick(&["Good morning Sir!", "Good morning!", "Good morning Sir?"]),
        _ => None,
    }
}
