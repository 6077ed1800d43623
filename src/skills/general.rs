use async_stream::stream;
use futures::StreamExt;
use tracing::debug;

use super::{Skill, SkillMessage, SkillStream};
use crate::kernel::context::KernelContext;
use crate::kernel::memory::Slots;

pub const INTENT: &str = "general";

const ANSWER_POSITIVE: &[&str] = &["what", "what do you want", "tell me", "yes", "shoot", "yes i'm here"];
const ANSWER_NEGATIVE: &[&str] = &[
    "no",
    "no i'm not",
    "not now",
    "wait",
    "wait a second",
    "wait a minute",
    "wait a few moments",
    "just a second",
    "just a moment",
];
const SAY_AGAIN: &[&str] = &["repeat", "what did you say", "excuse me"];

/// Long answers are repeated verbatim, short ones quoted.
const QUOTE_LIMIT: usize = 50;

/// Answers that only make sense against the conversation so far: replies to
/// a ringing call and "say that again".
pub struct GeneralSkill;

impl Skill for GeneralSkill {
    fn intent(&self) -> &'static str {
        INTENT
    }

    fn process(&self, slots: Slots, ctx: KernelContext) -> SkillStream {
        stream! {
            if ctx.bus.is_ringing() {
                match answers_call(&slots) {
                    Some(true) => {
                        ctx.bus.stop_ringing().await;
                        let reports: Vec<String> = ctx.reports.drain_all().map(|r| r.message).collect();
                        if reports.is_empty() {
                            yield SkillMessage::answer("Never mind, it's nothing now.");
                        } else {
                            yield SkillMessage::answer(reports.join(" "));
                        }
                        return;
                    }
                    Some(false) => {
                        yield SkillMessage::answer("OK.");
                        return;
                    }
                    None => {}
                }
            }

            let asks_again = ["cmd", "ask"]
                .iter()
                .filter_map(|k| slots.get(*k))
                .any(|v| SAY_AGAIN.contains(&v.as_str()));
            if asks_again {
                if let Some(last) = ctx.memory.last_thought() {
                    if last.message.len() > QUOTE_LIMIT {
                        yield SkillMessage::answer(format!("Sure. {}", last.message));
                    } else {
                        yield SkillMessage::answer(format!("I said {}", last.message));
                    }
                    return;
                }
            }

            if let Some(cmd) = slots.get("cmd") {
                if cmd.contains("tell me") || cmd.contains("shoot") {
                    yield SkillMessage::answer("I didn't say anything Sir.");
                    return;
                }
            }

            debug!("General request not handled: {:?}", slots.keys().collect::<Vec<_>>());
        }
        .boxed()
    }
}

/// `Some(true)` to take the call, `Some(false)` to put it off.
fn answers_call(slots: &Slots) -> Option<bool> {
    let mut answer = None;
    for value in slots.values() {
        if ANSWER_POSITIVE.contains(&value.as_str()) {
            answer = Some(true);
        } else if ANSWER_NEGATIVE.contains(&value.as_str()) {
            answer = Some(false);
        }
    }
    answer
}
