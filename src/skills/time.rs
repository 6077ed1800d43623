use async_stream::stream;
use chrono::Local;
use futures::StreamExt;

use super::{prior_message, Skill, SkillMessage, SkillStream};
use crate::kernel::context::KernelContext;
use crate::kernel::memory::{RequestStatus, Slots};

pub const INTENT: &str = "time";

/// Current local time and date.
pub struct TimeSkill;

impl Skill for TimeSkill {
    fn intent(&self) -> &'static str {
        INTENT
    }

    fn process(&self, slots: Slots, ctx: KernelContext) -> SkillStream {
        stream! {
            if let Some(prior) = prior_message(&slots) {
                yield SkillMessage::Prior(prior);
            }

            let now = Local::now();
            let wants_date = slots.values().any(|v| v.contains("date") || v.contains("day"));
            let answer = if wants_date {
                format!("Today is {}.", now.format("%A, %B %-d"))
            } else {
                format!("It's {}.", now.format("%-I:%M %p"))
            };

            ctx.memory.record_request(INTENT, &slots, RequestStatus::Completed, "");
            yield SkillMessage::answer(answer);
        }
        .boxed()
    }
}
