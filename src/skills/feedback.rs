use futures::stream::{self, StreamExt};

use super::{pick, Skill, SkillMessage, SkillStream};
use crate::kernel::context::KernelContext;
use crate::kernel::memory::Slots;

pub const INTENT: &str = "feedback";

/// Thanks and complaints.
pub struct FeedbackSkill;

impl Skill for FeedbackSkill {
    fn intent(&self) -> &'static str {
        INTENT
    }

    fn process(&self, slots: Slots, _ctx: KernelContext) -> SkillStream {
        let reply = if slots.get("positive").is_some_and(|p| p.contains("thank")) {
            pick(&["Always!", "Always Sir.", "Any time Sir.", "You're welcome Sir."])
        } else if slots.contains_key("negative") {
            pick(&["Well, no one is perfect!", "Sorry!", "I'm sorry to hear that."])
        } else {
            None
        };

        stream::iter(reply.map(SkillMessage::answer)).boxed()
    }
}
