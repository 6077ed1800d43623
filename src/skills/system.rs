use async_stream::stream;
use futures::StreamExt;
use tracing::info;

use super::{pick, Skill, SkillMessage, SkillStream};
use crate::kernel::confirm::PendingConfirmation;
use crate::kernel::context::KernelContext;
use crate::kernel::memory::{RequestStatus, Slots};

pub const INTENT: &str = "system";

const AFFIRMATIVE: &[&str] = &["yes", "yes i do", "i confirm", "yes do it", "confirmed", "yes i confirm"];
const NEGATIVE: &[&str] = &["no cancel it", "cancel it", "rejected", "i reject", "no i don't", "no"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PowerAction {
    Shutdown,
    Reboot,
}

impl PowerAction {
    fn from_cmd(cmd: &str) -> Option<Self> {
        if cmd.contains("shutdown") || cmd.contains("shut down") {
            Some(Self::Shutdown)
        } else if cmd.contains("reboot") || cmd.contains("restart") {
            Some(Self::Reboot)
        } else {
            None
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            Self::Shutdown => "shutdown",
            Self::Reboot => "reboot",
        }
    }

    fn progress(&self) -> &'static str {
        match self {
            Self::Shutdown => "Shutting down...",
            Self::Reboot => "Restarting...",
        }
    }
}

/// Power commands. Both need an explicit confirmation; a confirmed command
/// ends the process (a supervisor is expected to restart it on reboot).
pub struct SystemSkill;

impl Skill for SystemSkill {
    fn intent(&self) -> &'static str {
        INTENT
    }

    fn process(&self, slots: Slots, ctx: KernelContext) -> SkillStream {
        stream! {
            let Some(action) = slots.get("cmd").and_then(|c| PowerAction::from_cmd(c)) else {
                return;
            };

            match slots.get("ans").map(String::as_str) {
                Some(ans) if NEGATIVE.contains(&ans) => {
                    ctx.memory.record_request(INTENT, &slots, RequestStatus::Cancelled, "");
                    yield SkillMessage::answer(match action {
                        PowerAction::Shutdown => "Shutting down cancelled.",
                        PowerAction::Reboot => "Restart cancelled.",
                    });
                }
                Some(ans) if AFFIRMATIVE.contains(&ans) => {
                    ctx.memory.record_request(INTENT, &slots, RequestStatus::Completed, "");
                    let ack = pick(&["OK.", "All right!"]).unwrap_or_default();
                    info!("Confirmed {} request", action.noun());
                    ctx.bus.request_termination();
                    yield SkillMessage::answer(format!("{} {}", ack, action.progress()));
                }
                _ => {
                    let note = format!("You requested a {}. I asked for confirmation.", action.noun());
                    ctx.memory.record_request(INTENT, &slots, RequestStatus::AnswerExpected, &note);
                    let ask = pick(&["Are you sure?", "Please confirm."]).unwrap_or_default();
                    yield SkillMessage::question(
                        format!("Preparing to {}... {}", action.noun(), ask),
                        PendingConfirmation { intent: INTENT.to_string(), note },
                    );
                }
            }
        }
        .boxed()
    }
}
