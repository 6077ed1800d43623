//! Skills turn a resolved `(intent, slots)` into spoken answers.
//!
//! A skill yields zero or more [`SkillMessage::Prior`] lines followed by one
//! [`SkillMessage::Final`]. A final answer may carry a follow-up question,
//! which makes the responder wait for a confirmation.

pub mod feedback;
pub mod general;
pub mod system;
pub mod time;
pub mod wakeup;

use futures::stream::BoxStream;
use rand::seq::IndexedRandom;
use std::collections::HashMap;
use std::sync::Arc;

use crate::kernel::confirm::PendingConfirmation;
use crate::kernel::context::KernelContext;
use crate::kernel::memory::Slots;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillMessage {
    /// Courtesy or progress line spoken before the answer.
    Prior(String),
    Final {
        message: String,
        follow_up: Option<PendingConfirmation>,
    },
}

impl SkillMessage {
    pub fn answer(message: impl Into<String>) -> Self {
        SkillMessage::Final {
            message: message.into(),
            follow_up: None,
        }
    }

    pub fn question(message: impl Into<String>, follow_up: PendingConfirmation) -> Self {
        SkillMessage::Final {
            message: message.into(),
            follow_up: Some(follow_up),
        }
    }
}

pub type SkillStream = BoxStream<'static, SkillMessage>;

pub trait Skill: Send + Sync {
    fn intent(&self) -> &'static str;

    /// Side effects (recording the request, shutting down, ...) happen while
    /// the stream is consumed, not when it is created.
    fn process(&self, slots: Slots, ctx: KernelContext) -> SkillStream;
}

/// Task skills can take over a pending confirmation. General skills are the
/// fallback family (repeat, feedback) and never do.
#[derive(Default, Clone)]
pub struct SkillRegistry {
    tasks: HashMap<&'static str, Arc<dyn Skill>>,
    general: HashMap<&'static str, Arc<dyn Skill>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_task(Arc::new(system::SystemSkill));
        registry.register_task(Arc::new(time::TimeSkill));
        registry.register_general(Arc::new(general::GeneralSkill));
        registry.register_general(Arc::new(feedback::FeedbackSkill));
        registry
    }

    pub fn register_task(&mut self, skill: Arc<dyn Skill>) {
        self.tasks.insert(skill.intent(), skill);
    }

    pub fn register_general(&mut self, skill: Arc<dyn Skill>) {
        self.general.insert(skill.intent(), skill);
    }

    pub fn task(&self, intent: &str) -> Option<Arc<dyn Skill>> {
        self.tasks.get(intent).cloned()
    }

    pub fn general(&self, intent: &str) -> Option<Arc<dyn Skill>> {
        self.general.get(intent).cloned()
    }
}

/// Courtesy line matching how the request was phrased, if any.
pub fn prior_message(slots: &Slots) -> Option<String> {
    let pool: &[&str] = if let Some(adj) = slots.get("adj") {
        if adj.contains("can you") {
            &["Of course!", "Absolutely!"]
        } else if adj.contains("could you") {
            &["Of course!", "I'd be delighted to.", "Yes."]
        } else {
            &[]
        }
    } else if let Some(ask) = slots.get("ask") {
        if ["tell me", "give me", "can you"].iter().any(|p| ask.contains(p)) {
            &["OK.", "Of course!", "Yes Sir.", "Sure.", "Sir!"]
        } else if ask.contains("have you got") || ask.contains("do you know") {
            &["Yes.", "I do Sir."]
        } else if ask.contains("can i have") || ask.contains("may i have") {
            &["Always Sir!", "Of course!", "Sure.", "Absolutely!", "Certainly!"]
        } else {
            &[]
        }
    } else if slots.contains_key("cmd") {
        &["Sure.", "OK.", "Sir!", "Yes Sir."]
    } else {
        &[]
    };

    pick(pool)
}

pub(crate) fn pick(pool: &[&str]) -> Option<String> {
    pool.choose(&mut rand::rng()).map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(pairs: &[(&str, &str)]) -> Slots {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn polite_requests_get_a_courtesy_line() {
        assert!(prior_message(&slots(&[("adj", "can you")])).is_some());
        assert!(prior_message(&slots(&[("ask", "tell me the time")])).is_some());
        assert!(prior_message(&slots(&[("cmd", "shutdown")])).is_some());
    }

    #[test]
    fn plain_requests_get_none() {
        assert_eq!(prior_message(&slots(&[("ans", "yes")])), None);
        assert_eq!(prior_message(&slots(&[("ask", "what")])), None);
    }

    #[test]
    fn registry_separates_tasks_from_general() {
        let registry = SkillRegistry::with_defaults();
        assert!(registry.task("system").is_some());
        assert!(registry.task("general").is_none());
        assert!(registry.general("general").is_some());
        assert!(registry.general("feedback").is_some());
    }
}
