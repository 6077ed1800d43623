use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::memory::{ConversationMemory, ThoughtKind};
use crate::error::VoiceResult;

/// Text-to-speech output. Rendering and playback live outside the kernel.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn render(&self, text: &str) -> VoiceResult<()>;
}

/// The speak step: renders a line and, if it was actually spoken, remembers it.
#[derive(Clone)]
pub struct Speech {
    speaker: Arc<dyn Speaker>,
    memory: Arc<ConversationMemory>,
}

impl Speech {
    pub fn new(speaker: Arc<dyn Speaker>, memory: Arc<ConversationMemory>) -> Self {
        Self { speaker, memory }
    }

    pub async fn say(&self, text: &str, about: &str) -> bool {
        self.speak(text, about, ThoughtKind::Say).await
    }

    pub async fn ask(&self, text: &str, about: &str) -> bool {
        self.speak(text, about, ThoughtKind::Ask).await
    }

    pub async fn speak(&self, text: &str, about: &str, kind: ThoughtKind) -> bool {
        if text.is_empty() {
            return false;
        }
        info!("ALEX ({}): {}", about, text);
        match self.speaker.render(text).await {
            Ok(()) => {
                self.memory.record_thought(text, about, kind);
                true
            }
            Err(e) => {
                warn!("Sorry! My speech engine is disconnected: {}", e);
                false
            }
        }
    }
}
