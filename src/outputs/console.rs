use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

use crate::error::VoiceResult;
use crate::kernel::speech::Speaker;

/// Prints spoken lines instead of synthesizing them.
pub struct ConsoleSpeaker {
    label: String,
    out: Mutex<Stdout>,
}

impl ConsoleSpeaker {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            out: Mutex::new(tokio::io::stdout()),
        }
    }
}

#[async_trait]
impl Speaker for ConsoleSpeaker {
    async fn render(&self, text: &str) -> VoiceResult<()> {
        let line = format!("[{}] {}\n", self.label, text);
        let mut out = self.out.lock().await;
        out.write_all(line.as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }
}
