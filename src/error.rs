//! Error types for the conversation kernel.
//!
//! None of these cross the engagement loop: the controller degrades every
//! failure to a spoken apology or to silence.

use thiserror::Error;

pub type VoiceResult<T> = Result<T, VoiceError>;

/// Failures reported by the external collaborators (recognizer, speech output).
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Speech rendering error: {0}")]
    Speech(String),

    #[error("Input channel closed")]
    ChannelClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
