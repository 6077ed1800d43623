pub mod config;
pub mod error;
pub mod kernel;
pub mod listen;
pub mod outputs;
pub mod skills;

pub use config::EngagementConfig;
pub use error::{VoiceError, VoiceResult};
pub use kernel::context::KernelContext;
pub use kernel::engagement::EngagementController;
pub use kernel::signal::SignalBus;
