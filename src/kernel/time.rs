use std::time::Duration;

/// Duration of one ringing tick in milliseconds.
pub const TICK_MS: u64 = 1000;

/// Every ringing step occupies this many ticks. Only the first tick acts.
pub const TICKS_PER_STEP: u32 = 5;

/// Number of whole ticks elapsed since a ringing run started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tick {
    pub frame: u64,
}

impl Tick {
    pub fn new() -> Self {
        Tick { frame: 0 }
    }

    pub fn next(&self) -> Self {
        Tick { frame: self.frame + 1 }
    }

    /// Ticks are grouped into fixed windows, one per ringing step.
    pub fn is_step_start(&self) -> bool {
        self.frame % TICKS_PER_STEP as u64 == 0
    }
}

impl Default for Tick {
    fn default() -> Self {
        Self::new()
    }
}

pub fn tick_duration(ms: u64) -> Duration {
    Duration::from_millis(ms.max(1))
}
