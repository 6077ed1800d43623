pub mod confirm;
pub mod context;
pub mod engagement;
pub mod memory;
pub mod presence;
pub mod reports;
pub mod ringing;
pub mod signal;
pub mod speech;
pub mod telemetry;
pub mod time;
