//! Refresher: the value holder and its background refresh loop.

pub mod counters;
pub mod hooks;
pub mod options;
pub mod refresher;
pub mod signal;
pub mod telemetry;

// Re-export main types
pub use counters::Stats;
pub use hooks::{ErrorHook, Hooks, ValueHook};
pub use options::{Options, DEFAULT_NAME, DEFAULT_RETRY_DELAY};
pub use refresher::{RefreshFn, Refresher};
