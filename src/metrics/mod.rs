//! Metrics emitted through the `metrics` facade.
//!
//! The library never installs an exporter; hosts wire one up (Prometheus etc.)
//! and the counters below show up labelled by refresher name.

pub mod meter;

// Re-export commonly used items
pub use meter::*;
