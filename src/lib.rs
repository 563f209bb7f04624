//! Keeps a short-lived value (credential, token, any expiring artifact) fresh in
//! the background so callers never do refresh bookkeeping themselves.
//!
//! ```no_run
//! use std::time::Duration;
//! use refresher::{Options, Refreshable, Refresher};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let refresher = Refresher::new(
//!     |_ctx: CancellationToken| async {
//!         Ok::<_, anyhow::Error>(Refreshable::issued_now("token".to_string(), Duration::from_secs(3600)))
//!     },
//!     Options::new(),
//! );
//! refresher.wait_for_initial_value(Duration::from_secs(10)).await?;
//! let token = refresher.current();
//! # Ok(())
//! # }
//! ```

#[path = "shared/time/mod.rs"]
pub mod time;
#[cfg(test)]
mod tests;

pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod refresher;
pub mod shutdown;
pub mod storage;
pub mod strategy;

pub use error::RefresherError;
pub use model::Refreshable;
pub use refresher::{Options, RefreshFn, Refresher, Stats};
pub use storage::Storage;
pub use strategy::RefreshStrategy;
