// Package refresher provides counters for refresh and storage outcomes.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::metrics;

/// Counters for refresh and storage operations of one refresher.
#[derive(Default)]
pub struct Counters {
    /// Successful refreshes (initial one included).
    pub refresh_success: AtomicU64,
    /// Failed refreshes (initial one included).
    pub refresh_failure: AtomicU64,
    pub storage_read_success: AtomicU64,
    pub storage_read_failure: AtomicU64,
    pub storage_write_success: AtomicU64,
    pub storage_write_failure: AtomicU64,
}

/// Point-in-time copy of [`Counters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub refresh_success: u64,
    pub refresh_failure: u64,
    pub storage_read_success: u64,
    pub storage_read_failure: u64,
    pub storage_write_success: u64,
    pub storage_write_failure: u64,
}

impl Counters {
    /// Creates new counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refreshed(&self, name: &str) {
        self.refresh_success.fetch_add(1, Ordering::Relaxed);
        metrics::add_refresh_success(name, 1);
    }

    pub fn refresh_failed(&self, name: &str) {
        self.refresh_failure.fetch_add(1, Ordering::Relaxed);
        metrics::add_refresh_failure(name, 1);
    }

    pub fn storage_read(&self, name: &str) {
        self.storage_read_success.fetch_add(1, Ordering::Relaxed);
        metrics::add_storage_read_success(name, 1);
    }

    pub fn storage_read_failed(&self, name: &str) {
        self.storage_read_failure.fetch_add(1, Ordering::Relaxed);
        metrics::add_storage_read_failure(name, 1);
    }

    pub fn storage_written(&self, name: &str) {
        self.storage_write_success.fetch_add(1, Ordering::Relaxed);
        metrics::add_storage_write_success(name, 1);
    }

    pub fn storage_write_failed(&self, name: &str) {
        self.storage_write_failure.fetch_add(1, Ordering::Relaxed);
        metrics::add_storage_write_failure(name, 1);
    }

    /// Returns a snapshot of all counters.
    pub fn snapshot(&self) -> Stats {
        Stats {
            refresh_success: self.refresh_success.load(Ordering::Relaxed),
            refresh_failure: self.refresh_failure.load(Ordering::Relaxed),
            storage_read_success: self.storage_read_success.load(Ordering::Relaxed),
            storage_read_failure: self.storage_read_failure.load(Ordering::Relaxed),
            storage_write_success: self.storage_write_success.load(Ordering::Relaxed),
            storage_write_failure: self.storage_write_failure.load(Ordering::Relaxed),
        }
    }
}
