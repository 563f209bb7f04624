//! Behavioral tests for the refresher.
//!
//! Each case file drives a real refresher on the tokio runtime with scripted
//! refresh functions and storages from `support`.

mod cases_stop_test;

pub mod support;
