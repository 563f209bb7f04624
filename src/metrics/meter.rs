// Metric name constants
pub const REFRESH_SUCCESS: &str = "refresher_refresh_success_total";
pub const REFRESH_FAILURE: &str = "refresher_refresh_failure_total";
pub const STORAGE_READ_SUCCESS: &str = "refresher_storage_read_success_total";
pub const STORAGE_READ_FAILURE: &str = "refresher_storage_read_failure_total";
pub const STORAGE_WRITE_SUCCESS: &str = "refresher_storage_write_success_total";
pub const STORAGE_WRITE_FAILURE: &str = "refresher_storage_write_failure_total";
pub const NEXT_REFRESH_IN: &str = "refresher_next_refresh_in_seconds";

const NAME_LABEL: &str = "name";

/// Adds refresh successes.
pub fn add_refresh_success(name: &str, value: u64) {
    metrics::counter!(REFRESH_SUCCESS, NAME_LABEL => name.to_string()).increment(value);
}

/// Adds refresh failures.
pub fn add_refresh_failure(name: &str, value: u64) {
    metrics::counter!(REFRESH_FAILURE, NAME_LABEL => name.to_string()).increment(value);
}

/// Adds successful storage reads.
pub fn add_storage_read_success(name: &str, value: u64) {
    metrics::counter!(STORAGE_READ_SUCCESS, NAME_LABEL => name.to_string()).increment(value);
}

/// Adds failed storage reads.
pub fn add_storage_read_failure(name: &str, value: u64) {
    metrics::counter!(STORAGE_READ_FAILURE, NAME_LABEL => name.to_string()).increment(value);
}

/// Adds successful storage writes.
pub fn add_storage_write_success(name: &str, value: u64) {
    metrics::counter!(STORAGE_WRITE_SUCCESS, NAME_LABEL => name.to_string()).increment(value);
}

/// Adds failed storage writes.
pub fn add_storage_write_failure(name: &str, value: u64) {
    metrics::counter!(STORAGE_WRITE_FAILURE, NAME_LABEL => name.to_string()).increment(value);
}

/// Sets seconds left until the next scheduled refresh.
pub fn set_next_refresh_in(name: &str, seconds: f64) {
    metrics::gauge!(NEXT_REFRESH_IN, NAME_LABEL => name.to_string()).set(seconds);
}
