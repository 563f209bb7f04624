use super::{Config, Logs, Schedule, StrategyConfig};
use std::time::Duration;

/// Creates a new test configuration.
pub fn new_test_config() -> Config {
    Config {
        env: super::TEST.to_string(),
        logs: Some(Logs {
            level: Some("debug".to_string()),
        }),
        schedule: Schedule {
            name: Some("test".to_string()),
            retry_delay: Duration::from_millis(50),
            initial_timeout: Duration::from_secs(1),
            stats_interval: Duration::from_millis(20),
            strategy: StrategyConfig::TwoThirds,
        },
        storage: None,
    }
}
