use std::time::Duration;

/// Shared secrets a connection presents on signon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secrets {
    pub admin: String,
    pub monitor: String,
}

impl Default for Secrets {
    fn default() -> Self {
        Self {
            admin: "firefly-admin-dev".to_string(),
            monitor: "firefly-monitor-dev".to_string(),
        }
    }
}

/// Dispatch configuration.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub secrets: Secrets,
    /// Minimum spacing between tally pushes to monitors.
    pub monitor_interval: Duration,
    /// Bounded inbox size for the dispatch actor.
    pub inbox_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            secrets: Secrets::default(),
            monitor_interval: Duration::from_millis(100),
            inbox_capacity: 1024,
        }
    }
}
