//! Runtime configuration for the engine and daemon.
//!
//! Built from CLI flags in `main.rs`. Nothing is read from or written to
//! disk; history never outlives the process.

use std::time::Duration;

/// Default history depth.
pub const DEFAULT_CAPACITY: usize = 5;

/// Default clipboard poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// History engine settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of history entries. Must be at least 1.
    pub capacity: usize,
    /// Run the secret heuristic on copied text.
    pub protect_sensitive: bool,
    /// Application identities suppressed in addition to the built-in
    /// password-manager list.
    pub extra_denied_apps: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            protect_sensitive: false,
            extra_denied_apps: Vec::new(),
        }
    }
}

/// Daemon settings.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub poll_interval: Duration,
    pub engine: EngineConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            engine: EngineConfig::default(),
        }
    }
}
