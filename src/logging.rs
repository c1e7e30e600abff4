//! Process-wide tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::LogLevel;

/// Install the global fmt subscriber at the given level
///
/// Only the first call per process takes effect; later calls are ignored so
/// tests can load configuration repeatedly.
pub fn init(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level.filter_directive()))
        .with_target(true)
        .try_init();
}
