//! HTTP server for the catalog and metrics endpoints
//!
//! Provides:
//! - `/` - the static DeFi project catalog
//! - `/metrics` - Prometheus process metrics
//!
//! Also provides graceful shutdown handling for SIGTERM/SIGINT.

pub mod api;
pub mod lifecycle;
pub mod metrics;
pub mod shutdown;

pub use api::{build_router, AppContext};
pub use lifecycle::{
    shutdown, start, Lifecycle, LifecycleState, ServerHandle, ShutdownError, StartError,
};
pub use metrics::{MetricsError, MetricsRegistrar};
pub use shutdown::{
    shutdown_channel, ShutdownController, ShutdownSignal, SignalListener, TerminationSignal,
};

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod shutdown_tests;
