//! Service startup and process exit handling
//!
//! Startup order: configuration (which installs logging), metrics, router,
//! listener. The main task then waits for SIGINT/SIGTERM and exits with the
//! signal number.

use thiserror::Error;
use tracing::{error, info};

use crate::catalog::CatalogResponse;
use crate::config::{ConfigError, ServiceConfig};
use crate::server::{
    build_router, start, AppContext, Lifecycle, MetricsError, MetricsRegistrar, ServerHandle,
    SignalListener, StartError,
};

/// Exit code for startup failures
pub const STARTUP_FAILURE_EXIT_CODE: i32 = 1;

/// Exit code when a termination signal arrives before the server is up
pub const INTERRUPTED_STARTUP_EXIT_CODE: i32 = 0;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("catalog serialization error: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("server error: {0}")]
    Start(#[from] StartError),

    #[error("signal handler error: {0}")]
    Signals(#[from] std::io::Error),
}

impl BootstrapError {
    /// Whether the failure is a broken configuration rule rather than an
    /// unexpected runtime condition
    pub fn is_rule_violation(&self) -> bool {
        matches!(self, BootstrapError::Config(_))
    }

    /// Message written to stderr before exiting
    pub fn exit_message(&self) -> String {
        if self.is_rule_violation() {
            format!("The rule is violated: {}", self)
        } else {
            format!("An unexpected exception occurred: {}", self)
        }
    }
}

/// Load configuration, register metrics, and start the listener
pub async fn bootstrap() -> Result<ServerHandle, BootstrapError> {
    let config = ServiceConfig::load()?;
    bootstrap_with(config).await
}

/// Startup with an already resolved configuration
pub async fn bootstrap_with(config: ServiceConfig) -> Result<ServerHandle, BootstrapError> {
    let port = config.api_port();
    let ctx = AppContext::new(config, &CatalogResponse::builtin(), MetricsRegistrar::new())?;
    let app = build_router(&ctx)?;

    let handle = start(app, port).await?;
    Ok(handle)
}

/// Run the service to completion and return the process exit code
pub async fn run() -> i32 {
    let mut signals = match SignalListener::install() {
        Ok(signals) => signals,
        Err(e) => {
            eprintln!("{}", BootstrapError::from(e).exit_message());
            return STARTUP_FAILURE_EXIT_CODE;
        }
    };

    let startup = tokio::select! {
        result = bootstrap() => result,
        signal = signals.recv() => {
            eprintln!("Interrupted by {} during startup", signal.name());
            return INTERRUPTED_STARTUP_EXIT_CODE;
        }
    };

    let mut handle = match startup {
        Ok(handle) => handle,
        Err(e) => {
            error!(error = %e, "Startup failed");
            eprintln!("{}", e.exit_message());
            return STARTUP_FAILURE_EXIT_CODE;
        }
    };
    info!(address = %handle.local_addr(), "Service started");

    let signal = signals.recv().await;
    let code = Lifecycle::new(&mut handle).terminate(signal).await;
    info!(exit_code = code, "Service terminated");
    code
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
