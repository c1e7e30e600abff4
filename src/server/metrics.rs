//! Prometheus registry and `/metrics` exposition
//!
//! The registry is owned by the application instead of using the crate's
//! default registry, which pre-registers an unnamespaced process collector.
//! Only the namespaced process collector installed here is exported.

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use prometheus::{Encoder, Registry, TextEncoder};
use thiserror::Error;
use tracing::{info, warn};

pub const METRICS_PATH: &str = "/metrics";

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Metrics collector already registered: {0}")]
    DuplicateRegistration(String),

    #[error("Failed to register metrics collector: {0}")]
    Registration(String),

    #[error("Failed to encode metrics: {0}")]
    Encode(String),
}

impl From<prometheus::Error> for MetricsError {
    fn from(err: prometheus::Error) -> Self {
        match err {
            prometheus::Error::AlreadyReg => MetricsError::DuplicateRegistration(err.to_string()),
            other => MetricsError::Registration(other.to_string()),
        }
    }
}

/// Owns the process metrics registry
#[derive(Clone, Default)]
pub struct MetricsRegistrar {
    registry: Registry,
}

impl MetricsRegistrar {
    /// Create a registrar with an empty registry
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Register the process collector under `prefix` and mount `/metrics`
    ///
    /// Requests to `/metrics` are answered by the exposition handler, every
    /// other path falls through to `app`. Calling this twice on the same
    /// registry fails with [`MetricsError::DuplicateRegistration`].
    pub fn install(&self, prefix: &str, app: Router) -> Result<Router, MetricsError> {
        self.register_process_collector(prefix)?;
        info!(prefix = %prefix, path = METRICS_PATH, "Prometheus metrics registered");

        Ok(self.router().merge(app))
    }

    #[cfg(target_os = "linux")]
    fn register_process_collector(&self, prefix: &str) -> Result<(), MetricsError> {
        use prometheus::process_collector::{pid_t, ProcessCollector};

        let collector = ProcessCollector::new(std::process::id() as pid_t, prefix);
        self.registry.register(Box::new(collector))?;
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn register_process_collector(&self, prefix: &str) -> Result<(), MetricsError> {
        warn!(
            prefix = %prefix,
            "Process metrics are only collected on Linux; /metrics will be empty"
        );
        Ok(())
    }

    /// Encode the registry in the Prometheus text format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| MetricsError::Encode(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| MetricsError::Encode(e.to_string()))
    }

    fn router(&self) -> Router {
        Router::new()
            .route(METRICS_PATH, get(metrics))
            .with_state(self.clone())
    }
}

/// Prometheus metrics handler
///
/// Returns metrics in Prometheus text format for scraping.
async fn metrics(State(registrar): State<MetricsRegistrar>) -> impl IntoResponse {
    match registrar.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Metrics scrape failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
#[path = "metrics_test.rs"]
mod tests;
