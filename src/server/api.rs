//! Catalog endpoint and application router
//!
//! - `/` - the static project catalog as JSON
//! - `/metrics` - Prometheus process metrics (mounted by [`MetricsRegistrar`])

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::catalog::CatalogResponse;
use crate::config::ServiceConfig;
use crate::server::metrics::{MetricsError, MetricsRegistrar};

/// Everything the HTTP layer needs, built once at startup
#[derive(Clone)]
pub struct AppContext {
    config: Arc<ServiceConfig>,
    catalog_body: Bytes,
    metrics: MetricsRegistrar,
}

impl AppContext {
    /// Render the catalog and bundle it with the configuration
    pub fn new(
        config: ServiceConfig,
        catalog: &CatalogResponse,
        metrics: MetricsRegistrar,
    ) -> Result<Self, serde_json::Error> {
        let catalog_body = Bytes::from(catalog.render()?);

        Ok(Self {
            config: Arc::new(config),
            catalog_body,
            metrics,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn catalog_body(&self) -> &Bytes {
        &self.catalog_body
    }

    pub fn metrics(&self) -> &MetricsRegistrar {
        &self.metrics
    }
}

/// Catalog handler
///
/// Clones the pre-rendered body, so concurrent requests share no mutable state.
async fn catalog(State(ctx): State<AppContext>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "application/json")],
        ctx.catalog_body.clone(),
    )
}

/// Router serving only `GET /`
pub fn catalog_router(ctx: AppContext) -> Router {
    Router::new().route("/", get(catalog)).with_state(ctx)
}

/// Full application: catalog plus the metrics sub-application
pub fn build_router(ctx: &AppContext) -> Result<Router, MetricsError> {
    let prefix = ctx.config().metrics_prefix().to_string();
    ctx.metrics().install(&prefix, catalog_router(ctx.clone()))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
