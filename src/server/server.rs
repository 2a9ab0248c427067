use std::sync::Arc;
use anyhow::Result;
use axum::Router;
use tracing::info;

use crate::config::settings::SettingsConfig;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::provider::FatSecretGateway;
use crate::server::routes;
use crate::serving::normalizer::ServingNormalizer;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<FatSecretGateway>,
    pub normalizer: Arc<ServingNormalizer>,
    pub metrics_state: MetricsState,
}

impl AppState {
    pub fn new(
        metrics: &Metrics,
        gateway: FatSecretGateway,
        normalizer: ServingNormalizer,
    ) -> Self {
        Self {
            gateway: Arc::new(gateway),
            normalizer: Arc::new(normalizer),
            metrics_state: MetricsState::new(metrics.registry.clone()),
        }
    }
}

pub fn router(settings_config: &SettingsConfig, state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .merge(state.metrics_state.router(&settings_config.metrics))
        .with_state(state)
}

/// Bind the configured address and serve until ctrl-c.
pub async fn start(settings_config: &SettingsConfig, state: AppState) -> Result<()> {
    let metrics = get_metrics().await;
    let app = router(settings_config, state);

    let bind_addr = format!("{}:{}", settings_config.server.host, settings_config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server listening on http://{}", listener.local_addr()?);
    metrics.up.set(1);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    metrics.up.set(0);
    Ok(())
}
