use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub static SUCCESS_MSG: &str = "success";
pub static ERROR_MSG: &str = "error";
pub static UNAUTHORIZED_MSG: &str = "unauthorized";

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token metrics
    pub token_issuance: IntCounterVec,
    pub token_cache_hits: IntCounter,
    pub token_expiry_unix: IntGauge,

    // Provider metrics
    pub provider_requests: IntCounterVec,
    pub provider_retries: IntCounterVec,
    pub provider_duration: HistogramVec,

    // Serving metrics
    pub servings_normalized: IntCounterVec,

    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("nutrigateway".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Token
            token_issuance: IntCounterVec::new(Opts::new("token_issuance_total", "Token issuance attempts by outcome"),&["outcome"],).unwrap(),
            token_cache_hits: IntCounter::new("token_cache_hits_total", "Token requests served from cache").unwrap(),
            token_expiry_unix: IntGauge::new("token_expiry_unix_seconds", "Expiry timestamp of the cached token").unwrap(),

            // Provider
            provider_requests: IntCounterVec::new(Opts::new("provider_requests_total", "Provider calls by operation and outcome"),&["operation", "outcome"],).unwrap(),
            provider_retries: IntCounterVec::new(Opts::new("provider_retries_total", "Retries after an authorization failure"),&["operation"],).unwrap(),
            provider_duration: HistogramVec::new(HistogramOpts::new("provider_request_duration_seconds", "Provider call duration seconds").buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 15.0]),&["operation"],).unwrap(),

            // Serving
            servings_normalized: IntCounterVec::new(Opts::new("servings_normalized_total", "Food records normalized by dish category"),&["category"],).unwrap(),

            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_issuance.clone())).unwrap();
        reg.register(Box::new(metrics.token_cache_hits.clone())).unwrap();
        reg.register(Box::new(metrics.token_expiry_unix.clone())).unwrap();
        reg.register(Box::new(metrics.provider_requests.clone())).unwrap();
        reg.register(Box::new(metrics.provider_retries.clone())).unwrap();
        reg.register(Box::new(metrics.provider_duration.clone())).unwrap();
        reg.register(Box::new(metrics.servings_normalized.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
