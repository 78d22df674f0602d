use std::sync::Arc;

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Cache metrics
    pub cache_lookups: IntCounterVec,

    // Identity provider metrics
    pub provider_requests: IntCounterVec,
    pub provider_failures: IntCounterVec,
    pub provider_duration: HistogramVec,

    // Function metrics
    pub function_runs: IntCounterVec,
    pub merge_warnings: IntCounterVec,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("groupresolver".into()), None)
            .expect("metrics prefix is valid");

        let metrics = Arc::new(Self {
            // Cache
            cache_lookups: IntCounterVec::new(Opts::new("cache_lookups_total", "Cache lookups by cache and outcome"), &["cache", "outcome"]).expect("valid metric"),

            // Identity provider
            provider_requests: IntCounterVec::new(Opts::new("provider_requests_total", "Identity provider calls by operation"), &["operation"]).expect("valid metric"),
            provider_failures: IntCounterVec::new(Opts::new("provider_failures_total", "Failed identity provider calls by operation"), &["operation"]).expect("valid metric"),
            provider_duration: HistogramVec::new(HistogramOpts::new("provider_duration_seconds", "Identity provider call duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["operation"]).expect("valid metric"),

            // Function
            function_runs: IntCounterVec::new(Opts::new("function_runs_total", "Function runs by type and outcome"), &["function_type", "outcome"]).expect("valid metric"),
            merge_warnings: IntCounterVec::new(Opts::new("merge_warnings_total", "Skipped paths during priority merge"), &["kind"]).expect("valid metric"),

            // Config/runtime
            config_validation_errors: IntCounter::new("config_validation_errors_total", "Validation errors during startup").expect("valid metric"),
            up: IntGauge::new("up", "1 if service is healthy").expect("valid metric"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(metrics.cache_lookups.clone()),
            Box::new(metrics.provider_requests.clone()),
            Box::new(metrics.provider_failures.clone()),
            Box::new(metrics.provider_duration.clone()),
            Box::new(metrics.function_runs.clone()),
            Box::new(metrics.merge_warnings.clone()),
            Box::new(metrics.config_validation_errors.clone()),
            Box::new(metrics.up.clone()),
        ];
        for collector in collectors {
            reg.register(collector).expect("metric registered once");
        }

        metrics
    }
}
