//! dealer-telemetry - 可观测性库
//!
//! 日志过滤优先读取 `RUST_LOG`，否则使用配置中的 `log_level`

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// 初始化 tracing（人类可读格式）
///
/// 重复初始化时保留已有的全局 subscriber
pub fn init_tracing(log_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}

/// 初始化 JSON 格式的 tracing（生产环境）
pub fn init_tracing_json(log_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false),
        )
        .try_init();
}

/// 安装 Prometheus 全局 recorder
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets(&[5.0, 25.0, 100.0, 500.0, 1000.0, 5000.0, 30000.0, 120000.0])?
        .install_recorder()?;
    describe_metrics();
    Ok(handle)
}

fn describe_metrics() {
    metrics::describe_counter!("http_requests_total", "HTTP requests handled");
    metrics::describe_histogram!("http_request_duration_ms", "HTTP request latency in milliseconds");
    metrics::describe_counter!("sigex_requests_total", "Calls to the remote signing service");
    metrics::describe_histogram!("sigex_request_duration_ms", "Remote signing call latency in milliseconds");
    metrics::describe_counter!("contract_lifecycle_total", "Contract lifecycle operations by outcome");
}
