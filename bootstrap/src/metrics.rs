//! Metrics 模块
//!
//! 提供 Prometheus metrics 导出

use std::time::{Duration, Instant};

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use dealer_errors::{AppError, AppResult};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use tracing::debug;

/// Metrics 记录器
pub struct MetricsRecorder {
    handle: PrometheusHandle,
}

impl MetricsRecorder {
    /// 安装全局 recorder
    pub fn install() -> AppResult<Self> {
        let handle = dealer_telemetry::init_metrics()
            .map_err(|e| AppError::internal(format!("Failed to install Prometheus recorder: {}", e)))?;
        Ok(Self { handle })
    }

    /// 获取 Prometheus 格式的 metrics
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// 记录 HTTP 请求
pub fn record_http_request(method: &str, route: &str, status: u16, duration_ms: f64) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_ms", &labels).record(duration_ms);
}

/// HTTP metrics 中间件（按路由模板聚合，避免路径参数导致高基数）
pub async fn track_http_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let started = Instant::now();

    let response = next.run(request).await;

    record_http_request(
        &method,
        &route,
        response.status().as_u16(),
        started.elapsed().as_secs_f64() * 1000.0,
    );
    response
}

/// 连接池 Metrics 采集器
pub struct PoolMetricsCollector {
    pool: PgPool,
    interval: Duration,
}

impl PoolMetricsCollector {
    pub fn new(pool: PgPool, interval: Duration) -> Self {
        Self { pool, interval }
    }

    /// 启动后台采集任务
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                ticker.tick().await;

                let size = self.pool.size();
                let idle = self.pool.num_idle() as u32;
                gauge!("postgres_pool_size").set(size as f64);
                gauge!("postgres_pool_idle").set(idle as f64);
                gauge!("postgres_pool_active").set(size.saturating_sub(idle) as f64);

                debug!(size, idle, "Pool metrics collected");
            }
        })
    }
}
