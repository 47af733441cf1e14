//! dealer-bootstrap - 统一服务启动骨架
//!
//! 配置 → 日志 → 基础设施（带重试）→ 健康检查/metrics 服务器 → HTTP API（优雅关闭）

mod health;
mod infrastructure;
mod metrics;
mod runtime;
mod starter;

pub use health::{ComponentHealth, HealthChecker, HealthServer, HealthStatus};
pub use infrastructure::Infrastructure;
pub use metrics::{record_http_request, track_http_metrics, MetricsRecorder, PoolMetricsCollector};
pub use runtime::{init_runtime, shutdown_signal};
pub use starter::run;
