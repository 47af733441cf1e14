//! 服务启动器
//!
//! 提供统一的服务启动模式

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use dealer_config::AppConfig;
use dealer_errors::AppResult;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::health::{HealthChecker, HealthServer};
use crate::infrastructure::Infrastructure;
use crate::metrics::{track_http_metrics, MetricsRecorder, PoolMetricsCollector};
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 HTTP 服务
///
/// 1. 加载配置
/// 2. 初始化运行时（日志）
/// 3. 安装 Prometheus recorder
/// 4. 创建基础设施（带重试）
/// 5. 启动健康检查服务器（业务端口 + 1000）
/// 6. 调用闭包构建业务路由
/// 7. 启动服务器并处理 graceful shutdown
///
/// ```ignore
/// dealer_bootstrap::run("config", |infra| async move {
///     Ok(api::router(build_state(&infra)?))
/// })
/// .await
/// ```
pub async fn run<F, Fut>(config_dir: &str, app_builder: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    // 1. 加载配置
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    init_runtime(&config);
    info!("Starting {} service", config.app_name);

    // 3. Metrics
    let metrics = Arc::new(MetricsRecorder::install()?);

    // 4. 基础设施
    let infra = Infrastructure::from_config(config.clone()).await?;
    let pool_metrics = PoolMetricsCollector::new(infra.postgres_pool(), Duration::from_secs(15)).start();

    // 5. 健康检查服务器
    let checker = Arc::new(HealthChecker::new(Some(infra.postgres_pool())));
    let health_server = HealthServer::new(checker, metrics, config.health_port());
    let health_handle = tokio::spawn(async move {
        if let Err(e) = health_server.serve().await {
            error!("Health server error: {}", e);
        }
    });

    // 6. 业务路由
    let router = app_builder(infra).await?.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(axum::middleware::from_fn(track_http_metrics)),
    );

    // 7. 启动服务器
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 8. 清理
    health_handle.abort();
    pool_metrics.abort();
    info!("Service stopped");

    Ok(())
}
