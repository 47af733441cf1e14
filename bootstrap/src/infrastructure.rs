//! 基础设施资源管理

use dealer_adapter_postgres::{create_pool, is_transient_connect_error, PostgresConfig};
use dealer_common::{with_retry, RetryConfig};
use dealer_config::AppConfig;
use dealer_errors::AppResult;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

/// 基础设施资源容器
///
/// 由 bootstrap 统一初始化，克隆开销很小（连接池内部共享）
#[derive(Clone)]
pub struct Infrastructure {
    config: AppConfig,
    postgres_pool: PgPool,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（带重试）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let retry_config = RetryConfig::default();

        let pg_config = PostgresConfig::new(config.database.url.expose_secret())
            .with_max_connections(config.database.max_connections);
        let postgres_pool = with_retry(
            &retry_config,
            "PostgreSQL connection",
            || {
                let cfg = pg_config.clone();
                async move { create_pool(&cfg).await }
            },
            is_transient_connect_error,
        )
        .await?;
        info!(
            max_connections = config.database.max_connections,
            "PostgreSQL connection pool created"
        );

        Ok(Self {
            config,
            postgres_pool,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取 PostgreSQL 连接池（克隆）
    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }
}
