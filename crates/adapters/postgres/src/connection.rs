//! PostgreSQL 连接管理

use dealer_errors::{AppError, AppResult};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// PostgreSQL 连接池配置
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// 创建 PostgreSQL 连接池
pub async fn create_pool(config: &PostgresConfig) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .connect(&config.url)
        .await
        .map_err(|e| AppError::database(format!("Failed to create pool: {}", e)))
}

/// 检查数据库连接
pub async fn check_connection(pool: &PgPool) -> AppResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("Database health check failed: {}", e)))?;
    Ok(())
}

/// 连接失败是否值得重试（数据库尚未就绪等）
pub fn is_transient_connect_error(err: &AppError) -> bool {
    let AppError::Database(msg) = err else {
        return false;
    };
    let msg = msg.to_lowercase();
    ["connection refused", "timed out", "timeout", "the database system is starting up", "could not connect", "connection reset"]
        .iter()
        .any(|pattern| msg.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = PostgresConfig::new("postgres://localhost/dealer").with_max_connections(25);
        assert_eq!(config.max_connections, 25);
        assert_eq!(config.min_connections, 1);
    }

    #[test]
    fn test_transient_errors() {
        assert!(is_transient_connect_error(&AppError::database(
            "Failed to create pool: Connection refused (os error 111)"
        )));
        assert!(!is_transient_connect_error(&AppError::database(
            "password authentication failed for user \"dealer\""
        )));
        assert!(!is_transient_connect_error(&AppError::internal("timeout")));
    }
}
