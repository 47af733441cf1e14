//! dealer-config - 配置加载库
//!
//! 加载顺序：`default.toml` → `{APP_ENV}.toml` → 环境变量。
//! 环境变量使用 `APP_` 前缀、`__` 作为层级分隔符（如 `APP_DATABASE__URL`），
//! 另外兼容 `SIGEX_BASE_URL` / `SIGEX_MTLS_CRT` / `SIGEX_MTLS_KEY`。

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// 启动时执行内置迁移
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    // 开发环境: 10, 生产环境: 50
    match std::env::var("APP_ENV").as_deref() {
        Ok("production") => 50,
        _ => 10,
    }
}

fn default_true() -> bool {
    true
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 单个 HTTP 请求的超时（秒），需大于远程签名的最长调用
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    180
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// SIGEX 远程签名服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct SigexConfig {
    #[serde(default = "default_sigex_base_url")]
    pub base_url: String,
    /// mTLS 客户端证书（PEM）路径
    #[serde(default)]
    pub mtls_crt: Option<PathBuf>,
    /// mTLS 客户端私钥（PEM）路径
    #[serde(default)]
    pub mtls_key: Option<PathBuf>,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// JSON 接口超时
    #[serde(default = "default_json_timeout")]
    pub json_timeout_secs: u64,
    /// 文档上传超时
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,
    /// 注册后临时存储时长（毫秒）
    #[serde(default = "default_temp_storage_ms")]
    pub temp_storage_ms: i64,
    #[serde(default = "default_signatures_limit")]
    pub signatures_limit: u32,
}

fn default_sigex_base_url() -> String {
    "https://sigex.kz:10443".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_json_timeout() -> u64 {
    60
}

fn default_upload_timeout() -> u64 {
    120
}

fn default_temp_storage_ms() -> i64 {
    86_400_000
}

fn default_signatures_limit() -> u32 {
    2
}

impl Default for SigexConfig {
    fn default() -> Self {
        Self {
            base_url: default_sigex_base_url(),
            mtls_crt: None,
            mtls_key: None,
            connect_timeout_secs: default_connect_timeout(),
            json_timeout_secs: default_json_timeout(),
            upload_timeout_secs: default_upload_timeout(),
            temp_storage_ms: default_temp_storage_ms(),
            signatures_limit: default_signatures_limit(),
        }
    }
}

impl SigexConfig {
    /// 证书与私钥均已配置（空路径视为未配置）
    pub fn has_client_identity(&self) -> bool {
        let present = |p: &Option<PathBuf>| p.as_ref().is_some_and(|p| !p.as_os_str().is_empty());
        present(&self.mtls_crt) && present(&self.mtls_key)
    }
}

/// 合同文档配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentConfig {
    /// 自定义模板目录，缺省使用内置模板
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    pub app_env: String,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub sigex: SigexConfig,
    #[serde(default)]
    pub document: DocumentConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config: Self = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("APP_").split("__"))
            .merge(Env::prefixed("SIGEX_").map(|key| format!("sigex.{}", key).into()))
            .extract()?;

        Ok(config)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 健康检查端口（业务端口 + 1000）
    pub fn health_port(&self) -> u16 {
        self.server.port.saturating_add(1000)
    }
}

#[cfg(test)]
mod tests;
