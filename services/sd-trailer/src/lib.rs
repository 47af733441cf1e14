//! sd-trailer - 挂车销售服务
//!
//! 物料目录、挂车登记、型号匹配、销售合同、远程签名、客户、仓库和 OTTS 证书

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;
use std::time::Duration;

use dealer_adapter_document::{ContractTemplate, PdfDocumentRenderer};
use dealer_adapter_sigex::{SigexClient, SigexSettingsBuilder};
use dealer_config::{AppConfig, DocumentConfig, SigexConfig};
use dealer_errors::AppResult;
use sqlx::PgPool;
use tracing::info;

use api::AppState;
use application::handlers::SigningSettings;
use infrastructure::Persistence;

/// 按配置创建 SIGEX 客户端；缺少证书时仍可启动
pub fn sigex_client(config: &SigexConfig) -> AppResult<SigexClient> {
    let settings = SigexSettingsBuilder::new(config.base_url.clone())
        .with_identity(config.mtls_crt.clone(), config.mtls_key.clone())
        .with_connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .with_json_timeout(Duration::from_secs(config.json_timeout_secs))
        .with_upload_timeout(Duration::from_secs(config.upload_timeout_secs))
        .build();
    SigexClient::new(settings)
}

/// 合同模板：配置了目录时从目录加载，否则使用内置模板
pub fn document_renderer(config: &DocumentConfig) -> AppResult<PdfDocumentRenderer> {
    let templates = match &config.template_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Loading contract templates");
            ContractTemplate::from_dir(dir)?
        }
        None => ContractTemplate::builtin()?,
    };
    Ok(PdfDocumentRenderer::new(templates))
}

/// 组装 PostgreSQL 存储上的全部处理器
pub fn build_state(config: &AppConfig, pool: PgPool) -> AppResult<AppState> {
    let remote = Arc::new(sigex_client(&config.sigex)?);
    let renderer = Arc::new(document_renderer(&config.document)?);
    Ok(AppState::new(
        Persistence::postgres(pool),
        renderer,
        remote,
        SigningSettings::from(&config.sigex),
    ))
}
