//! 远程签名协调器
//!
//! 本地字段只是远程状态的缓存：只有远程调用成功后才写入，
//! 任何一步失败都不会破坏已保存的状态，可以安全重试。

use std::sync::Arc;

use chrono::{Duration, Utc};
use dealer_config::SigexConfig;
use dealer_errors::{AppError, AppResult};
use dealer_ports::{
    DdcOptions, DocumentRegistration, DocumentSettings, MetaField, QrSigningRequest, RemoteSigningPort,
    SignatureSubmission,
};
use tracing::{debug, info, warn};

use super::document_handler::{ContractDocumentHandler, RenderedDocument};
use crate::application::commands::{AddOrgSignatureCommand, SigningStepCommand};
use crate::domain::entities::{SalesContract, SigningRecord};
use crate::domain::repositories::ContractRepository;
use crate::domain::value_objects::ContractId;

/// 文档注册参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningSettings {
    pub signatures_limit: u32,
    /// 远程临时存储时长（毫秒）
    pub temp_storage_ms: i64,
}

impl Default for SigningSettings {
    fn default() -> Self {
        Self {
            signatures_limit: 2,
            temp_storage_ms: 86_400_000,
        }
    }
}

impl From<&SigexConfig> for SigningSettings {
    fn from(config: &SigexConfig) -> Self {
        Self {
            signatures_limit: config.signatures_limit,
            temp_storage_ms: config.temp_storage_ms,
        }
    }
}

pub struct SigningCoordinator {
    contract_repo: Arc<dyn ContractRepository>,
    documents: Arc<ContractDocumentHandler>,
    remote: Arc<dyn RemoteSigningPort>,
    settings: SigningSettings,
}

impl SigningCoordinator {
    pub fn new(
        contract_repo: Arc<dyn ContractRepository>,
        documents: Arc<ContractDocumentHandler>,
        remote: Arc<dyn RemoteSigningPort>,
        settings: SigningSettings,
    ) -> Self {
        Self {
            contract_repo,
            documents,
            remote,
            settings,
        }
    }

    /// 预注册：已有文档 ID 时直接返回，不重复注册
    pub async fn preregister(&self, cmd: SigningStepCommand) -> AppResult<String> {
        let contract = self.load(cmd.contract_id).await?;
        if let Some(document_id) = contract.signing().document_id() {
            debug!(contract_id = %contract.id(), document_id, "Document already registered");
            return Ok(document_id.to_string());
        }

        let number = contract.display_number();
        let pdf = self.documents.render_contract(&contract).await?;

        let registration = DocumentRegistration {
            title: document_title(&number),
            description: format!("Договор №{}", number),
            settings: DocumentSettings {
                private: false,
                signatures_limit: self.settings.signatures_limit,
                switch_to_private_after_limit_reached: true,
                temp_storage_after_registration: self.settings.temp_storage_ms,
            },
        };
        let document_id = self.remote.register_document(&registration).await?;
        self.remote.upload_document_data(&document_id, pdf).await?;

        let expire_at = Utc::now() + Duration::milliseconds(self.settings.temp_storage_ms);
        let mut signing = contract.signing().clone();
        signing.register(document_id.clone(), expire_at)?;

        // 并发预注册时只有第一个写入生效，其余返回已保存的 ID
        if !self
            .contract_repo
            .attach_document(contract.id(), &document_id, expire_at)
            .await?
        {
            let stored = self.load(contract.id()).await?;
            let stored_id = stored.signing().require_document()?.to_string();
            warn!(
                contract_id = %contract.id(),
                orphaned = %document_id,
                stored = %stored_id,
                "Concurrent preregistration, keeping stored document"
            );
            return Ok(stored_id);
        }

        info!(contract_id = %contract.id(), document_id = %document_id, "Contract registered for signing");
        Ok(document_id)
    }

    /// 提交组织签名
    pub async fn add_org_signature(&self, cmd: AddOrgSignatureCommand) -> AppResult<i64> {
        cmd.validate()?;
        let contract = self.load(cmd.contract_id).await?;
        let document_id = contract.signing().org_signature_document()?.to_string();

        let submission = SignatureSubmission {
            sign_type: cmd.sign_type(),
            signature: cmd.signature.trim().to_string(),
        };
        let sign_id = self.remote.add_signature(&document_id, &submission).await?;

        let mut signing = contract.signing().clone();
        signing.record_org_signature(sign_id)?;
        self.persist(&contract, &signing).await?;

        info!(contract_id = %contract.id(), sign_id, "Organisation signature added");
        Ok(sign_id)
    }

    /// 发起二维码签名，返回操作 ID
    pub async fn start_qr(&self, cmd: SigningStepCommand) -> AppResult<String> {
        let contract = self.load(cmd.contract_id).await?;
        let document_id = contract.signing().qr_document()?.to_string();
        let number = contract.display_number();

        let request = QrSigningRequest {
            description: format!("Подпишите договор №{}", number),
            meta: vec![
                MetaField {
                    name: "Номер договора".to_string(),
                    value: number,
                },
                MetaField {
                    name: "Сумма".to_string(),
                    value: contract.price().map(|p| p.to_string()).unwrap_or_default(),
                },
            ],
        };
        let operation_id = self.remote.start_qr_signing(&document_id, &request).await?;

        let mut signing = contract.signing().clone();
        signing.start_qr(operation_id.clone())?;
        self.persist(&contract, &signing).await?;

        info!(contract_id = %contract.id(), operation_id = %operation_id, "QR signing started");
        Ok(operation_id)
    }

    /// 轮询二维码签名状态；前置条件在任何网络调用之前检查
    pub async fn poll_qr_status(&self, cmd: SigningStepCommand) -> AppResult<SigningRecord> {
        let contract = self.load(cmd.contract_id).await?;
        let (document_id, operation_id) = {
            let (d, o) = contract.signing().active_operation()?;
            (d.to_string(), o.to_string())
        };

        let status = self.remote.qr_operation_status(&document_id, &operation_id).await?;

        let mut signing = contract.signing().clone();
        signing.apply_qr_status(&status.status, status.is_done(), status.sign_id)?;
        self.persist(&contract, &signing).await?;

        info!(
            contract_id = %contract.id(),
            status = %status.status,
            sign_id = ?status.sign_id,
            "QR status refreshed"
        );
        Ok(signing)
    }

    /// 签名卡（DDC）
    pub async fn signed_card(&self, cmd: SigningStepCommand) -> AppResult<RenderedDocument> {
        let contract = self.load(cmd.contract_id).await?;
        let document_id = contract.signing().require_document()?.to_string();
        let number = contract.display_number();

        // 签名卡内的文件名与注册时的标题一致，下载名单独命名
        let bytes = self
            .remote
            .build_ddc(&document_id, &DdcOptions::verified_card(document_title(&number)))
            .await?;
        let file_name = format!("ddc_{}.pdf", number);

        info!(contract_id = %contract.id(), bytes = bytes.len(), "Signed card built");
        Ok(RenderedDocument { file_name, bytes })
    }

    async fn load(&self, contract_id: ContractId) -> AppResult<SalesContract> {
        self.contract_repo
            .find_by_id(contract_id)
            .await?
            .ok_or_else(|| AppError::not_found("Договор не найден"))
    }

    /// 以读取时的操作 ID 为条件写回；并发发起的新二维码操作不会被旧结果覆盖
    async fn persist(&self, loaded: &SalesContract, signing: &SigningRecord) -> AppResult<()> {
        self.contract_repo
            .update_signing(loaded.id(), loaded.signing().operation_id(), signing)
            .await
    }
}

/// 远程签名服务中的文档标题
fn document_title(number: &str) -> String {
    format!("Договор_{}.pdf", number)
}
