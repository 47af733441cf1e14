//! 远程签名命令

use dealer_errors::{AppError, AppResult};

use crate::domain::value_objects::{CallerIdentity, ContractId};

/// 缺省签名类型
pub const DEFAULT_SIGN_TYPE: &str = "cms";

/// 针对单个合同的签名步骤（预注册、发起二维码、轮询、签名卡）
#[derive(Debug, Clone)]
pub struct SigningStepCommand {
    pub contract_id: ContractId,
    pub caller: CallerIdentity,
}

/// 提交组织签名命令
///
/// 签名由本地签名工具生成，本系统只负责转发
#[derive(Debug, Clone)]
pub struct AddOrgSignatureCommand {
    pub contract_id: ContractId,
    pub caller: CallerIdentity,
    pub signature: String,
    pub sign_type: Option<String>,
}

impl AddOrgSignatureCommand {
    pub fn validate(&self) -> AppResult<()> {
        if self.signature.trim().is_empty() {
            return Err(AppError::validation("Подпись не передана"));
        }
        Ok(())
    }

    pub fn sign_type(&self) -> String {
        self.sign_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_SIGN_TYPE)
            .to_string()
    }
}
