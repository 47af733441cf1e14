//! 远程签名状态机
//!
//! UNREGISTERED → REGISTERED → ORG_SIGNED → QR_STARTED → DONE
//!
//! 本地状态只是远程服务最近一次响应的缓存，每次都用最新响应覆盖。

use chrono::{DateTime, Utc};
use dealer_errors::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 本地写入的状态字符串（远程轮询结果原样保存）
pub const STATUS_ORG_SIGNED: &str = "org_signed";
pub const STATUS_QR_STARTED: &str = "qr_started";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigningError {
    #[error("Документ не зарегистрирован в SIGEX")]
    NotRegistered,
    #[error("Нет активной операции QR-подписи")]
    NoActiveOperation,
    #[error("Шаг «{step}» недоступен в состоянии {state}")]
    InvalidTransition { step: &'static str, state: &'static str },
    #[error("Некорректное состояние подписания: {0}")]
    Corrupted(String),
}

impl From<SigningError> for AppError {
    fn from(err: SigningError) -> Self {
        match err {
            SigningError::Corrupted(detail) => AppError::internal(detail),
            other => AppError::failed_precondition(other.to_string()),
        }
    }
}

/// 签名流程状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SigningState {
    Unregistered,
    Registered {
        document_id: String,
    },
    OrgSigned {
        document_id: String,
        sign_id: i64,
    },
    QrStarted {
        document_id: String,
        operation_id: String,
    },
    Done {
        document_id: String,
        operation_id: String,
        sign_id: Option<i64>,
    },
}

impl SigningState {
    pub const UNREGISTERED: &'static str = "unregistered";
    pub const REGISTERED: &'static str = "registered";
    pub const ORG_SIGNED: &'static str = "org_signed";
    pub const QR_STARTED: &'static str = "qr_started";
    pub const DONE: &'static str = "done";

    /// 存储用的判别值
    pub fn tag(&self) -> &'static str {
        match self {
            SigningState::Unregistered => Self::UNREGISTERED,
            SigningState::Registered { .. } => Self::REGISTERED,
            SigningState::OrgSigned { .. } => Self::ORG_SIGNED,
            SigningState::QrStarted { .. } => Self::QR_STARTED,
            SigningState::Done { .. } => Self::DONE,
        }
    }

    pub fn document_id(&self) -> Option<&str> {
        match self {
            SigningState::Unregistered => None,
            SigningState::Registered { document_id }
            | SigningState::OrgSigned { document_id, .. }
            | SigningState::QrStarted { document_id, .. }
            | SigningState::Done { document_id, .. } => Some(document_id),
        }
    }

    pub fn operation_id(&self) -> Option<&str> {
        match self {
            SigningState::QrStarted { operation_id, .. } | SigningState::Done { operation_id, .. } => {
                Some(operation_id)
            }
            _ => None,
        }
    }

    /// 状态自身携带的签名 ID
    pub fn sign_id(&self) -> Option<i64> {
        match self {
            SigningState::OrgSigned { sign_id, .. } => Some(*sign_id),
            SigningState::Done { sign_id, .. } => *sign_id,
            _ => None,
        }
    }

    /// 从存储列重建
    pub fn from_parts(
        tag: &str,
        document_id: Option<String>,
        operation_id: Option<String>,
        sign_id: Option<i64>,
    ) -> Result<Self, SigningError> {
        let missing = |field: &str| SigningError::Corrupted(format!("{} without {}", tag, field));
        let state = match tag {
            Self::UNREGISTERED => SigningState::Unregistered,
            Self::REGISTERED => SigningState::Registered {
                document_id: document_id.ok_or_else(|| missing("document_id"))?,
            },
            Self::ORG_SIGNED => SigningState::OrgSigned {
                document_id: document_id.ok_or_else(|| missing("document_id"))?,
                sign_id: sign_id.ok_or_else(|| missing("sign_id"))?,
            },
            Self::QR_STARTED => SigningState::QrStarted {
                document_id: document_id.ok_or_else(|| missing("document_id"))?,
                operation_id: operation_id.ok_or_else(|| missing("operation_id"))?,
            },
            Self::DONE => SigningState::Done {
                document_id: document_id.ok_or_else(|| missing("document_id"))?,
                operation_id: operation_id.ok_or_else(|| missing("operation_id"))?,
                sign_id,
            },
            other => return Err(SigningError::Corrupted(format!("unknown state {}", other))),
        };
        Ok(state)
    }
}

/// 合同上的签名子记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningRecord {
    state: SigningState,
    /// 远程临时存储到期时间
    expire_at: Option<DateTime<Utc>>,
    /// 远程最近一次返回的状态（诊断用，不作为判别）
    last_status: Option<String>,
    /// 最近一次已知的签名 ID
    last_sign_id: Option<i64>,
}

impl Default for SigningRecord {
    fn default() -> Self {
        Self {
            state: SigningState::Unregistered,
            expire_at: None,
            last_status: None,
            last_sign_id: None,
        }
    }
}

impl SigningRecord {
    pub fn restore(
        state: SigningState,
        expire_at: Option<DateTime<Utc>>,
        last_status: Option<String>,
        last_sign_id: Option<i64>,
    ) -> Self {
        Self {
            state,
            expire_at,
            last_status,
            last_sign_id,
        }
    }

    pub fn state(&self) -> &SigningState {
        &self.state
    }

    pub fn document_id(&self) -> Option<&str> {
        self.state.document_id()
    }

    pub fn operation_id(&self) -> Option<&str> {
        self.state.operation_id()
    }

    pub fn expire_at(&self) -> Option<DateTime<Utc>> {
        self.expire_at
    }

    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }

    pub fn last_sign_id(&self) -> Option<i64> {
        self.last_sign_id
    }

    /// 已注册文档 ID（前置条件）
    pub fn require_document(&self) -> Result<&str, SigningError> {
        self.document_id().ok_or(SigningError::NotRegistered)
    }

    // ========== 状态迁移 ==========

    /// UNREGISTERED → REGISTERED
    pub fn register(&mut self, document_id: String, expire_at: DateTime<Utc>) -> Result<(), SigningError> {
        if !matches!(self.state, SigningState::Unregistered) {
            return Err(self.invalid("preregister"));
        }
        self.state = SigningState::Registered { document_id };
        self.expire_at = Some(expire_at);
        Ok(())
    }

    /// 检查是否可以提交组织签名，返回文档 ID
    pub fn org_signature_document(&self) -> Result<&str, SigningError> {
        match &self.state {
            SigningState::Unregistered => Err(SigningError::NotRegistered),
            SigningState::Registered { document_id } | SigningState::OrgSigned { document_id, .. } => {
                Ok(document_id)
            }
            _ => Err(self.invalid("add_org_signature")),
        }
    }

    /// REGISTERED / ORG_SIGNED → ORG_SIGNED
    pub fn record_org_signature(&mut self, sign_id: i64) -> Result<(), SigningError> {
        let document_id = self.org_signature_document()?.to_string();
        self.state = SigningState::OrgSigned { document_id, sign_id };
        self.last_status = Some(STATUS_ORG_SIGNED.to_string());
        self.last_sign_id = Some(sign_id);
        Ok(())
    }

    /// 检查是否可以发起二维码签名，返回文档 ID
    pub fn qr_document(&self) -> Result<&str, SigningError> {
        match &self.state {
            SigningState::Unregistered => Err(SigningError::NotRegistered),
            SigningState::Done { .. } => Err(self.invalid("start_qr")),
            state => state.document_id().ok_or(SigningError::NotRegistered),
        }
    }

    /// REGISTERED / ORG_SIGNED / QR_STARTED → QR_STARTED
    pub fn start_qr(&mut self, operation_id: String) -> Result<(), SigningError> {
        let document_id = self.qr_document()?.to_string();
        self.state = SigningState::QrStarted {
            document_id,
            operation_id,
        };
        self.last_status = Some(STATUS_QR_STARTED.to_string());
        Ok(())
    }

    /// 轮询需要的 (文档 ID, 操作 ID)
    pub fn active_operation(&self) -> Result<(&str, &str), SigningError> {
        match &self.state {
            SigningState::Unregistered => Err(SigningError::NotRegistered),
            SigningState::QrStarted {
                document_id,
                operation_id,
            }
            | SigningState::Done {
                document_id,
                operation_id,
                ..
            } => Ok((document_id, operation_id)),
            _ => Err(SigningError::NoActiveOperation),
        }
    }

    /// 写入轮询结果：状态原样保存，done 时同时保存签名 ID
    pub fn apply_qr_status(
        &mut self,
        status: &str,
        is_done: bool,
        sign_id: Option<i64>,
    ) -> Result<(), SigningError> {
        let (document_id, operation_id) = {
            let (d, o) = self.active_operation()?;
            (d.to_string(), o.to_string())
        };
        self.last_status = Some(status.to_string());
        self.state = if is_done {
            self.last_sign_id = sign_id;
            SigningState::Done {
                document_id,
                operation_id,
                sign_id,
            }
        } else {
            SigningState::QrStarted {
                document_id,
                operation_id,
            }
        };
        Ok(())
    }

    fn invalid(&self, step: &'static str) -> SigningError {
        SigningError::InvalidTransition {
            step,
            state: self.state.tag(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered() -> SigningRecord {
        let mut record = SigningRecord::default();
        record.register("doc-1".to_string(), Utc::now()).unwrap();
        record
    }

    #[test]
    fn test_full_happy_path() {
        let mut record = registered();
        record.record_org_signature(11).unwrap();
        assert_eq!(record.last_status(), Some(STATUS_ORG_SIGNED));

        record.start_qr("op-1".to_string()).unwrap();
        assert_eq!(record.operation_id(), Some("op-1"));

        record.apply_qr_status("pending", false, None).unwrap();
        assert_eq!(record.state().tag(), SigningState::QR_STARTED);
        assert_eq!(record.last_status(), Some("pending"));
        assert_eq!(record.last_sign_id(), Some(11));

        record.apply_qr_status("done", true, Some(12)).unwrap();
        assert_eq!(
            record.state(),
            &SigningState::Done {
                document_id: "doc-1".to_string(),
                operation_id: "op-1".to_string(),
                sign_id: Some(12),
            }
        );
        assert_eq!(record.last_sign_id(), Some(12));
    }

    #[test]
    fn test_preconditions() {
        let mut record = SigningRecord::default();
        assert_eq!(record.record_org_signature(1), Err(SigningError::NotRegistered));
        assert_eq!(record.start_qr("op".into()), Err(SigningError::NotRegistered));
        assert_eq!(record.active_operation(), Err(SigningError::NotRegistered));

        let record = registered();
        assert_eq!(record.active_operation(), Err(SigningError::NoActiveOperation));
    }

    #[test]
    fn test_register_twice_is_rejected() {
        let mut record = registered();
        assert!(matches!(
            record.register("doc-2".into(), Utc::now()),
            Err(SigningError::InvalidTransition { .. })
        ));
        assert_eq!(record.document_id(), Some("doc-1"));
    }

    #[test]
    fn test_qr_can_start_without_org_signature_and_restart() {
        let mut record = registered();
        record.start_qr("op-1".into()).unwrap();
        record.start_qr("op-2".into()).unwrap();
        assert_eq!(record.operation_id(), Some("op-2"));
    }

    #[test]
    fn test_done_is_terminal_for_signing_steps() {
        let mut record = registered();
        record.start_qr("op-1".into()).unwrap();
        record.apply_qr_status("done", true, Some(5)).unwrap();
        assert!(record.start_qr("op-2".into()).is_err());
        assert!(record.record_org_signature(6).is_err());
        // 轮询仍可刷新
        record.apply_qr_status("done", true, Some(5)).unwrap();
    }

    #[test]
    fn test_from_parts() {
        let state = SigningState::from_parts("qr_started", Some("d".into()), Some("o".into()), None).unwrap();
        assert_eq!(state.operation_id(), Some("o"));
        assert!(SigningState::from_parts("registered", None, None, None).is_err());
        assert!(SigningState::from_parts("weird", None, None, None).is_err());
    }

    #[test]
    fn test_errors_map_to_failed_precondition() {
        assert!(matches!(
            AppError::from(SigningError::NoActiveOperation),
            AppError::FailedPrecondition(_)
        ));
        assert!(matches!(
            AppError::from(SigningError::Corrupted("x".into())),
            AppError::Internal(_)
        ));
    }
}
