//! 远程签名服务 trait 定义

use async_trait::async_trait;
use dealer_errors::AppResult;
use serde::{Deserialize, Serialize};

/// 文档可见性与签名数量设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSettings {
    pub private: bool,
    pub signatures_limit: u32,
    pub switch_to_private_after_limit_reached: bool,
    /// 注册后临时存储时长（毫秒）
    pub temp_storage_after_registration: i64,
}

/// 注册文档请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRegistration {
    pub title: String,
    pub description: String,
    pub settings: DocumentSettings,
}

/// 提交签名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureSubmission {
    pub sign_type: String,
    /// base64 编码的签名（CMS）
    pub signature: String,
}

/// 二维码签名元数据项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaField {
    pub name: String,
    pub value: String,
}

/// 发起二维码签名请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrSigningRequest {
    pub description: String,
    pub meta: Vec<MetaField>,
}

/// 二维码签名操作状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrOperationStatus {
    pub status: String,
    #[serde(default)]
    pub sign_id: Option<i64>,
}

impl QrOperationStatus {
    /// 远程服务的终态值
    pub const DONE: &'static str = "done";

    pub fn is_done(&self) -> bool {
        self.status == Self::DONE
    }
}

/// 签名卡（DDC）渲染参数
#[derive(Debug, Clone, PartialEq)]
pub struct DdcOptions {
    pub file_name: String,
    pub without_document_visualization: bool,
    pub without_signatures_visualization: bool,
    pub without_qr_codes_in_signatures_visualization: bool,
    pub without_id: bool,
    pub qr_with_id_link: bool,
    pub with_label_verified: bool,
    pub language: String,
}

impl DdcOptions {
    /// 固定渲染组合：显示文档、签名和签名二维码，带“已验证”标记，俄语
    pub fn verified_card(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            without_document_visualization: false,
            without_signatures_visualization: false,
            without_qr_codes_in_signatures_visualization: false,
            without_id: false,
            qr_with_id_link: false,
            with_label_verified: true,
            language: "ru".to_string(),
        }
    }

    /// 转换为查询参数
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("fileName", self.file_name.clone()),
            ("withoutDocumentVisualization", self.without_document_visualization.to_string()),
            ("withoutSignaturesVisualization", self.without_signatures_visualization.to_string()),
            (
                "withoutQRCodesInSignaturesVisualization",
                self.without_qr_codes_in_signatures_visualization.to_string(),
            ),
            ("withoutID", self.without_id.to_string()),
            ("qrWithIDLink", self.qr_with_id_link.to_string()),
            ("withLabelVerified", self.with_label_verified.to_string()),
            ("language", self.language.clone()),
        ]
    }
}

/// 远程签名服务
///
/// 所有传输层错误（超时、非 2xx、响应无法解析）返回 `AppError::UpstreamUnavailable`，
/// 缺少客户端证书返回 `AppError::NotConfigured` 且不发起网络请求。
#[async_trait]
pub trait RemoteSigningPort: Send + Sync {
    /// 注册文档，返回远程文档 ID
    async fn register_document(&self, request: &DocumentRegistration) -> AppResult<String>;

    /// 上传文档内容
    async fn upload_document_data(&self, document_id: &str, data: Vec<u8>) -> AppResult<()>;

    /// 添加签名，返回签名 ID
    async fn add_signature(
        &self,
        document_id: &str,
        submission: &SignatureSubmission,
    ) -> AppResult<i64>;

    /// 发起二维码签名，返回操作 ID
    async fn start_qr_signing(
        &self,
        document_id: &str,
        request: &QrSigningRequest,
    ) -> AppResult<String>;

    /// 查询二维码签名状态
    async fn qr_operation_status(
        &self,
        document_id: &str,
        operation_id: &str,
    ) -> AppResult<QrOperationStatus>;

    /// 生成签名卡 PDF
    async fn build_ddc(&self, document_id: &str, options: &DdcOptions) -> AppResult<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_wire_shape() {
        let request = DocumentRegistration {
            title: "Договор_7.pdf".to_string(),
            description: "Договор №7".to_string(),
            settings: DocumentSettings {
                private: false,
                signatures_limit: 2,
                switch_to_private_after_limit_reached: true,
                temp_storage_after_registration: 86_400_000,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["settings"]["signaturesLimit"], 2);
        assert_eq!(json["settings"]["switchToPrivateAfterLimitReached"], true);
        assert_eq!(json["settings"]["tempStorageAfterRegistration"], 86_400_000);
    }

    #[test]
    fn test_operation_status_without_sign_id() {
        let status: QrOperationStatus = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(status.sign_id, None);
        assert!(!status.is_done());
    }

    #[test]
    fn test_verified_card_query() {
        let query = DdcOptions::verified_card("Договор_7.pdf").to_query();
        assert!(query.contains(&("withLabelVerified", "true".to_string())));
        assert!(query.contains(&("withoutID", "false".to_string())));
        assert!(query.contains(&("language", "ru".to_string())));
    }
}
