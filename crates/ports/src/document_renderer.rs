//! 文档渲染 trait 定义

use dealer_errors::AppResult;

/// 合同 PDF 模板名
pub const CONTRACT_TEMPLATE: &str = "contract";

/// 文档渲染器
///
/// 输入为模板名和 JSON 上下文，输出 PDF 字节。
/// 同一上下文必须得到相同字节，组织签名针对的是注册时上传的文档。
pub trait DocumentRenderer: Send + Sync {
    fn render_pdf(&self, template: &str, context: &serde_json::Value) -> AppResult<Vec<u8>>;
}
