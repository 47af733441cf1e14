//! dealer-ports - 抽象 trait 层
//!
//! 定义外部协作方（远程签名服务、文档渲染）的抽象接口

mod document_renderer;
mod remote_signing;

pub use document_renderer::*;
pub use remote_signing::*;
