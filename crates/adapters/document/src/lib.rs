//! dealer-adapter-document - 合同文档适配器
//!
//! tera 模板生成合同文本，再排版为单栏 A4 PDF

mod pdf;
mod renderer;
mod template;

pub use pdf::PdfWriter;
pub use renderer::PdfDocumentRenderer;
pub use template::ContractTemplate;
