//! 合同 PDF 渲染器

use dealer_errors::AppResult;
use dealer_ports::DocumentRenderer;
use tracing::debug;

use crate::pdf::PdfWriter;
use crate::template::ContractTemplate;

/// 模板 + PDF 写入器
pub struct PdfDocumentRenderer {
    templates: ContractTemplate,
    writer: PdfWriter,
}

impl PdfDocumentRenderer {
    pub fn new(templates: ContractTemplate) -> Self {
        Self {
            templates,
            writer: PdfWriter::a4(),
        }
    }
}

impl DocumentRenderer for PdfDocumentRenderer {
    fn render_pdf(&self, template: &str, context: &serde_json::Value) -> AppResult<Vec<u8>> {
        let text = self.templates.render(template, context)?;
        let title = text.lines().next().unwrap_or_default().trim();
        let pdf = self.writer.write(title, &text);
        debug!(template, bytes = pdf.len(), "Document rendered");
        Ok(pdf)
    }
}
