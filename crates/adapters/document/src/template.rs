//! 合同模板系统

use dealer_errors::{AppError, AppResult};
use std::collections::HashMap;
use std::path::Path;
use tera::Tera;
use tracing::debug;

const BUILTIN_CONTRACT: &str = include_str!("../templates/contract.txt");

/// 合同模板管理器
pub struct ContractTemplate {
    tera: Tera,
}

impl ContractTemplate {
    /// 使用内置模板
    pub fn builtin() -> AppResult<Self> {
        let mut templates = HashMap::new();
        templates.insert(dealer_ports::CONTRACT_TEMPLATE.to_string(), BUILTIN_CONTRACT.to_string());
        Self::from_strings(templates)
    }

    /// 从目录加载 `*.txt` 模板，模板名为去掉扩展名的文件名
    pub fn from_dir(template_dir: &Path) -> AppResult<Self> {
        let entries = std::fs::read_dir(template_dir).map_err(|e| {
            AppError::internal(format!(
                "Failed to open template dir {}: {}",
                template_dir.display(),
                e
            ))
        })?;

        let mut templates = HashMap::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let source = std::fs::read_to_string(&path).map_err(|e| {
                AppError::internal(format!("Failed to read template {}: {}", path.display(), e))
            })?;
            templates.insert(name.to_string(), source);
        }

        debug!(template_dir = %template_dir.display(), count = templates.len(), "Contract templates loaded");
        Self::from_strings(templates)
    }

    /// 从内存中的模板字符串创建
    pub fn from_strings(templates: HashMap<String, String>) -> AppResult<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        for (name, content) in templates {
            tera.add_raw_template(&name, &content).map_err(|e| {
                AppError::internal(format!("Failed to add template {}: {}", name, e))
            })?;
        }

        Ok(Self { tera })
    }

    /// 渲染模板为纯文本
    pub fn render(&self, template_name: &str, context: &serde_json::Value) -> AppResult<String> {
        let context = tera::Context::from_serialize(context)
            .map_err(|e| AppError::internal(format!("Failed to create template context: {}", e)))?;

        self.tera.render(template_name, &context).map_err(|e| {
            AppError::internal(format!("Failed to render template {}: {}", template_name, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> serde_json::Value {
        json!({
            "contract": { "number": "15", "date": "2026-03-01", "price": "1250000.00", "payment_method": "" },
            "customer": { "name": "Иванов И.И.", "iin_bin": "900101300123", "document": "", "phone": "", "address": "" },
            "trailer": { "vin": "XKM821100R0000123", "manufacture_date": "" },
            "item": { "name": "МЗСА 817711", "article": "817711.012", "axle_count": 1, "full_mass_kg": 750 },
            "otts": { "number": "", "date": "" }
        })
    }

    #[test]
    fn test_builtin_contract() {
        let text = ContractTemplate::builtin()
            .unwrap()
            .render(dealer_ports::CONTRACT_TEMPLATE, &context())
            .unwrap();

        assert!(text.starts_with("ДОГОВОР КУПЛИ-ПРОДАЖИ № 15"));
        assert!(text.contains("VIN: XKM821100R0000123"));
        assert!(text.contains("ИИН/БИН: 900101300123"));
        assert!(text.contains("Полная масса, кг: 750"));
        assert!(!text.contains("Телефон"));
        assert!(!text.contains("ОТТС"));
    }

    #[test]
    fn test_render_from_strings() {
        let mut templates = HashMap::new();
        templates.insert("short".to_string(), "№ {{ contract.number }} <{{ trailer.vin }}>".to_string());

        let template = ContractTemplate::from_strings(templates).unwrap();
        let result = template.render("short", &context()).unwrap();
        assert_eq!(result, "№ 15 <XKM821100R0000123>");
    }

    #[test]
    fn test_unknown_template() {
        let template = ContractTemplate::builtin().unwrap();
        assert!(matches!(
            template.render("missing", &context()),
            Err(AppError::Internal(_))
        ));
    }
}
