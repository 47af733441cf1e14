//! 合同文档渲染
//!
//! 本地下载的 PDF 与注册到远程签名服务的 PDF 由同一份上下文生成，
//! 保证组织签名与已注册文档一致。

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use dealer_errors::{AppError, AppResult};
use dealer_ports::{CONTRACT_TEMPLATE, DocumentRenderer};
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::entities::{Customer, Item, Otts, SalesContract, Trailer};
use crate::domain::repositories::{
    ContractRepository, CustomerRepository, ItemRepository, OttsRepository, TrailerRepository,
};
use crate::domain::value_objects::ContractId;

const DATE_FORMAT: &str = "%d.%m.%Y";

/// 渲染好的二进制文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContractSection {
    pub number: String,
    pub date: String,
    pub price: String,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerSection {
    pub name: String,
    pub iin_bin: Option<String>,
    pub document: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemSection {
    pub name: String,
    pub article: String,
    pub axle_count: Option<i32>,
    pub full_mass_kg: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TrailerSection {
    pub vin: String,
    pub manufacture_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OttsSection {
    pub number: Option<String>,
    pub date: Option<String>,
}

/// 模板上下文
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContractContext {
    pub contract: ContractSection,
    pub customer: CustomerSection,
    pub item: ItemSection,
    pub trailer: TrailerSection,
    pub otts: OttsSection,
}

impl ContractContext {
    pub fn build(
        contract: &SalesContract,
        trailer: Option<&Trailer>,
        item: Option<&Item>,
        customer: Option<&Customer>,
        otts: Option<&Otts>,
    ) -> Self {
        Self {
            contract: ContractSection {
                number: contract.display_number(),
                date: format_date(contract.contract_date()).unwrap_or_default(),
                price: contract.price().map(|p| p.to_string()).unwrap_or_default(),
                payment_method: contract.payment_method().map(str::to_string),
            },
            customer: customer
                .map(|c| CustomerSection {
                    name: c.name().to_string(),
                    iin_bin: c.iin_bin().map(str::to_string),
                    document: c.document().map(|d| d.describe()),
                    phone: c.phone().map(str::to_string),
                    address: c.address().map(str::to_string),
                })
                .unwrap_or_default(),
            item: ItemSection {
                name: item.map(|i| i.name().to_string()).unwrap_or_default(),
                article: item.and_then(|i| i.article()).unwrap_or_default().to_string(),
                // 型号缺少时用 OTTS 补齐
                axle_count: item
                    .and_then(|i| i.axle_count())
                    .or_else(|| otts.map(|o| o.axle_count())),
                full_mass_kg: otts.and_then(|o| o.full_mass_kg()),
            },
            trailer: TrailerSection {
                vin: trailer.map(|t| t.vin().to_string()).unwrap_or_default(),
                manufacture_date: format_date(trailer.and_then(|t| t.manufacture_date())),
            },
            otts: OttsSection {
                number: otts.map(|o| o.number().to_string()),
                date: format_date(otts.and_then(|o| o.date())),
            },
        }
    }
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

pub struct ContractDocumentHandler {
    contract_repo: Arc<dyn ContractRepository>,
    trailer_repo: Arc<dyn TrailerRepository>,
    item_repo: Arc<dyn ItemRepository>,
    customer_repo: Arc<dyn CustomerRepository>,
    otts_repo: Arc<dyn OttsRepository>,
    renderer: Arc<dyn DocumentRenderer>,
}

impl ContractDocumentHandler {
    pub fn new(
        contract_repo: Arc<dyn ContractRepository>,
        trailer_repo: Arc<dyn TrailerRepository>,
        item_repo: Arc<dyn ItemRepository>,
        customer_repo: Arc<dyn CustomerRepository>,
        otts_repo: Arc<dyn OttsRepository>,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        Self {
            contract_repo,
            trailer_repo,
            item_repo,
            customer_repo,
            otts_repo,
            renderer,
        }
    }

    /// 收集合同、客户、挂车、型号和 OTTS 数据
    pub async fn build_context(&self, contract: &SalesContract) -> AppResult<ContractContext> {
        let trailer = self.trailer_repo.find_by_id(contract.trailer_id()).await?;
        let item = match &trailer {
            Some(t) => self.item_repo.find_by_id(t.item_id()).await?,
            None => None,
        };
        let customer = match contract.customer_id() {
            Some(id) => self.customer_repo.find_by_id(id).await?,
            None => None,
        };
        let otts = match trailer.as_ref().and_then(|t| t.vin().modification_code()) {
            Some(code) => self.otts_repo.find_by_modification(&code).await?,
            None => None,
        };

        Ok(ContractContext::build(
            contract,
            trailer.as_ref(),
            item.as_ref(),
            customer.as_ref(),
            otts.as_ref(),
        ))
    }

    pub async fn render_contract(&self, contract: &SalesContract) -> AppResult<Vec<u8>> {
        let context = self.build_context(contract).await?;
        let value = serde_json::to_value(&context)
            .map_err(|e| AppError::internal(format!("Failed to build document context: {}", e)))?;
        let pdf = self.renderer.render_pdf(CONTRACT_TEMPLATE, &value)?;
        debug!(contract_id = %contract.id(), bytes = pdf.len(), "Contract rendered");
        Ok(pdf)
    }

    /// 下载用 PDF
    pub async fn contract_pdf(&self, contract_id: ContractId) -> AppResult<RenderedDocument> {
        let contract = self
            .contract_repo
            .find_by_id(contract_id)
            .await?
            .ok_or_else(|| AppError::not_found("Договор не найден"))?;
        let bytes = self.render_contract(&contract).await?;
        info!(contract_id = %contract_id, "Contract PDF produced");
        Ok(RenderedDocument {
            file_name: format!("contract_{}.pdf", contract.display_number()),
            bytes,
        })
    }

    /// 供本地签名工具使用的 base64 PDF
    pub async fn contract_pdf_base64(&self, contract_id: ContractId) -> AppResult<String> {
        let document = self.contract_pdf(contract_id).await?;
        Ok(STANDARD.encode(document.bytes))
    }
}
