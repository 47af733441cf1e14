//! 销售合同实体

use chrono::{DateTime, NaiveDate, Utc};
use dealer_common::{non_blank, AuditInfo, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::signing::SigningRecord;
use crate::domain::value_objects::{ContractId, CustomerId, TrailerId, WarehouseId};

/// 手工录入的合同来源标记
pub const SOURCE_MANUAL: &str = "manual";

/// 合同的业务字段（不含挂车与编号）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractTerms {
    pub contract_date: Option<NaiveDate>,
    pub customer_id: Option<CustomerId>,
    pub price: Option<Decimal>,
    pub payment_method: Option<String>,
    pub is_paid: bool,
    pub is_shipped: bool,
}

/// 销售合同
///
/// 每辆挂车最多一份合同（trailer_id 唯一），编号非空时全局唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesContract {
    id: ContractId,
    contract_number: Option<String>,
    contract_date: Option<NaiveDate>,
    customer_id: Option<CustomerId>,
    trailer_id: TrailerId,
    price: Option<Decimal>,
    payment_method: Option<String>,
    source: Option<String>,
    is_paid: bool,
    is_shipped: bool,
    signing: SigningRecord,
    audit_info: AuditInfo,
}

impl SalesContract {
    pub fn new(
        contract_number: String,
        trailer_id: TrailerId,
        terms: ContractTerms,
        user_id: Option<UserId>,
    ) -> Self {
        let mut contract = Self::restore(ContractId::new(), trailer_id);
        contract.contract_number = Some(contract_number);
        contract.source = Some(SOURCE_MANUAL.to_string());
        contract.apply_terms(terms);
        contract.audit_info = AuditInfo::new(user_id);
        contract
    }

    pub fn restore(id: ContractId, trailer_id: TrailerId) -> Self {
        Self {
            id,
            contract_number: None,
            contract_date: None,
            customer_id: None,
            trailer_id,
            price: None,
            payment_method: None,
            source: None,
            is_paid: false,
            is_shipped: false,
            signing: SigningRecord::default(),
            audit_info: AuditInfo::default(),
        }
    }

    /// 编辑：编号、挂车和业务字段整体替换
    pub fn revise(
        &mut self,
        contract_number: Option<String>,
        trailer_id: TrailerId,
        terms: ContractTerms,
        user_id: Option<UserId>,
    ) {
        self.contract_number = contract_number;
        self.trailer_id = trailer_id;
        self.apply_terms(terms);
        self.audit_info.update(user_id);
    }

    fn apply_terms(&mut self, terms: ContractTerms) {
        self.contract_date = terms.contract_date;
        self.customer_id = terms.customer_id;
        self.price = terms.price;
        self.payment_method = non_blank(terms.payment_method.as_deref());
        self.is_paid = terms.is_paid;
        self.is_shipped = terms.is_shipped;
    }

    /// 编号或 ID，用于文档标题
    pub fn display_number(&self) -> String {
        self.contract_number
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }

    // ========== Getters ==========

    pub fn id(&self) -> ContractId {
        self.id
    }

    pub fn contract_number(&self) -> Option<&str> {
        self.contract_number.as_deref()
    }

    pub fn contract_date(&self) -> Option<NaiveDate> {
        self.contract_date
    }

    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    pub fn trailer_id(&self) -> TrailerId {
        self.trailer_id
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_paid(&self) -> bool {
        self.is_paid
    }

    pub fn is_shipped(&self) -> bool {
        self.is_shipped
    }

    pub fn signing(&self) -> &SigningRecord {
        &self.signing
    }

    pub fn signing_mut(&mut self) -> &mut SigningRecord {
        &mut self.signing
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.audit_info.created_at
    }

    pub fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    // ========== Builders ==========

    pub fn with_number(mut self, contract_number: Option<String>) -> Self {
        self.contract_number = contract_number;
        self
    }

    pub fn with_terms(mut self, terms: ContractTerms) -> Self {
        self.apply_terms(terms);
        self
    }

    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.source = source;
        self
    }

    pub fn with_signing(mut self, signing: SigningRecord) -> Self {
        self.signing = signing;
        self
    }

    pub fn with_audit_info(mut self, audit_info: AuditInfo) -> Self {
        self.audit_info = audit_info;
        self
    }
}

/// 合同列表过滤条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractFilter {
    /// 按挂车所在仓库过滤
    pub warehouse_id: Option<WarehouseId>,
    pub is_paid: Option<bool>,
    pub is_shipped: Option<bool>,
}

impl ContractFilter {
    pub fn unpaid() -> Self {
        Self {
            is_paid: Some(false),
            ..Default::default()
        }
    }

    pub fn paid_not_shipped() -> Self {
        Self {
            is_paid: Some(true),
            is_shipped: Some(false),
            ..Default::default()
        }
    }

    /// 仓库条件需要挂车信息，由调用方传入挂车所在仓库
    pub fn matches(&self, contract: &SalesContract, trailer_warehouse: Option<WarehouseId>) -> bool {
        self.warehouse_id.is_none_or(|w| trailer_warehouse == Some(w))
            && self.is_paid.is_none_or(|v| contract.is_paid() == v)
            && self.is_shipped.is_none_or(|v| contract.is_shipped() == v)
    }
}

/// 合同列表排序：合同日期倒序（空值在后），再按创建时间倒序
pub fn contract_list_order(a: &SalesContract, b: &SalesContract) -> std::cmp::Ordering {
    match (a.contract_date(), b.contract_date()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
    .then_with(|| b.created_at().cmp(&a.created_at()))
    .then_with(|| b.id().0.cmp(&a.id().0))
}
