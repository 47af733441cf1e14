//! 内存表与约束检查
//!
//! 约束名和错误消息与 PostgreSQL 映射后的结果一致，上层无需区分存储实现。

use chrono::{DateTime, Utc};
use dealer_errors::{AppError, AppResult};

use crate::domain::entities::{
    contract_list_order, ContractFilter, Customer, Item, Otts, SalesContract, SigningRecord, Trailer,
    TrailerFilter, TrailerSummary, Warehouse,
};
use crate::domain::enums::TrailerStatus;
use crate::domain::repositories::{stale_signing, stale_trailer_status};
use crate::domain::value_objects::{ContractId, CustomerId, ItemId, OttsId, TrailerId, WarehouseId};

/// 存储级约束开关
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreRules {
    /// uq_sales_contract_trailer
    pub unique_contract_trailer: bool,
}

impl Default for StoreRules {
    fn default() -> Self {
        Self {
            unique_contract_trailer: true,
        }
    }
}

/// 写操作，事务内记录并在提交时重放
#[derive(Debug, Clone)]
pub(crate) enum Op {
    SaveItem(Item),
    UpdateItem(Item),
    DeleteItem(ItemId),
    SaveTrailer(Trailer),
    UpdateTrailer(Trailer),
    UpdateTrailerStatus {
        trailer: Trailer,
        expected: TrailerStatus,
    },
    DeleteTrailer(TrailerId),
    SaveWarehouse(Warehouse),
    UpdateWarehouse(Warehouse),
    SaveCustomer(Customer),
    UpdateCustomer(Customer),
    DeleteCustomer(CustomerId),
    SaveOtts(Otts),
    UpdateOtts(Otts),
    DeleteOtts(OttsId),
    SaveContract(SalesContract),
    UpdateContract(SalesContract),
    DeleteContract(ContractId),
    AttachDocument {
        id: ContractId,
        document_id: String,
        expire_at: DateTime<Utc>,
    },
    UpdateSigning {
        id: ContractId,
        expected_operation: Option<String>,
        signing: SigningRecord,
    },
}

fn unique(constraint: &str) -> AppError {
    AppError::conflict(format!("unique constraint {} violated", constraint))
}

fn referenced(constraint: &str) -> AppError {
    AppError::conflict(format!("record is still referenced ({})", constraint))
}

fn replace<T: Clone>(rows: &mut [T], matches: impl Fn(&T) -> bool, row: &T, missing: &str) -> AppResult<()> {
    let slot = rows
        .iter_mut()
        .find(|r| matches(r))
        .ok_or_else(|| AppError::not_found(missing.to_string()))?;
    *slot = row.clone();
    Ok(())
}

/// 全部实体表，Vec 保持插入顺序
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub items: Vec<Item>,
    pub trailers: Vec<Trailer>,
    pub warehouses: Vec<Warehouse>,
    pub customers: Vec<Customer>,
    pub otts: Vec<Otts>,
    pub contracts: Vec<SalesContract>,
}

impl Tables {
    /// 执行一个写操作；失败时不修改任何数据
    ///
    /// 返回值只对 AttachDocument 有意义：是否写入
    pub fn apply(&mut self, op: &Op, rules: StoreRules) -> AppResult<bool> {
        match op {
            Op::SaveItem(item) => {
                self.check_item(item)?;
                self.items.push(item.clone());
            }
            Op::UpdateItem(item) => {
                self.check_item(item)?;
                replace(&mut self.items, |i| i.id() == item.id(), item, "Номенклатура не найдена")?;
            }
            Op::DeleteItem(id) => {
                if self.trailers.iter().any(|t| t.item_id() == *id) {
                    return Err(referenced("trailers_item_id_fkey"));
                }
                self.items.retain(|i| i.id() != *id);
            }
            Op::SaveTrailer(trailer) => {
                self.check_trailer(trailer)?;
                self.trailers.push(trailer.clone());
            }
            Op::UpdateTrailer(trailer) => {
                self.check_trailer(trailer)?;
                let slot = self.trailer_mut(trailer.id())?;
                // 状态列不随登记信息更新
                *slot = trailer.clone().with_status(slot.status());
            }
            Op::UpdateTrailerStatus { trailer, expected } => {
                let slot = self.trailer_mut(trailer.id())?;
                if slot.status() != *expected {
                    return Err(stale_trailer_status());
                }
                *slot = slot
                    .clone()
                    .with_status(trailer.status())
                    .with_audit_info(trailer.audit_info().clone());
            }
            Op::DeleteTrailer(id) => {
                if self.contracts.iter().any(|c| c.trailer_id() == *id) {
                    return Err(referenced("sales_contracts_trailer_id_fkey"));
                }
                self.trailers.retain(|t| t.id() != *id);
            }
            Op::SaveWarehouse(warehouse) => {
                self.check_warehouse(warehouse)?;
                self.warehouses.push(warehouse.clone());
            }
            Op::UpdateWarehouse(warehouse) => {
                self.check_warehouse(warehouse)?;
                replace(&mut self.warehouses, |w| w.id() == warehouse.id(), warehouse, "Склад не найден")?;
            }
            Op::SaveCustomer(customer) => {
                self.check_customer(customer)?;
                self.customers.push(customer.clone());
            }
            Op::UpdateCustomer(customer) => {
                self.check_customer(customer)?;
                replace(&mut self.customers, |c| c.id() == customer.id(), customer, "Клиент не найден")?;
            }
            Op::DeleteCustomer(id) => {
                if self.contracts.iter().any(|c| c.customer_id() == Some(*id)) {
                    return Err(referenced("sales_contracts_customer_id_fkey"));
                }
                self.customers.retain(|c| c.id() != *id);
            }
            Op::SaveOtts(otts) => self.otts.push(otts.clone()),
            Op::UpdateOtts(otts) => {
                replace(&mut self.otts, |o| o.id() == otts.id(), otts, "ОТТС не найден")?;
            }
            Op::DeleteOtts(id) => {
                // ON DELETE SET NULL
                for trailer in self.trailers.iter_mut().filter(|t| t.otts_id() == Some(*id)) {
                    *trailer = trailer.clone().with_otts(None);
                }
                self.otts.retain(|o| o.id() != *id);
            }
            Op::SaveContract(contract) => {
                self.check_contract(contract, rules)?;
                self.contracts.push(contract.clone());
            }
            Op::UpdateContract(contract) => {
                self.check_contract(contract, rules)?;
                let slot = self
                    .contracts
                    .iter_mut()
                    .find(|c| c.id() == contract.id())
                    .ok_or_else(|| AppError::not_found("Договор не найден"))?;
                // 签名字段不随业务字段更新
                let signing = slot.signing().clone();
                *slot = contract.clone().with_signing(signing);
            }
            Op::DeleteContract(id) => self.contracts.retain(|c| c.id() != *id),
            Op::AttachDocument {
                id,
                document_id,
                expire_at,
            } => {
                let Some(contract) = self
                    .contracts
                    .iter_mut()
                    .find(|c| c.id() == *id && c.signing().document_id().is_none())
                else {
                    return Ok(false);
                };
                contract.signing_mut().register(document_id.clone(), *expire_at)?;
            }
            Op::UpdateSigning {
                id,
                expected_operation,
                signing,
            } => {
                let contract = self
                    .contracts
                    .iter_mut()
                    .find(|c| c.id() == *id)
                    .ok_or_else(|| AppError::not_found("Договор не найден"))?;
                if contract.signing().operation_id() != expected_operation.as_deref() {
                    return Err(stale_signing());
                }
                contract.signing_mut().clone_from(signing);
            }
        }
        Ok(true)
    }

    fn check_item(&self, item: &Item) -> AppResult<()> {
        if item.item_type().requires_article() && item.article().is_none() {
            return Err(AppError::validation("check constraint ck_item_trailer_article violated"));
        }
        if let Some(article) = item.article()
            && self.items.iter().any(|other| {
                other.id() != item.id() && other.item_type() == item.item_type() && other.article() == Some(article)
            })
        {
            return Err(unique("uq_item_article_type"));
        }
        Ok(())
    }

    fn check_trailer(&self, trailer: &Trailer) -> AppResult<()> {
        if self
            .trailers
            .iter()
            .any(|other| other.id() != trailer.id() && other.vin() == trailer.vin())
        {
            return Err(unique("uq_trailer_vin"));
        }
        if self.item(trailer.item_id()).is_none() {
            return Err(referenced("trailers_item_id_fkey"));
        }
        if self.warehouse(trailer.warehouse_id()).is_none() {
            return Err(referenced("trailers_warehouse_id_fkey"));
        }
        if let Some(otts_id) = trailer.otts_id()
            && !self.otts.iter().any(|o| o.id() == otts_id)
        {
            return Err(referenced("trailers_otts_id_fkey"));
        }
        Ok(())
    }

    fn check_warehouse(&self, warehouse: &Warehouse) -> AppResult<()> {
        if self
            .warehouses
            .iter()
            .any(|other| other.id() != warehouse.id() && other.name() == warehouse.name())
        {
            return Err(unique("uq_warehouse_name"));
        }
        Ok(())
    }

    fn check_customer(&self, customer: &Customer) -> AppResult<()> {
        let key = customer.identity_key();
        if self
            .customers
            .iter()
            .any(|other| other.id() != customer.id() && other.identity_key() == key)
        {
            return Err(unique("uq_customer_identity_key"));
        }
        Ok(())
    }

    fn check_contract(&self, contract: &SalesContract, rules: StoreRules) -> AppResult<()> {
        let others = || self.contracts.iter().filter(|other| other.id() != contract.id());

        if rules.unique_contract_trailer && others().any(|other| other.trailer_id() == contract.trailer_id()) {
            return Err(unique("uq_sales_contract_trailer"));
        }
        if let Some(number) = contract.contract_number()
            && others().any(|other| other.contract_number() == Some(number))
        {
            return Err(unique("uq_sales_contract_number"));
        }
        if self.trailer(contract.trailer_id()).is_none() {
            return Err(referenced("sales_contracts_trailer_id_fkey"));
        }
        if let Some(customer_id) = contract.customer_id()
            && self.customer(customer_id).is_none()
        {
            return Err(referenced("sales_contracts_customer_id_fkey"));
        }
        Ok(())
    }

    fn trailer_mut(&mut self, id: TrailerId) -> AppResult<&mut Trailer> {
        self.trailers
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or_else(|| AppError::not_found("Прицеп не найден"))
    }

    // ========== 查询 ==========

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn trailer(&self, id: TrailerId) -> Option<&Trailer> {
        self.trailers.iter().find(|t| t.id() == id)
    }

    pub fn warehouse(&self, id: WarehouseId) -> Option<&Warehouse> {
        self.warehouses.iter().find(|w| w.id() == id)
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id() == id)
    }

    pub fn contract(&self, id: ContractId) -> Option<&SalesContract> {
        self.contracts.iter().find(|c| c.id() == id)
    }

    pub fn trailer_summary(&self, trailer: &Trailer) -> Option<TrailerSummary> {
        let item = self.item(trailer.item_id())?;
        let warehouse = self.warehouse(trailer.warehouse_id())?;
        Some(TrailerSummary {
            trailer: trailer.clone(),
            article: item.article().map(str::to_string),
            item_name: item.name().to_string(),
            warehouse_name: warehouse.name().to_string(),
        })
    }

    /// 创建时间倒序
    pub fn trailer_summaries(&self, filter: &TrailerFilter) -> Vec<TrailerSummary> {
        let mut summaries: Vec<_> = self
            .trailers
            .iter()
            .filter_map(|t| self.trailer_summary(t))
            .filter(|s| filter.matches(s))
            .collect();
        summaries.sort_by(|a, b| {
            let key = |s: &TrailerSummary| (s.trailer.audit_info().created_at, s.trailer.id().0);
            key(b).cmp(&key(a))
        });
        summaries
    }

    pub fn contracts_matching(&self, filter: &ContractFilter) -> Vec<SalesContract> {
        let mut contracts: Vec<_> = self
            .contracts
            .iter()
            .filter(|c| filter.matches(c, self.trailer(c.trailer_id()).map(|t| t.warehouse_id())))
            .cloned()
            .collect();
        contracts.sort_by(contract_list_order);
        contracts
    }
}
