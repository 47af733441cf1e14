//! 内存仓储：同一个结构实现全部仓储接口

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dealer_errors::AppResult;
use tokio::sync::Mutex;

use crate::domain::entities::{
    ContractFilter, Customer, Item, Otts, SalesContract, SigningRecord, Trailer, TrailerFilter, TrailerSummary,
    Warehouse,
};
use crate::domain::enums::{ItemType, TrailerStatus};
use crate::domain::repositories::{
    ContractRepository, CustomerRepository, ItemRepository, OttsRepository, TrailerRepository,
    WarehouseRepository,
};
use crate::domain::value_objects::{
    ContractId, CustomerId, FeatureQuery, ItemId, MatchCriteria, OttsId, TrailerId, Vin, WarehouseId,
};

use super::tables::{Op, StoreRules, Tables};

/// 事务内的工作副本和写操作日志
#[derive(Debug, Default)]
pub(crate) struct Pending {
    pub working: Tables,
    pub log: Vec<Op>,
}

#[derive(Debug, Clone)]
enum Target {
    /// 直接读写共享表（自动提交）
    Shared(Arc<Mutex<Tables>>),
    /// 读写事务副本
    Transaction(Arc<Mutex<Pending>>),
}

/// 内存仓储
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    target: Target,
    rules: StoreRules,
}

impl MemoryRepository {
    pub(crate) fn shared(tables: Arc<Mutex<Tables>>, rules: StoreRules) -> Self {
        Self {
            target: Target::Shared(tables),
            rules,
        }
    }

    pub(crate) fn in_transaction(pending: Arc<Mutex<Pending>>, rules: StoreRules) -> Self {
        Self {
            target: Target::Transaction(pending),
            rules,
        }
    }

    async fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Tables) -> R + Send,
        R: Send,
    {
        match &self.target {
            Target::Shared(tables) => {
                let tables = tables.lock().await;
                f(&tables)
            }
            Target::Transaction(pending) => {
                let pending = pending.lock().await;
                f(&pending.working)
            }
        }
    }

    async fn write(&self, op: Op) -> AppResult<bool> {
        match &self.target {
            Target::Shared(tables) => tables.lock().await.apply(&op, self.rules),
            Target::Transaction(pending) => {
                let mut pending = pending.lock().await;
                let applied = pending.working.apply(&op, self.rules)?;
                pending.log.push(op);
                Ok(applied)
            }
        }
    }
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

// ========== 物料 ==========

#[async_trait]
impl ItemRepository for MemoryRepository {
    async fn find_by_id(&self, id: ItemId) -> AppResult<Option<Item>> {
        Ok(self.read(|t| t.item(id).cloned()).await)
    }

    async fn find_by_article(&self, article: &str, item_type: ItemType) -> AppResult<Option<Item>> {
        Ok(self
            .read(|t| {
                t.items
                    .iter()
                    .find(|i| i.item_type() == item_type && i.article() == Some(article))
                    .cloned()
            })
            .await)
    }

    async fn save(&self, item: &Item) -> AppResult<()> {
        self.write(Op::SaveItem(item.clone())).await.map(drop)
    }

    async fn update(&self, item: &Item) -> AppResult<()> {
        self.write(Op::UpdateItem(item.clone())).await.map(drop)
    }

    async fn delete(&self, id: ItemId) -> AppResult<()> {
        self.write(Op::DeleteItem(id)).await.map(drop)
    }

    async fn list(&self) -> AppResult<Vec<Item>> {
        let mut items = self.read(|t| t.items.clone()).await;
        items.sort_by(|a, b| {
            a.item_type()
                .as_str()
                .cmp(b.item_type().as_str())
                .then_with(|| match (a.article(), b.article()) {
                    (Some(x), Some(y)) => x.cmp(y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
                .then_with(|| a.name().cmp(b.name()))
        });
        Ok(items)
    }

    async fn list_active_trailers(&self) -> AppResult<Vec<Item>> {
        let mut items: Vec<Item> = self
            .read(|t| {
                t.items
                    .iter()
                    .filter(|i| i.item_type() == ItemType::Trailer && i.is_active())
                    .cloned()
                    .collect()
            })
            .await;
        items.sort_by(|a, b| a.article().cmp(&b.article()).then_with(|| a.name().cmp(b.name())));
        Ok(items)
    }

    async fn find_first_matching(&self, criteria: &MatchCriteria) -> AppResult<Option<Item>> {
        Ok(self
            .read(|t| {
                t.items
                    .iter()
                    .filter(|i| i.item_type() == ItemType::Trailer && i.is_active())
                    .find(|i| criteria.matches(i))
                    .cloned()
            })
            .await)
    }

    async fn find_first_by_features(&self, query: &FeatureQuery) -> AppResult<Option<Item>> {
        Ok(self
            .read(|t| {
                t.items
                    .iter()
                    .filter(|i| i.item_type() == ItemType::Trailer && i.is_active())
                    .find(|i| query.matches(i))
                    .cloned()
            })
            .await)
    }
}

// ========== 挂车 ==========

#[async_trait]
impl TrailerRepository for MemoryRepository {
    async fn find_by_id(&self, id: TrailerId) -> AppResult<Option<Trailer>> {
        Ok(self.read(|t| t.trailer(id).cloned()).await)
    }

    async fn find_by_vin(&self, vin: &Vin) -> AppResult<Option<Trailer>> {
        Ok(self
            .read(|t| t.trailers.iter().find(|tr| tr.vin() == vin).cloned())
            .await)
    }

    async fn save(&self, trailer: &Trailer) -> AppResult<()> {
        self.write(Op::SaveTrailer(trailer.clone())).await.map(drop)
    }

    async fn update(&self, trailer: &Trailer) -> AppResult<()> {
        self.write(Op::UpdateTrailer(trailer.clone())).await.map(drop)
    }

    async fn update_status(&self, trailer: &Trailer, expected: TrailerStatus) -> AppResult<()> {
        self.write(Op::UpdateTrailerStatus {
            trailer: trailer.clone(),
            expected,
        })
        .await
        .map(drop)
    }

    async fn delete(&self, id: TrailerId) -> AppResult<()> {
        self.write(Op::DeleteTrailer(id)).await.map(drop)
    }

    async fn list(&self, filter: &TrailerFilter) -> AppResult<Vec<TrailerSummary>> {
        Ok(self.read(|t| t.trailer_summaries(filter)).await)
    }

    async fn count_by_item(&self, item_id: ItemId) -> AppResult<i64> {
        Ok(self
            .read(|t| count(t.trailers.iter().filter(|tr| tr.item_id() == item_id).count()))
            .await)
    }
}

// ========== 仓库 ==========

#[async_trait]
impl WarehouseRepository for MemoryRepository {
    async fn find_by_id(&self, id: WarehouseId) -> AppResult<Option<Warehouse>> {
        Ok(self.read(|t| t.warehouse(id).cloned()).await)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Warehouse>> {
        Ok(self
            .read(|t| t.warehouses.iter().find(|w| w.name() == name).cloned())
            .await)
    }

    async fn save(&self, warehouse: &Warehouse) -> AppResult<()> {
        self.write(Op::SaveWarehouse(warehouse.clone())).await.map(drop)
    }

    async fn update(&self, warehouse: &Warehouse) -> AppResult<()> {
        self.write(Op::UpdateWarehouse(warehouse.clone())).await.map(drop)
    }

    async fn list(&self) -> AppResult<Vec<Warehouse>> {
        let mut warehouses = self.read(|t| t.warehouses.clone()).await;
        warehouses.sort_by(|a, b| {
            b.is_active()
                .cmp(&a.is_active())
                .then_with(|| a.name().cmp(b.name()))
        });
        Ok(warehouses)
    }
}

// ========== 客户 ==========

#[async_trait]
impl CustomerRepository for MemoryRepository {
    async fn find_by_id(&self, id: CustomerId) -> AppResult<Option<Customer>> {
        Ok(self.read(|t| t.customer(id).cloned()).await)
    }

    async fn find_by_identity_key(&self, key: &str) -> AppResult<Option<Customer>> {
        Ok(self
            .read(|t| {
                t.customers
                    .iter()
                    .find(|c| c.identity_key().as_storage_key() == key)
                    .cloned()
            })
            .await)
    }

    async fn save(&self, customer: &Customer) -> AppResult<()> {
        self.write(Op::SaveCustomer(customer.clone())).await.map(drop)
    }

    async fn update(&self, customer: &Customer) -> AppResult<()> {
        self.write(Op::UpdateCustomer(customer.clone())).await.map(drop)
    }

    async fn delete(&self, id: CustomerId) -> AppResult<()> {
        self.write(Op::DeleteCustomer(id)).await.map(drop)
    }

    async fn search(&self, term: Option<&str>) -> AppResult<Vec<Customer>> {
        let mut customers: Vec<Customer> = self
            .read(|t| {
                t.customers
                    .iter()
                    .filter(|c| term.is_none_or(|term| c.matches_search(term)))
                    .cloned()
                    .collect()
            })
            .await;
        customers.sort_by(|a, b| {
            a.customer_type()
                .as_str()
                .cmp(b.customer_type().as_str())
                .then_with(|| a.name().cmp(b.name()))
        });
        Ok(customers)
    }
}

// ========== OTTS ==========

#[async_trait]
impl OttsRepository for MemoryRepository {
    async fn find_by_id(&self, id: OttsId) -> AppResult<Option<Otts>> {
        Ok(self
            .read(|t| t.otts.iter().find(|o| o.id() == id).cloned())
            .await)
    }

    /// 启用的优先，其次按插入顺序
    async fn find_by_modification(&self, modification: &str) -> AppResult<Option<Otts>> {
        Ok(self
            .read(|t| {
                let candidates = || t.otts.iter().filter(|o| o.modification() == modification);
                candidates()
                    .find(|o| o.is_active())
                    .or_else(|| candidates().next())
                    .cloned()
            })
            .await)
    }

    async fn save(&self, otts: &Otts) -> AppResult<()> {
        self.write(Op::SaveOtts(otts.clone())).await.map(drop)
    }

    async fn update(&self, otts: &Otts) -> AppResult<()> {
        self.write(Op::UpdateOtts(otts.clone())).await.map(drop)
    }

    async fn delete(&self, id: OttsId) -> AppResult<()> {
        self.write(Op::DeleteOtts(id)).await.map(drop)
    }

    async fn list(&self) -> AppResult<Vec<Otts>> {
        let mut otts = self.read(|t| t.otts.clone()).await;
        otts.sort_by(|a, b| {
            a.modification()
                .cmp(b.modification())
                .then_with(|| a.axle_count().cmp(&b.axle_count()))
        });
        Ok(otts)
    }
}

// ========== 合同 ==========

#[async_trait]
impl ContractRepository for MemoryRepository {
    async fn find_by_id(&self, id: ContractId) -> AppResult<Option<SalesContract>> {
        Ok(self.read(|t| t.contract(id).cloned()).await)
    }

    async fn count_by_trailer(&self, trailer_id: TrailerId, exclude: Option<ContractId>) -> AppResult<i64> {
        Ok(self
            .read(|t| {
                count(
                    t.contracts
                        .iter()
                        .filter(|c| c.trailer_id() == trailer_id && Some(c.id()) != exclude)
                        .count(),
                )
            })
            .await)
    }

    async fn count_by_customer(&self, customer_id: CustomerId) -> AppResult<i64> {
        Ok(self
            .read(|t| {
                count(
                    t.contracts
                        .iter()
                        .filter(|c| c.customer_id() == Some(customer_id))
                        .count(),
                )
            })
            .await)
    }

    async fn number_exists(&self, number: &str, exclude: Option<ContractId>) -> AppResult<bool> {
        Ok(self
            .read(|t| {
                t.contracts
                    .iter()
                    .any(|c| c.contract_number() == Some(number) && Some(c.id()) != exclude)
            })
            .await)
    }

    async fn contract_numbers(&self) -> AppResult<Vec<String>> {
        Ok(self
            .read(|t| {
                t.contracts
                    .iter()
                    .filter_map(|c| c.contract_number())
                    .filter(|n| !n.trim().is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .await)
    }

    async fn save(&self, contract: &SalesContract) -> AppResult<()> {
        self.write(Op::SaveContract(contract.clone())).await.map(drop)
    }

    async fn update(&self, contract: &SalesContract) -> AppResult<()> {
        self.write(Op::UpdateContract(contract.clone())).await.map(drop)
    }

    async fn delete(&self, id: ContractId) -> AppResult<()> {
        self.write(Op::DeleteContract(id)).await.map(drop)
    }

    async fn list(&self, filter: &ContractFilter) -> AppResult<Vec<SalesContract>> {
        Ok(self.read(|t| t.contracts_matching(filter)).await)
    }

    async fn attach_document(
        &self,
        id: ContractId,
        document_id: &str,
        expire_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        self.write(Op::AttachDocument {
            id,
            document_id: document_id.to_string(),
            expire_at,
        })
        .await
    }

    async fn update_signing(
        &self,
        id: ContractId,
        expected_operation: Option<&str>,
        signing: &SigningRecord,
    ) -> AppResult<()> {
        self.write(Op::UpdateSigning {
            id,
            expected_operation: expected_operation.map(str::to_string),
            signing: signing.clone(),
        })
        .await
        .map(drop)
    }
}
