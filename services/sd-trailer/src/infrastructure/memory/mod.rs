//! 内存存储
//!
//! 与 PostgreSQL 实现相同的约束和排序，用于测试和无数据库运行。

mod repository;
mod tables;
mod unit_of_work;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use repository::MemoryRepository;
pub use tables::StoreRules;
pub use unit_of_work::{InMemoryUnitOfWork, InMemoryUnitOfWorkFactory};

use tables::Tables;

/// 共享的内存表
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    rules: StoreRules,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 不检查 uq_sales_contract_trailer，用于模拟历史遗留的重复合同
    pub fn relaxed() -> Self {
        Self {
            tables: Arc::default(),
            rules: StoreRules {
                unique_contract_trailer: false,
            },
        }
    }

    pub fn rules(&self) -> StoreRules {
        self.rules
    }

    /// 自动提交的仓储
    pub fn repository(&self) -> Arc<MemoryRepository> {
        Arc::new(MemoryRepository::shared(self.tables.clone(), self.rules))
    }

    pub fn unit_of_work_factory(&self) -> Arc<InMemoryUnitOfWorkFactory> {
        Arc::new(InMemoryUnitOfWorkFactory::new(self.tables.clone(), self.rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ContractTerms, Item, SalesContract, Trailer, Warehouse};
    use crate::domain::enums::{ItemType, TrailerStatus};
    use crate::domain::repositories::{ContractRepository, ItemRepository, TrailerRepository, WarehouseRepository};
    use crate::domain::unit_of_work::UnitOfWorkFactory;
    use crate::domain::value_objects::{ItemId, Vin};
    use dealer_errors::AppError;

    async fn seed_trailer(store: &InMemoryStore) -> Trailer {
        let repo = store.repository();
        let warehouse = Warehouse::new("Алматы", true).unwrap();
        WarehouseRepository::save(repo.as_ref(), &warehouse).await.unwrap();
        let item = Item::restore(ItemId::new(), ItemType::Trailer, "Прицеп 817").with_article(Some("817".into()));
        ItemRepository::save(repo.as_ref(), &item).await.unwrap();
        let trailer = Trailer::new(
            Vin::new("Y3KA00002R0000123").unwrap(),
            item.id(),
            warehouse.id(),
            TrailerStatus::InStock,
            None,
        )
        .unwrap();
        TrailerRepository::save(repo.as_ref(), &trailer).await.unwrap();
        trailer
    }

    #[tokio::test]
    async fn test_commit_rechecks_constraints() {
        let store = InMemoryStore::new();
        let trailer = seed_trailer(&store).await;
        let factory = store.unit_of_work_factory();

        let first = factory.begin().await.unwrap();
        let second = factory.begin().await.unwrap();

        let a = SalesContract::new("1".into(), trailer.id(), ContractTerms::default(), None);
        let b = SalesContract::new("2".into(), trailer.id(), ContractTerms::default(), None);
        first.contracts().save(&a).await.unwrap();
        second.contracts().save(&b).await.unwrap();

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();
        match err {
            AppError::Conflict(msg) => assert!(msg.contains("uq_sales_contract_trailer")),
            other => panic!("unexpected error: {other:?}"),
        }

        let repo = store.repository();
        assert_eq!(ContractRepository::count_by_trailer(repo.as_ref(), trailer.id(), None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_status_write_requires_expected_status() {
        let store = InMemoryStore::new();
        let trailer = seed_trailer(&store).await;
        let repo = store.repository();

        let mut sold = trailer.clone();
        sold.mark_sold(None);
        TrailerRepository::update_status(repo.as_ref(), &sold, TrailerStatus::InStock)
            .await
            .unwrap();

        // 登记信息更新不写状态列
        let edited = trailer.clone().with_comment(Some("осмотр".into()));
        TrailerRepository::update(repo.as_ref(), &edited).await.unwrap();
        let stored = TrailerRepository::find_by_id(repo.as_ref(), trailer.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), TrailerStatus::Sold);
        assert_eq!(stored.comment(), Some("осмотр"));

        let err = TrailerRepository::update_status(repo.as_ref(), &trailer, TrailerStatus::InStock)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let store = InMemoryStore::new();
        let trailer = seed_trailer(&store).await;

        let uow = store.unit_of_work_factory().begin().await.unwrap();
        let contract = SalesContract::new("7".into(), trailer.id(), ContractTerms::default(), None);
        uow.contracts().save(&contract).await.unwrap();
        assert!(uow.contracts().find_by_id(contract.id()).await.unwrap().is_some());
        uow.rollback().await.unwrap();

        let repo = store.repository();
        assert!(ContractRepository::find_by_id(repo.as_ref(), contract.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_relaxed_store_allows_duplicate_trailer_contracts() {
        let store = InMemoryStore::relaxed();
        let trailer = seed_trailer(&store).await;
        let repo = store.repository();

        for number in ["1", "2"] {
            let contract = SalesContract::new(number.into(), trailer.id(), ContractTerms::default(), None);
            ContractRepository::save(repo.as_ref(), &contract).await.unwrap();
        }
        assert_eq!(ContractRepository::count_by_trailer(repo.as_ref(), trailer.id(), None).await.unwrap(), 2);

        let dup = SalesContract::new("2".into(), trailer.id(), ContractTerms::default(), None);
        let err = ContractRepository::save(repo.as_ref(), &dup).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg.contains("uq_sales_contract_number")));
    }

    #[tokio::test]
    async fn test_referenced_trailer_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let trailer = seed_trailer(&store).await;
        let repo = store.repository();
        let contract = SalesContract::new("1".into(), trailer.id(), ContractTerms::default(), None);
        ContractRepository::save(repo.as_ref(), &contract).await.unwrap();

        let err = TrailerRepository::delete(repo.as_ref(), trailer.id()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
