//! PostgreSQL Unit of Work 实现
//!
//! 所有仓储共享同一个事务；唯一约束冲突在语句执行或提交时以 Conflict 返回。

use async_trait::async_trait;
use dealer_adapter_postgres::{begin_shared, commit_shared, rollback_shared, SharedTransaction};
use dealer_errors::AppResult;
use sqlx::PgPool;

use crate::domain::repositories::{
    ContractRepository, CustomerRepository, ItemRepository, OttsRepository, TrailerRepository,
    WarehouseRepository,
};
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};

use super::{
    PostgresContractRepository, PostgresCustomerRepository, PostgresItemRepository, PostgresOttsRepository,
    PostgresTrailerRepository, PostgresWarehouseRepository,
};

/// PostgreSQL Unit of Work 工厂
pub struct PostgresUnitOfWorkFactory {
    pool: PgPool,
}

impl PostgresUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactory for PostgresUnitOfWorkFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = begin_shared(&self.pool).await?;
        Ok(Box::new(PostgresUnitOfWork::new(tx)))
    }
}

/// 持有一个事务和绑定到该事务的仓储
pub struct PostgresUnitOfWork {
    tx: SharedTransaction,
    item_repo: PostgresItemRepository,
    trailer_repo: PostgresTrailerRepository,
    warehouse_repo: PostgresWarehouseRepository,
    customer_repo: PostgresCustomerRepository,
    otts_repo: PostgresOttsRepository,
    contract_repo: PostgresContractRepository,
}

impl PostgresUnitOfWork {
    fn new(tx: SharedTransaction) -> Self {
        Self {
            item_repo: PostgresItemRepository::in_transaction(tx.clone()),
            trailer_repo: PostgresTrailerRepository::in_transaction(tx.clone()),
            warehouse_repo: PostgresWarehouseRepository::in_transaction(tx.clone()),
            customer_repo: PostgresCustomerRepository::in_transaction(tx.clone()),
            otts_repo: PostgresOttsRepository::in_transaction(tx.clone()),
            contract_repo: PostgresContractRepository::in_transaction(tx.clone()),
            tx,
        }
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    fn items(&self) -> &dyn ItemRepository {
        &self.item_repo
    }

    fn trailers(&self) -> &dyn TrailerRepository {
        &self.trailer_repo
    }

    fn warehouses(&self) -> &dyn WarehouseRepository {
        &self.warehouse_repo
    }

    fn customers(&self) -> &dyn CustomerRepository {
        &self.customer_repo
    }

    fn otts(&self) -> &dyn OttsRepository {
        &self.otts_repo
    }

    fn contracts(&self) -> &dyn ContractRepository {
        &self.contract_repo
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        commit_shared(&self.tx).await
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        rollback_shared(&self.tx).await
    }
}
