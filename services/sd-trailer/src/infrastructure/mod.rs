//! 基础设施层
//!
//! 仓储的 PostgreSQL 实现和内存实现

pub mod memory;
pub mod persistence;

use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::repositories::{
    ContractRepository, CustomerRepository, ItemRepository, OttsRepository, TrailerRepository,
    WarehouseRepository,
};
use crate::domain::unit_of_work::UnitOfWorkFactory;

use memory::InMemoryStore;
use persistence::{
    PostgresContractRepository, PostgresCustomerRepository, PostgresItemRepository, PostgresOttsRepository,
    PostgresTrailerRepository, PostgresUnitOfWorkFactory, PostgresWarehouseRepository,
};

/// 一组仓储和工作单元工厂，两种存储实现共用
#[derive(Clone)]
pub struct Persistence {
    pub items: Arc<dyn ItemRepository>,
    pub trailers: Arc<dyn TrailerRepository>,
    pub warehouses: Arc<dyn WarehouseRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub otts: Arc<dyn OttsRepository>,
    pub contracts: Arc<dyn ContractRepository>,
    pub uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl Persistence {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            items: Arc::new(PostgresItemRepository::new(pool.clone())),
            trailers: Arc::new(PostgresTrailerRepository::new(pool.clone())),
            warehouses: Arc::new(PostgresWarehouseRepository::new(pool.clone())),
            customers: Arc::new(PostgresCustomerRepository::new(pool.clone())),
            otts: Arc::new(PostgresOttsRepository::new(pool.clone())),
            contracts: Arc::new(PostgresContractRepository::new(pool.clone())),
            uow_factory: Arc::new(PostgresUnitOfWorkFactory::new(pool)),
        }
    }

    pub fn in_memory(store: &InMemoryStore) -> Self {
        let repo = store.repository();
        Self {
            items: repo.clone(),
            trailers: repo.clone(),
            warehouses: repo.clone(),
            customers: repo.clone(),
            otts: repo.clone(),
            contracts: repo,
            uow_factory: store.unit_of_work_factory(),
        }
    }
}
