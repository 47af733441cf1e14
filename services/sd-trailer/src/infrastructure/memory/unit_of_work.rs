//! 内存 Unit of Work
//!
//! 开始时复制共享表，事务内的写操作作用于副本并记录日志；
//! 提交时在最新的共享表上重放日志并重新检查约束，任一失败则整体放弃。

use std::sync::Arc;

use async_trait::async_trait;
use dealer_errors::AppResult;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::repositories::{
    ContractRepository, CustomerRepository, ItemRepository, OttsRepository, TrailerRepository,
    WarehouseRepository,
};
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};

use super::repository::{MemoryRepository, Pending};
use super::tables::{StoreRules, Tables};

/// 内存 Unit of Work 工厂
pub struct InMemoryUnitOfWorkFactory {
    tables: Arc<Mutex<Tables>>,
    rules: StoreRules,
}

impl InMemoryUnitOfWorkFactory {
    pub(crate) fn new(tables: Arc<Mutex<Tables>>, rules: StoreRules) -> Self {
        Self { tables, rules }
    }
}

#[async_trait]
impl UnitOfWorkFactory for InMemoryUnitOfWorkFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let working = self.tables.lock().await.clone();
        let pending = Arc::new(Mutex::new(Pending {
            working,
            log: Vec::new(),
        }));
        Ok(Box::new(InMemoryUnitOfWork {
            tables: self.tables.clone(),
            repo: MemoryRepository::in_transaction(pending.clone(), self.rules),
            pending,
            rules: self.rules,
        }))
    }
}

pub struct InMemoryUnitOfWork {
    tables: Arc<Mutex<Tables>>,
    pending: Arc<Mutex<Pending>>,
    repo: MemoryRepository,
    rules: StoreRules,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn items(&self) -> &dyn ItemRepository {
        &self.repo
    }

    fn trailers(&self) -> &dyn TrailerRepository {
        &self.repo
    }

    fn warehouses(&self) -> &dyn WarehouseRepository {
        &self.repo
    }

    fn customers(&self) -> &dyn CustomerRepository {
        &self.repo
    }

    fn otts(&self) -> &dyn OttsRepository {
        &self.repo
    }

    fn contracts(&self) -> &dyn ContractRepository {
        &self.repo
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let pending = self.pending.lock().await;
        let mut tables = self.tables.lock().await;

        let mut next = tables.clone();
        for op in &pending.log {
            next.apply(op, self.rules)?;
        }
        *tables = next;
        debug!(operations = pending.log.len(), "In-memory transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}
