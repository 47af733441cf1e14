//! Unit of Work 模式
//!
//! 合同创建/编辑/删除需要同时修改合同和挂车状态，必须在同一事务中完成。

use async_trait::async_trait;
use dealer_errors::AppResult;

use crate::domain::repositories::{
    ContractRepository, CustomerRepository, ItemRepository, OttsRepository, TrailerRepository,
    WarehouseRepository,
};

/// Unit of Work trait
///
/// ```ignore
/// let uow = uow_factory.begin().await?;
///
/// uow.trailers().update_status(&trailer, previous).await?;
/// uow.contracts().save(&contract).await?;
///
/// // 唯一约束冲突在提交时以 Conflict 返回，事务整体回滚
/// uow.commit().await?;
/// ```
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn items(&self) -> &dyn ItemRepository;

    fn trailers(&self) -> &dyn TrailerRepository;

    fn warehouses(&self) -> &dyn WarehouseRepository;

    fn customers(&self) -> &dyn CustomerRepository;

    fn otts(&self) -> &dyn OttsRepository;

    fn contracts(&self) -> &dyn ContractRepository;

    /// 提交事务
    ///
    /// 失败时所有更改都不会生效。
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// 回滚事务
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Unit of Work 工厂 trait
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    /// 开始新的事务
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}
