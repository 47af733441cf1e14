//! 仓库仓储接口

use async_trait::async_trait;
use dealer_errors::AppResult;

use crate::domain::entities::Warehouse;
use crate::domain::value_objects::WarehouseId;

#[async_trait]
pub trait WarehouseRepository: Send + Sync {
    async fn find_by_id(&self, id: WarehouseId) -> AppResult<Option<Warehouse>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Warehouse>>;

    async fn save(&self, warehouse: &Warehouse) -> AppResult<()>;

    async fn update(&self, warehouse: &Warehouse) -> AppResult<()>;

    /// 启用的在前，再按名称
    async fn list(&self) -> AppResult<Vec<Warehouse>>;
}
