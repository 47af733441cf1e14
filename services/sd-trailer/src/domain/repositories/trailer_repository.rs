//! 挂车仓储接口

use async_trait::async_trait;
use dealer_errors::{AppError, AppResult};

use crate::domain::entities::{Trailer, TrailerFilter, TrailerSummary};
use crate::domain::enums::TrailerStatus;
use crate::domain::value_objects::{ItemId, TrailerId, Vin};

/// 条件状态写入失败：读取之后状态已被其他事务修改
pub fn stale_trailer_status() -> AppError {
    AppError::conflict("Конфликт сохранения (статус прицепа изменился). Обнови страницу и попробуй снова.")
}

#[async_trait]
pub trait TrailerRepository: Send + Sync {
    async fn find_by_id(&self, id: TrailerId) -> AppResult<Option<Trailer>>;

    async fn find_by_vin(&self, vin: &Vin) -> AppResult<Option<Trailer>>;

    async fn save(&self, trailer: &Trailer) -> AppResult<()>;

    /// 更新登记信息，不写状态列
    async fn update(&self, trailer: &Trailer) -> AppResult<()>;

    /// 写入 `trailer.status()`，仅当存储中的状态仍为 `expected`
    ///
    /// 状态已变化时返回 [`stale_trailer_status`]
    async fn update_status(&self, trailer: &Trailer, expected: TrailerStatus) -> AppResult<()>;

    async fn delete(&self, id: TrailerId) -> AppResult<()>;

    /// 列表，按创建时间倒序
    async fn list(&self, filter: &TrailerFilter) -> AppResult<Vec<TrailerSummary>>;

    /// 引用该型号的挂车数量
    async fn count_by_item(&self, item_id: ItemId) -> AppResult<i64>;
}
