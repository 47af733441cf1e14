//! OTTS 仓储接口

use async_trait::async_trait;
use dealer_errors::AppResult;

use crate::domain::entities::Otts;
use crate::domain::value_objects::OttsId;

#[async_trait]
pub trait OttsRepository: Send + Sync {
    async fn find_by_id(&self, id: OttsId) -> AppResult<Option<Otts>>;

    /// 修改码对应的第一条证书
    async fn find_by_modification(&self, modification: &str) -> AppResult<Option<Otts>>;

    async fn save(&self, otts: &Otts) -> AppResult<()>;

    async fn update(&self, otts: &Otts) -> AppResult<()>;

    async fn delete(&self, id: OttsId) -> AppResult<()>;

    /// 按 (修改码, 轴数) 排序
    async fn list(&self) -> AppResult<Vec<Otts>>;
}
