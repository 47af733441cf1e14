//! 物料仓储接口

use async_trait::async_trait;
use dealer_errors::AppResult;

use crate::domain::entities::Item;
use crate::domain::enums::ItemType;
use crate::domain::value_objects::{FeatureQuery, ItemId, MatchCriteria};

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn find_by_id(&self, id: ItemId) -> AppResult<Option<Item>>;

    /// 按 (article, item_type) 查找
    async fn find_by_article(&self, article: &str, item_type: ItemType) -> AppResult<Option<Item>>;

    async fn save(&self, item: &Item) -> AppResult<()>;

    async fn update(&self, item: &Item) -> AppResult<()>;

    async fn delete(&self, id: ItemId) -> AppResult<()>;

    /// 按 (item_type, article, name) 排序
    async fn list(&self) -> AppResult<Vec<Item>>;

    /// 所有启用的挂车型号（存储自然顺序）
    async fn list_active_trailers(&self) -> AppResult<Vec<Item>>;

    /// 第一个满足条件的型号；多条满足时取存储自然顺序的第一条
    async fn find_first_matching(&self, criteria: &MatchCriteria) -> AppResult<Option<Item>>;

    async fn find_first_by_features(&self, query: &FeatureQuery) -> AppResult<Option<Item>>;
}
