//! 客户仓储接口

use async_trait::async_trait;
use dealer_errors::AppResult;

use crate::domain::entities::Customer;
use crate::domain::value_objects::CustomerId;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: CustomerId) -> AppResult<Option<Customer>>;

    /// 按去重键（`CustomerIdentityKey::as_storage_key`）查找
    async fn find_by_identity_key(&self, key: &str) -> AppResult<Option<Customer>>;

    async fn save(&self, customer: &Customer) -> AppResult<()>;

    async fn update(&self, customer: &Customer) -> AppResult<()>;

    async fn delete(&self, id: CustomerId) -> AppResult<()>;

    /// 子串搜索（名称、联系人、税号、电话），按 (类型, 名称) 排序
    async fn search(&self, term: Option<&str>) -> AppResult<Vec<Customer>>;
}
