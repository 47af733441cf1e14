//! 销售合同仓储接口

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dealer_errors::{AppError, AppResult};

use crate::domain::entities::{ContractFilter, SalesContract, SigningRecord};
use crate::domain::value_objects::{ContractId, CustomerId, TrailerId};

/// 条件签名写入失败：读取之后签名操作已被其他请求替换
pub fn stale_signing() -> AppError {
    AppError::conflict("Конфликт сохранения (статус подписания изменился). Обнови страницу и попробуй снова.")
}

#[async_trait]
pub trait ContractRepository: Send + Sync {
    async fn find_by_id(&self, id: ContractId) -> AppResult<Option<SalesContract>>;

    /// 引用该挂车的合同数量（可排除指定合同）
    async fn count_by_trailer(&self, trailer_id: TrailerId, exclude: Option<ContractId>) -> AppResult<i64>;

    async fn count_by_customer(&self, customer_id: CustomerId) -> AppResult<i64>;

    /// 编号是否已被其他合同使用
    async fn number_exists(&self, number: &str, exclude: Option<ContractId>) -> AppResult<bool>;

    /// 所有非空编号
    async fn contract_numbers(&self) -> AppResult<Vec<String>>;

    async fn save(&self, contract: &SalesContract) -> AppResult<()>;

    async fn update(&self, contract: &SalesContract) -> AppResult<()>;

    async fn delete(&self, id: ContractId) -> AppResult<()>;

    /// 按合同日期倒序（空值在后），再按创建顺序倒序
    async fn list(&self, filter: &ContractFilter) -> AppResult<Vec<SalesContract>>;

    /// 仅在尚未保存文档 ID 时写入，返回是否写入成功
    async fn attach_document(
        &self,
        id: ContractId,
        document_id: &str,
        expire_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// 覆盖保存签名子记录，仅当存储中的二维码操作 ID 仍为 `expected_operation`
    ///
    /// 操作 ID 已变化时返回 [`stale_signing`]
    async fn update_signing(
        &self,
        id: ContractId,
        expected_operation: Option<&str>,
        signing: &SigningRecord,
    ) -> AppResult<()>;
}
