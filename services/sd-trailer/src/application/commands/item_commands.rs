//! 物料命令

use dealer_errors::{AppError, AppResult};
use rust_decimal::Decimal;

use crate::domain::entities::ItemSpec;
use crate::domain::value_objects::{CallerIdentity, ItemId};

/// 创建物料命令
#[derive(Debug, Clone)]
pub struct CreateItemCommand {
    pub caller: CallerIdentity,
    pub spec: ItemSpec,
}

impl CreateItemCommand {
    pub fn validate(&self) -> AppResult<()> {
        validate_spec(&self.spec)
    }
}

/// 更新物料命令（整体替换）
#[derive(Debug, Clone)]
pub struct UpdateItemCommand {
    pub item_id: ItemId,
    pub caller: CallerIdentity,
    pub spec: ItemSpec,
}

impl UpdateItemCommand {
    pub fn validate(&self) -> AppResult<()> {
        validate_spec(&self.spec)
    }
}

/// 删除物料命令
#[derive(Debug, Clone)]
pub struct DeleteItemCommand {
    pub item_id: ItemId,
    pub caller: CallerIdentity,
}

fn validate_spec(spec: &ItemSpec) -> AppResult<()> {
    if spec.base_price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(AppError::validation("Цена не может быть отрицательной"));
    }
    let negative = [
        spec.body_length_mm,
        spec.body_width_mm,
        spec.board_height_mm,
        spec.axle_count,
    ]
    .into_iter()
    .flatten()
    .any(|v| v < 0);
    if negative {
        return Err(AppError::validation("Размеры и количество осей не могут быть отрицательными"));
    }
    Ok(())
}
