//! 挂车命令

use chrono::NaiveDate;
use dealer_errors::{AppError, AppResult};

use crate::application::queries::ModelSelection;
use crate::domain::enums::TrailerStatus;
use crate::domain::value_objects::{CallerIdentity, TrailerId, Vin, WarehouseId};

/// 创建挂车命令
///
/// 型号不直接指定，而是由特征选择经匹配器解析
#[derive(Debug, Clone)]
pub struct CreateTrailerCommand {
    pub caller: CallerIdentity,
    pub vin: String,
    pub model: ModelSelection,
    pub warehouse_id: WarehouseId,
    pub manufacture_date: Option<NaiveDate>,
    pub status: TrailerStatus,
    pub comment: Option<String>,
}

impl CreateTrailerCommand {
    /// 校验并规范化 VIN
    pub fn vin(&self) -> AppResult<Vin> {
        parse_vin(&self.vin)
    }
}

/// 编辑挂车命令
#[derive(Debug, Clone)]
pub struct UpdateTrailerCommand {
    pub trailer_id: TrailerId,
    pub caller: CallerIdentity,
    pub vin: String,
    pub model: ModelSelection,
    pub warehouse_id: WarehouseId,
    pub manufacture_date: Option<NaiveDate>,
    pub status: TrailerStatus,
    pub comment: Option<String>,
}

impl UpdateTrailerCommand {
    pub fn vin(&self) -> AppResult<Vin> {
        parse_vin(&self.vin)
    }
}

/// 删除挂车命令
#[derive(Debug, Clone)]
pub struct DeleteTrailerCommand {
    pub trailer_id: TrailerId,
    pub caller: CallerIdentity,
}

fn parse_vin(raw: &str) -> AppResult<Vin> {
    Vin::new(raw).map_err(|e| AppError::validation(e.to_string()))
}
