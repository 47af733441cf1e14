//! 仓库命令

use crate::domain::value_objects::{CallerIdentity, WarehouseId};

#[derive(Debug, Clone)]
pub struct CreateWarehouseCommand {
    pub caller: CallerIdentity,
    pub name: String,
    pub is_active: bool,
}

/// 启用/停用仓库
#[derive(Debug, Clone)]
pub struct SetWarehouseActiveCommand {
    pub warehouse_id: WarehouseId,
    pub caller: CallerIdentity,
    pub is_active: bool,
}
