//! 仓库实体

use dealer_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::WarehouseId;

/// 仓库
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    id: WarehouseId,
    /// 唯一
    name: String,
    is_active: bool,
}

impl Warehouse {
    pub fn new(name: &str, is_active: bool) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Укажите название склада"));
        }
        Ok(Self {
            id: WarehouseId::new(),
            name: name.to_string(),
            is_active,
        })
    }

    pub fn restore(id: WarehouseId, name: String, is_active: bool) -> Self {
        Self {
            id,
            name,
            is_active,
        }
    }

    pub fn id(&self) -> WarehouseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }
}
