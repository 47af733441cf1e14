//! 仓库维护

use std::sync::Arc;

use dealer_errors::{AppError, AppResult};
use tracing::{info, warn};

use crate::application::commands::{CreateWarehouseCommand, SetWarehouseActiveCommand};
use crate::domain::entities::Warehouse;
use crate::domain::repositories::WarehouseRepository;
use crate::domain::value_objects::WarehouseId;

pub struct WarehouseHandler {
    warehouse_repo: Arc<dyn WarehouseRepository>,
}

impl WarehouseHandler {
    pub fn new(warehouse_repo: Arc<dyn WarehouseRepository>) -> Self {
        Self { warehouse_repo }
    }

    pub async fn create_warehouse(&self, cmd: CreateWarehouseCommand) -> AppResult<WarehouseId> {
        cmd.caller.require_admin()?;
        let warehouse = Warehouse::new(&cmd.name, cmd.is_active)?;

        if self.warehouse_repo.find_by_name(warehouse.name()).await?.is_some() {
            warn!(name = warehouse.name(), "Duplicate warehouse name");
            return Err(AppError::conflict("Склад с таким названием уже существует"));
        }

        self.warehouse_repo.save(&warehouse).await?;
        info!(warehouse_id = %warehouse.id(), name = warehouse.name(), "Warehouse created");
        Ok(warehouse.id())
    }

    pub async fn set_active(&self, cmd: SetWarehouseActiveCommand) -> AppResult<()> {
        cmd.caller.require_admin()?;
        let mut warehouse = self.get_warehouse(cmd.warehouse_id).await?;
        warehouse.set_active(cmd.is_active);
        self.warehouse_repo.update(&warehouse).await?;
        info!(warehouse_id = %warehouse.id(), is_active = cmd.is_active, "Warehouse toggled");
        Ok(())
    }

    pub async fn get_warehouse(&self, warehouse_id: WarehouseId) -> AppResult<Warehouse> {
        self.warehouse_repo
            .find_by_id(warehouse_id)
            .await?
            .ok_or_else(|| AppError::not_found("Склад не найден"))
    }

    pub async fn list_warehouses(&self) -> AppResult<Vec<Warehouse>> {
        self.warehouse_repo.list().await
    }
}
