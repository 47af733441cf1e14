//! 仓库仓储 PostgreSQL 实现

use async_trait::async_trait;
use dealer_adapter_postgres::{PgExecutor, SharedTransaction};
use dealer_errors::{AppError, AppResult};
use sqlx::PgPool;

use crate::domain::entities::Warehouse;
use crate::domain::repositories::WarehouseRepository;
use crate::domain::value_objects::WarehouseId;

use super::converters::warehouse_from_row;
use super::rows::WarehouseRow;

pub struct PostgresWarehouseRepository {
    executor: PgExecutor,
}

impl PostgresWarehouseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            executor: PgExecutor::Pool(pool),
        }
    }

    pub fn in_transaction(tx: SharedTransaction) -> Self {
        Self {
            executor: PgExecutor::Transaction(tx),
        }
    }
}

#[async_trait]
impl WarehouseRepository for PostgresWarehouseRepository {
    async fn find_by_id(&self, id: WarehouseId) -> AppResult<Option<Warehouse>> {
        let row = self
            .executor
            .fetch_optional(
                sqlx::query_as::<_, WarehouseRow>("SELECT id, name, is_active FROM warehouses WHERE id = $1")
                    .bind(id.0),
            )
            .await?;
        Ok(row.map(warehouse_from_row))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Warehouse>> {
        let row = self
            .executor
            .fetch_optional(
                sqlx::query_as::<_, WarehouseRow>("SELECT id, name, is_active FROM warehouses WHERE name = $1")
                    .bind(name),
            )
            .await?;
        Ok(row.map(warehouse_from_row))
    }

    async fn save(&self, warehouse: &Warehouse) -> AppResult<()> {
        self.executor
            .execute(
                sqlx::query("INSERT INTO warehouses (id, name, is_active) VALUES ($1, $2, $3)")
                    .bind(warehouse.id().0)
                    .bind(warehouse.name())
                    .bind(warehouse.is_active()),
            )
            .await?;
        Ok(())
    }

    async fn update(&self, warehouse: &Warehouse) -> AppResult<()> {
        let result = self
            .executor
            .execute(
                sqlx::query("UPDATE warehouses SET name = $2, is_active = $3 WHERE id = $1")
                    .bind(warehouse.id().0)
                    .bind(warehouse.name())
                    .bind(warehouse.is_active()),
            )
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Склад не найден"));
        }
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Warehouse>> {
        let rows = self
            .executor
            .fetch_all(sqlx::query_as::<_, WarehouseRow>(
                "SELECT id, name, is_active FROM warehouses ORDER BY is_active DESC, name",
            ))
            .await?;
        Ok(rows.into_iter().map(warehouse_from_row).collect())
    }
}
