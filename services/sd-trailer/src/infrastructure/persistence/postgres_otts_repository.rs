//! OTTS 仓储 PostgreSQL 实现

use async_trait::async_trait;
use dealer_adapter_postgres::{PgExecutor, SharedTransaction};
use dealer_errors::{AppError, AppResult};
use sqlx::PgPool;

use crate::domain::entities::Otts;
use crate::domain::repositories::OttsRepository;
use crate::domain::value_objects::OttsId;

use super::converters::otts_from_row;
use super::rows::OttsRow;

const OTTS_COLUMNS: &str = "id, number, date, modification, name, axle_count, full_mass_kg, is_active";

pub struct PostgresOttsRepository {
    executor: PgExecutor,
}

impl PostgresOttsRepository {
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
impl OttsRepository for PostgresOttsRepository {
    async fn find_by_id(&self, id: OttsId) -> AppResult<Option<Otts>> {
        let sql = format!("SELECT {} FROM otts WHERE id = $1", OTTS_COLUMNS);
        let row = self
            .executor
            .fetch_optional(sqlx::query_as::<_, OttsRow>(&sql).bind(id.0))
            .await?;
        Ok(row.map(otts_from_row))
    }

    /// 启用的证书优先
    async fn find_by_modification(&self, modification: &str) -> AppResult<Option<Otts>> {
        let sql = format!(
            "SELECT {} FROM otts WHERE modification = $1 ORDER BY is_active DESC, id LIMIT 1",
            OTTS_COLUMNS
        );
        let row = self
            .executor
            .fetch_optional(sqlx::query_as::<_, OttsRow>(&sql).bind(modification))
            .await?;
        Ok(row.map(otts_from_row))
    }

    async fn save(&self, otts: &Otts) -> AppResult<()> {
        self.executor
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO otts (id, number, date, modification, name, axle_count, full_mass_kg, is_active)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(otts.id().0)
                .bind(otts.number())
                .bind(otts.date())
                .bind(otts.modification())
                .bind(otts.name())
                .bind(otts.axle_count())
                .bind(otts.full_mass_kg())
                .bind(otts.is_active()),
            )
            .await?;
        Ok(())
    }

    async fn update(&self, otts: &Otts) -> AppResult<()> {
        let result = self
            .executor
            .execute(
                sqlx::query(
                    r#"
                    UPDATE otts SET
                        number = $2, date = $3, modification = $4, name = $5,
                        axle_count = $6, full_mass_kg = $7, is_active = $8
                    WHERE id = $1
                    "#,
                )
                .bind(otts.id().0)
                .bind(otts.number())
                .bind(otts.date())
                .bind(otts.modification())
                .bind(otts.name())
                .bind(otts.axle_count())
                .bind(otts.full_mass_kg())
                .bind(otts.is_active()),
            )
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("ОТТС не найден"));
        }
        Ok(())
    }

    async fn delete(&self, id: OttsId) -> AppResult<()> {
        self.executor
            .execute(sqlx::query("DELETE FROM otts WHERE id = $1").bind(id.0))
            .await?;
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Otts>> {
        let sql = format!("SELECT {} FROM otts ORDER BY modification, axle_count", OTTS_COLUMNS);
        let rows = self.executor.fetch_all(sqlx::query_as::<_, OttsRow>(&sql)).await?;
        Ok(rows.into_iter().map(otts_from_row).collect())
    }
}
