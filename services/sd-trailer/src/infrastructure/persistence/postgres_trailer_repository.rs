//! 挂车仓储 PostgreSQL 实现

use async_trait::async_trait;
use dealer_adapter_postgres::{PgExecutor, SharedTransaction};
use dealer_errors::{AppError, AppResult};
use sqlx::PgPool;

use crate::domain::entities::{Trailer, TrailerFilter, TrailerSummary};
use crate::domain::enums::TrailerStatus;
use crate::domain::repositories::{stale_trailer_status, TrailerRepository};
use crate::domain::value_objects::{ItemId, TrailerId, Vin};

use super::converters::{trailer_from_row, trailer_summary_from_row};
use super::rows::{TrailerRow, TrailerSummaryRow};

const TRAILER_COLUMNS: &str = r#"
    id, vin, item_id, warehouse_id, manufacture_date, status, comment, otts_id,
    created_at, created_by, updated_at, updated_by
"#;

pub struct PostgresTrailerRepository {
    executor: PgExecutor,
}

impl PostgresTrailerRepository {
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
impl TrailerRepository for PostgresTrailerRepository {
    async fn find_by_id(&self, id: TrailerId) -> AppResult<Option<Trailer>> {
        let sql = format!("SELECT {} FROM trailers WHERE id = $1", TRAILER_COLUMNS);
        self.executor
            .fetch_optional(sqlx::query_as::<_, TrailerRow>(&sql).bind(id.0))
            .await?
            .map(trailer_from_row)
            .transpose()
    }

    async fn find_by_vin(&self, vin: &Vin) -> AppResult<Option<Trailer>> {
        let sql = format!("SELECT {} FROM trailers WHERE vin = $1", TRAILER_COLUMNS);
        self.executor
            .fetch_optional(sqlx::query_as::<_, TrailerRow>(&sql).bind(vin.as_str()))
            .await?
            .map(trailer_from_row)
            .transpose()
    }

    async fn save(&self, trailer: &Trailer) -> AppResult<()> {
        let audit = trailer.audit_info();
        self.executor
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO trailers (
                        id, vin, item_id, warehouse_id, manufacture_date, status, comment, otts_id,
                        created_at, created_by, updated_at, updated_by
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                    "#,
                )
                .bind(trailer.id().0)
                .bind(trailer.vin().as_str())
                .bind(trailer.item_id().0)
                .bind(trailer.warehouse_id().0)
                .bind(trailer.manufacture_date())
                .bind(trailer.status().as_str())
                .bind(trailer.comment())
                .bind(trailer.otts_id().map(|o| o.0))
                .bind(audit.created_at)
                .bind(audit.created_by.map(|u| u.0))
                .bind(audit.updated_at)
                .bind(audit.updated_by.map(|u| u.0)),
            )
            .await?;
        Ok(())
    }

    async fn update(&self, trailer: &Trailer) -> AppResult<()> {
        let audit = trailer.audit_info();
        let result = self
            .executor
            .execute(
                sqlx::query(
                    r#"
                    UPDATE trailers SET
                        vin = $2, item_id = $3, warehouse_id = $4, manufacture_date = $5,
                        comment = $6, otts_id = $7,
                        updated_at = $8, updated_by = $9
                    WHERE id = $1
                    "#,
                )
                .bind(trailer.id().0)
                .bind(trailer.vin().as_str())
                .bind(trailer.item_id().0)
                .bind(trailer.warehouse_id().0)
                .bind(trailer.manufacture_date())
                .bind(trailer.comment())
                .bind(trailer.otts_id().map(|o| o.0))
                .bind(audit.updated_at)
                .bind(audit.updated_by.map(|u| u.0)),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Прицеп не найден"));
        }
        Ok(())
    }

    async fn update_status(&self, trailer: &Trailer, expected: TrailerStatus) -> AppResult<()> {
        let audit = trailer.audit_info();
        let result = self
            .executor
            .execute(
                sqlx::query(
                    r#"
                    UPDATE trailers SET status = $2, updated_at = $3, updated_by = $4
                    WHERE id = $1 AND status = $5
                    "#,
                )
                .bind(trailer.id().0)
                .bind(trailer.status().as_str())
                .bind(audit.updated_at)
                .bind(audit.updated_by.map(|u| u.0))
                .bind(expected.as_str()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return match self.find_by_id(trailer.id()).await? {
                Some(_) => Err(stale_trailer_status()),
                None => Err(AppError::not_found("Прицеп не найден")),
            };
        }
        Ok(())
    }

    async fn delete(&self, id: TrailerId) -> AppResult<()> {
        self.executor
            .execute(sqlx::query("DELETE FROM trailers WHERE id = $1").bind(id.0))
            .await?;
        Ok(())
    }

    async fn list(&self, filter: &TrailerFilter) -> AppResult<Vec<TrailerSummary>> {
        let rows = self
            .executor
            .fetch_all(
                sqlx::query_as::<_, TrailerSummaryRow>(
                    r#"
                    SELECT t.id, t.vin, t.item_id, t.warehouse_id, t.manufacture_date, t.status,
                           t.comment, t.otts_id, t.created_at, t.created_by, t.updated_at, t.updated_by,
                           i.article, i.name AS item_name, w.name AS warehouse_name
                    FROM trailers t
                    JOIN items i ON i.id = t.item_id
                    JOIN warehouses w ON w.id = t.warehouse_id
                    WHERE ($1::text IS NULL OR t.vin ILIKE '%' || $1 || '%')
                      AND ($2::text IS NULL OR i.article ILIKE '%' || $2 || '%')
                      AND ($3::text IS NULL OR t.status = $3)
                      AND ($4::uuid IS NULL OR t.warehouse_id = $4)
                      AND ($5::text IS NULL OR t.status <> $5)
                    ORDER BY t.created_at DESC, t.id DESC
                    "#,
                )
                .bind(filter.vin.as_deref())
                .bind(filter.article.as_deref())
                .bind(filter.status.map(|s| s.as_str()))
                .bind(filter.warehouse_id.map(|w| w.0))
                .bind(filter.exclude_status.map(|s| s.as_str())),
            )
            .await?;

        rows.into_iter().map(trailer_summary_from_row).collect()
    }

    async fn count_by_item(&self, item_id: ItemId) -> AppResult<i64> {
        self.executor
            .fetch_scalar(
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM trailers WHERE item_id = $1")
                    .bind(item_id.0),
            )
            .await
    }
}
