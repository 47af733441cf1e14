//! 物料仓储 PostgreSQL 实现

use async_trait::async_trait;
use dealer_adapter_postgres::{PgExecutor, SharedTransaction};
use dealer_errors::{AppError, AppResult};
use sqlx::PgPool;

use crate::domain::entities::Item;
use crate::domain::enums::ItemType;
use crate::domain::repositories::ItemRepository;
use crate::domain::value_objects::{FeatureQuery, ItemId, MatchCriteria, TentSelector};

use super::converters::item_from_row;
use super::rows::ItemRow;

const ITEM_COLUMNS: &str = r#"
    id, item_type, article, name, body_length_mm, body_width_mm, board_height_mm,
    axle_count, wheel_radius, has_tent, tent_height_mm, has_jockey_wheel, hub_type,
    size_external, size_body, unit, base_price, is_active,
    created_at, created_by, updated_at, updated_by
"#;

pub struct PostgresItemRepository {
    executor: PgExecutor,
}

impl PostgresItemRepository {
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

    async fn fetch_one_item(&self, sql: &str, id: ItemId) -> AppResult<Option<Item>> {
        self.executor
            .fetch_optional(sqlx::query_as::<_, ItemRow>(sql).bind(id.0))
            .await?
            .map(item_from_row)
            .transpose()
    }
}

fn collect(rows: Vec<ItemRow>) -> AppResult<Vec<Item>> {
    rows.into_iter().map(item_from_row).collect()
}

#[async_trait]
impl ItemRepository for PostgresItemRepository {
    async fn find_by_id(&self, id: ItemId) -> AppResult<Option<Item>> {
        let sql = format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS);
        self.fetch_one_item(&sql, id).await
    }

    async fn find_by_article(&self, article: &str, item_type: ItemType) -> AppResult<Option<Item>> {
        let sql = format!(
            "SELECT {} FROM items WHERE article = $1 AND item_type = $2",
            ITEM_COLUMNS
        );
        self.executor
            .fetch_optional(
                sqlx::query_as::<_, ItemRow>(&sql)
                    .bind(article)
                    .bind(item_type.as_str()),
            )
            .await?
            .map(item_from_row)
            .transpose()
    }

    async fn save(&self, item: &Item) -> AppResult<()> {
        let audit = item.audit_info();
        self.executor
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO items (
                        id, item_type, article, name, body_length_mm, body_width_mm, board_height_mm,
                        axle_count, wheel_radius, has_tent, tent_height_mm, has_jockey_wheel, hub_type,
                        size_external, size_body, unit, base_price, is_active,
                        created_at, created_by, updated_at, updated_by
                    ) VALUES (
                        $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                        $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22
                    )
                    "#,
                )
                .bind(item.id().0)
                .bind(item.item_type().as_str())
                .bind(item.article())
                .bind(item.name())
                .bind(item.body_length_mm())
                .bind(item.body_width_mm())
                .bind(item.board_height_mm())
                .bind(item.axle_count())
                .bind(item.wheel_radius())
                .bind(item.has_tent())
                .bind(item.tent_height_mm())
                .bind(item.has_jockey_wheel())
                .bind(item.hub_type())
                .bind(item.size_external())
                .bind(item.size_body())
                .bind(item.unit())
                .bind(item.base_price())
                .bind(item.is_active())
                .bind(audit.created_at)
                .bind(audit.created_by.map(|u| u.0))
                .bind(audit.updated_at)
                .bind(audit.updated_by.map(|u| u.0)),
            )
            .await?;
        Ok(())
    }

    async fn update(&self, item: &Item) -> AppResult<()> {
        let audit = item.audit_info();
        let result = self
            .executor
            .execute(
                sqlx::query(
                    r#"
                    UPDATE items SET
                        item_type = $2, article = $3, name = $4,
                        body_length_mm = $5, body_width_mm = $6, board_height_mm = $7,
                        axle_count = $8, wheel_radius = $9, has_tent = $10, tent_height_mm = $11,
                        has_jockey_wheel = $12, hub_type = $13, size_external = $14, size_body = $15,
                        unit = $16, base_price = $17, is_active = $18,
                        updated_at = $19, updated_by = $20
                    WHERE id = $1
                    "#,
                )
                .bind(item.id().0)
                .bind(item.item_type().as_str())
                .bind(item.article())
                .bind(item.name())
                .bind(item.body_length_mm())
                .bind(item.body_width_mm())
                .bind(item.board_height_mm())
                .bind(item.axle_count())
                .bind(item.wheel_radius())
                .bind(item.has_tent())
                .bind(item.tent_height_mm())
                .bind(item.has_jockey_wheel())
                .bind(item.hub_type())
                .bind(item.size_external())
                .bind(item.size_body())
                .bind(item.unit())
                .bind(item.base_price())
                .bind(item.is_active())
                .bind(audit.updated_at)
                .bind(audit.updated_by.map(|u| u.0)),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Номенклатура не найдена"));
        }
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> AppResult<()> {
        self.executor
            .execute(sqlx::query("DELETE FROM items WHERE id = $1").bind(id.0))
            .await?;
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Item>> {
        let sql = format!(
            "SELECT {} FROM items ORDER BY item_type, article, name",
            ITEM_COLUMNS
        );
        collect(self.executor.fetch_all(sqlx::query_as::<_, ItemRow>(&sql)).await?)
    }

    async fn list_active_trailers(&self) -> AppResult<Vec<Item>> {
        let sql = format!(
            "SELECT {} FROM items WHERE item_type = 'TRAILER' AND is_active ORDER BY article, name",
            ITEM_COLUMNS
        );
        collect(self.executor.fetch_all(sqlx::query_as::<_, ItemRow>(&sql)).await?)
    }

    /// 篷布条件：0 表示无篷布或高度为空，正数要求 has_tent 且高度相等
    async fn find_first_matching(&self, criteria: &MatchCriteria) -> AppResult<Option<Item>> {
        let sql = format!(
            r#"
            SELECT {} FROM items
            WHERE item_type = 'TRAILER' AND is_active
              AND ($1::text IS NULL OR size_body = $1)
              AND ($2::int IS NULL OR axle_count = $2)
              AND ($3::text IS NULL OR wheel_radius = $3)
              AND ($4::int IS NULL OR board_height_mm = $4)
              AND has_jockey_wheel = $5
              AND ($6::int IS NULL
                   OR ($6 = 0 AND (has_tent = FALSE OR tent_height_mm IS NULL))
                   OR ($6 > 0 AND has_tent = TRUE AND tent_height_mm = $6))
            ORDER BY created_at, id
            LIMIT 1
            "#,
            ITEM_COLUMNS
        );
        self.executor
            .fetch_optional(
                sqlx::query_as::<_, ItemRow>(&sql)
                    .bind(criteria.size_body.as_deref())
                    .bind(criteria.axle_count)
                    .bind(criteria.wheel_radius.as_deref())
                    .bind(criteria.board_height_mm)
                    .bind(criteria.jockey_wheel)
                    .bind(criteria.tent.as_ref().map(TentSelector::height_mm)),
            )
            .await?
            .map(item_from_row)
            .transpose()
    }

    async fn find_first_by_features(&self, query: &FeatureQuery) -> AppResult<Option<Item>> {
        let sql = format!(
            r#"
            SELECT {} FROM items
            WHERE item_type = 'TRAILER' AND is_active
              AND ($1::int IS NULL OR axle_count = $1)
              AND ($2::int IS NULL OR board_height_mm = $2)
              AND ($3::text IS NULL OR wheel_radius = $3)
              AND ($4::bool IS NULL OR has_tent = $4)
              AND ($5::int IS NULL OR tent_height_mm = $5)
              AND ($6::bool IS NULL OR has_jockey_wheel = $6)
            ORDER BY created_at, id
            LIMIT 1
            "#,
            ITEM_COLUMNS
        );
        self.executor
            .fetch_optional(
                sqlx::query_as::<_, ItemRow>(&sql)
                    .bind(query.axle_count)
                    .bind(query.board_height_mm)
                    .bind(query.wheel_radius.as_deref())
                    .bind(query.has_tent)
                    .bind(query.tent_height_mm)
                    .bind(query.has_jockey_wheel),
            )
            .await?
            .map(item_from_row)
            .transpose()
    }
}
