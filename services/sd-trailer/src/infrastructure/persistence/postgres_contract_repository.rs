//! 合同仓储 PostgreSQL 实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dealer_adapter_postgres::{PgExecutor, SharedTransaction};
use dealer_errors::{AppError, AppResult};
use sqlx::PgPool;

use crate::domain::entities::{ContractFilter, SalesContract, SigningRecord, SigningState};
use crate::domain::repositories::{stale_signing, ContractRepository};
use crate::domain::value_objects::{ContractId, CustomerId, TrailerId};

use super::converters::contract_from_row;
use super::rows::ContractRow;

const CONTRACT_COLUMNS: &str = r#"
    c.id, c.contract_number, c.contract_date, c.customer_id, c.trailer_id, c.price,
    c.payment_method, c.source, c.is_paid, c.is_shipped,
    c.sigex_state, c.sigex_document_id, c.sigex_operation_id, c.sigex_sign_id,
    c.sigex_expire_at, c.sigex_last_status, c.sigex_last_sign_id,
    c.created_at, c.created_by, c.updated_at, c.updated_by
"#;

pub struct PostgresContractRepository {
    executor: PgExecutor,
}

impl PostgresContractRepository {
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
impl ContractRepository for PostgresContractRepository {
    async fn find_by_id(&self, id: ContractId) -> AppResult<Option<SalesContract>> {
        let sql = format!("SELECT {} FROM sales_contracts c WHERE c.id = $1", CONTRACT_COLUMNS);
        self.executor
            .fetch_optional(sqlx::query_as::<_, ContractRow>(&sql).bind(id.0))
            .await?
            .map(contract_from_row)
            .transpose()
    }

    async fn count_by_trailer(&self, trailer_id: TrailerId, exclude: Option<ContractId>) -> AppResult<i64> {
        self.executor
            .fetch_scalar(
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM sales_contracts WHERE trailer_id = $1 AND ($2::uuid IS NULL OR id <> $2)",
                )
                .bind(trailer_id.0)
                .bind(exclude.map(|c| c.0)),
            )
            .await
    }

    async fn count_by_customer(&self, customer_id: CustomerId) -> AppResult<i64> {
        self.executor
            .fetch_scalar(
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sales_contracts WHERE customer_id = $1")
                    .bind(customer_id.0),
            )
            .await
    }

    async fn number_exists(&self, number: &str, exclude: Option<ContractId>) -> AppResult<bool> {
        self.executor
            .fetch_scalar(
                sqlx::query_scalar::<_, bool>(
                    r#"
                    SELECT EXISTS (
                        SELECT 1 FROM sales_contracts
                        WHERE contract_number = $1 AND ($2::uuid IS NULL OR id <> $2)
                    )
                    "#,
                )
                .bind(number)
                .bind(exclude.map(|c| c.0)),
            )
            .await
    }

    async fn contract_numbers(&self) -> AppResult<Vec<String>> {
        let rows = self
            .executor
            .fetch_all(sqlx::query_as::<_, (String,)>(
                "SELECT contract_number FROM sales_contracts WHERE contract_number IS NOT NULL AND btrim(contract_number) <> ''",
            ))
            .await?;
        Ok(rows.into_iter().map(|(number,)| number).collect())
    }

    async fn save(&self, contract: &SalesContract) -> AppResult<()> {
        let audit = contract.audit_info();
        let signing = contract.signing();
        self.executor
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO sales_contracts (
                        id, contract_number, contract_date, customer_id, trailer_id, price,
                        payment_method, source, is_paid, is_shipped,
                        sigex_state, sigex_document_id, sigex_operation_id, sigex_sign_id,
                        sigex_expire_at, sigex_last_status, sigex_last_sign_id,
                        created_at, created_by, updated_at, updated_by
                    ) VALUES (
                        $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                        $12, $13, $14, $15, $16, $17, $18, $19, $20, $21
                    )
                    "#,
                )
                .bind(contract.id().0)
                .bind(contract.contract_number())
                .bind(contract.contract_date())
                .bind(contract.customer_id().map(|c| c.0))
                .bind(contract.trailer_id().0)
                .bind(contract.price())
                .bind(contract.payment_method())
                .bind(contract.source())
                .bind(contract.is_paid())
                .bind(contract.is_shipped())
                .bind(signing.state().tag())
                .bind(signing.document_id())
                .bind(signing.operation_id())
                .bind(signing.state().sign_id())
                .bind(signing.expire_at())
                .bind(signing.last_status())
                .bind(signing.last_sign_id())
                .bind(audit.created_at)
                .bind(audit.created_by.map(|u| u.0))
                .bind(audit.updated_at)
                .bind(audit.updated_by.map(|u| u.0)),
            )
            .await?;
        Ok(())
    }

    /// 只更新业务字段，签名字段由 attach_document / update_signing 维护
    async fn update(&self, contract: &SalesContract) -> AppResult<()> {
        let audit = contract.audit_info();
        let result = self
            .executor
            .execute(
                sqlx::query(
                    r#"
                    UPDATE sales_contracts SET
                        contract_number = $2, contract_date = $3, customer_id = $4, trailer_id = $5,
                        price = $6, payment_method = $7, is_paid = $8, is_shipped = $9,
                        updated_at = $10, updated_by = $11
                    WHERE id = $1
                    "#,
                )
                .bind(contract.id().0)
                .bind(contract.contract_number())
                .bind(contract.contract_date())
                .bind(contract.customer_id().map(|c| c.0))
                .bind(contract.trailer_id().0)
                .bind(contract.price())
                .bind(contract.payment_method())
                .bind(contract.is_paid())
                .bind(contract.is_shipped())
                .bind(audit.updated_at)
                .bind(audit.updated_by.map(|u| u.0)),
            )
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Договор не найден"));
        }
        Ok(())
    }

    async fn delete(&self, id: ContractId) -> AppResult<()> {
        self.executor
            .execute(sqlx::query("DELETE FROM sales_contracts WHERE id = $1").bind(id.0))
            .await?;
        Ok(())
    }

    async fn list(&self, filter: &ContractFilter) -> AppResult<Vec<SalesContract>> {
        let sql = format!(
            r#"
            SELECT {} FROM sales_contracts c
            JOIN trailers t ON t.id = c.trailer_id
            WHERE ($1::uuid IS NULL OR t.warehouse_id = $1)
              AND ($2::bool IS NULL OR c.is_paid = $2)
              AND ($3::bool IS NULL OR c.is_shipped = $3)
            ORDER BY c.contract_date DESC NULLS LAST, c.created_at DESC, c.id DESC
            "#,
            CONTRACT_COLUMNS
        );
        let rows = self
            .executor
            .fetch_all(
                sqlx::query_as::<_, ContractRow>(&sql)
                    .bind(filter.warehouse_id.map(|w| w.0))
                    .bind(filter.is_paid)
                    .bind(filter.is_shipped),
            )
            .await?;
        rows.into_iter().map(contract_from_row).collect()
    }

    /// 仅在尚无文档 ID 时写入
    async fn attach_document(
        &self,
        id: ContractId,
        document_id: &str,
        expire_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = self
            .executor
            .execute(
                sqlx::query(
                    r#"
                    UPDATE sales_contracts SET
                        sigex_state = $2, sigex_document_id = $3, sigex_expire_at = $4,
                        sigex_operation_id = NULL, sigex_sign_id = NULL, updated_at = NOW()
                    WHERE id = $1 AND sigex_document_id IS NULL
                    "#,
                )
                .bind(id.0)
                .bind(SigningState::REGISTERED)
                .bind(document_id)
                .bind(expire_at),
            )
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// 远程状态整体覆盖，不做合并；以读取时的操作 ID 作为条件
    async fn update_signing(
        &self,
        id: ContractId,
        expected_operation: Option<&str>,
        signing: &SigningRecord,
    ) -> AppResult<()> {
        let result = self
            .executor
            .execute(
                sqlx::query(
                    r#"
                    UPDATE sales_contracts SET
                        sigex_state = $2, sigex_document_id = $3, sigex_operation_id = $4,
                        sigex_sign_id = $5, sigex_expire_at = $6, sigex_last_status = $7,
                        sigex_last_sign_id = $8, updated_at = NOW()
                    WHERE id = $1 AND sigex_operation_id IS NOT DISTINCT FROM $9
                    "#,
                )
                .bind(id.0)
                .bind(signing.state().tag())
                .bind(signing.document_id())
                .bind(signing.operation_id())
                .bind(signing.state().sign_id())
                .bind(signing.expire_at())
                .bind(signing.last_status())
                .bind(signing.last_sign_id())
                .bind(expected_operation),
            )
            .await?;
        if result.rows_affected() == 0 {
            return match self.find_by_id(id).await? {
                Some(_) => Err(stale_signing()),
                None => Err(AppError::not_found("Договор не найден")),
            };
        }
        Ok(())
    }
}
