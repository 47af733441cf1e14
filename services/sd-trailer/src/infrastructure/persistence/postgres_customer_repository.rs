//! 客户仓储 PostgreSQL 实现

use async_trait::async_trait;
use dealer_adapter_postgres::{PgExecutor, SharedTransaction};
use dealer_errors::{AppError, AppResult};
use sqlx::PgPool;

use crate::domain::entities::Customer;
use crate::domain::repositories::CustomerRepository;
use crate::domain::value_objects::CustomerId;

use super::converters::{customer_document_columns, customer_from_row};
use super::rows::CustomerRow;

const CUSTOMER_COLUMNS: &str = r#"
    id, customer_type, name, iin_bin, phone, email, address, contact_person,
    doc_type, doc_number, doc_issue_date, doc_issuer, is_active,
    created_at, created_by, updated_at, updated_by
"#;

pub struct PostgresCustomerRepository {
    executor: PgExecutor,
}

impl PostgresCustomerRepository {
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
impl CustomerRepository for PostgresCustomerRepository {
    async fn find_by_id(&self, id: CustomerId) -> AppResult<Option<Customer>> {
        let sql = format!("SELECT {} FROM customers WHERE id = $1", CUSTOMER_COLUMNS);
        self.executor
            .fetch_optional(sqlx::query_as::<_, CustomerRow>(&sql).bind(id.0))
            .await?
            .map(customer_from_row)
            .transpose()
    }

    async fn find_by_identity_key(&self, key: &str) -> AppResult<Option<Customer>> {
        let sql = format!("SELECT {} FROM customers WHERE identity_key = $1", CUSTOMER_COLUMNS);
        self.executor
            .fetch_optional(sqlx::query_as::<_, CustomerRow>(&sql).bind(key))
            .await?
            .map(customer_from_row)
            .transpose()
    }

    async fn save(&self, customer: &Customer) -> AppResult<()> {
        let audit = customer.audit_info();
        let (doc_type, doc_number, doc_issue_date, doc_issuer) = customer_document_columns(customer);
        self.executor
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO customers (
                        id, customer_type, name, iin_bin, phone, email, address, contact_person,
                        doc_type, doc_number, doc_issue_date, doc_issuer, identity_key, is_active,
                        created_at, created_by, updated_at, updated_by
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
                    "#,
                )
                .bind(customer.id().0)
                .bind(customer.customer_type().as_str())
                .bind(customer.name())
                .bind(customer.iin_bin())
                .bind(customer.phone())
                .bind(customer.email())
                .bind(customer.address())
                .bind(customer.contact_person())
                .bind(doc_type)
                .bind(doc_number)
                .bind(doc_issue_date)
                .bind(doc_issuer)
                .bind(customer.identity_key().as_storage_key())
                .bind(customer.is_active())
                .bind(audit.created_at)
                .bind(audit.created_by.map(|u| u.0))
                .bind(audit.updated_at)
                .bind(audit.updated_by.map(|u| u.0)),
            )
            .await?;
        Ok(())
    }

    async fn update(&self, customer: &Customer) -> AppResult<()> {
        let audit = customer.audit_info();
        let (doc_type, doc_number, doc_issue_date, doc_issuer) = customer_document_columns(customer);
        let result = self
            .executor
            .execute(
                sqlx::query(
                    r#"
                    UPDATE customers SET
                        customer_type = $2, name = $3, iin_bin = $4, phone = $5, email = $6,
                        address = $7, contact_person = $8, doc_type = $9, doc_number = $10,
                        doc_issue_date = $11, doc_issuer = $12, identity_key = $13, is_active = $14,
                        updated_at = $15, updated_by = $16
                    WHERE id = $1
                    "#,
                )
                .bind(customer.id().0)
                .bind(customer.customer_type().as_str())
                .bind(customer.name())
                .bind(customer.iin_bin())
                .bind(customer.phone())
                .bind(customer.email())
                .bind(customer.address())
                .bind(customer.contact_person())
                .bind(doc_type)
                .bind(doc_number)
                .bind(doc_issue_date)
                .bind(doc_issuer)
                .bind(customer.identity_key().as_storage_key())
                .bind(customer.is_active())
                .bind(audit.updated_at)
                .bind(audit.updated_by.map(|u| u.0)),
            )
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Клиент не найден"));
        }
        Ok(())
    }

    async fn delete(&self, id: CustomerId) -> AppResult<()> {
        self.executor
            .execute(sqlx::query("DELETE FROM customers WHERE id = $1").bind(id.0))
            .await?;
        Ok(())
    }

    async fn search(&self, term: Option<&str>) -> AppResult<Vec<Customer>> {
        let sql = format!(
            r#"
            SELECT {} FROM customers
            WHERE $1::text IS NULL
               OR name ILIKE '%' || $1 || '%'
               OR contact_person ILIKE '%' || $1 || '%'
               OR iin_bin ILIKE '%' || $1 || '%'
               OR phone ILIKE '%' || $1 || '%'
            ORDER BY customer_type, name
            "#,
            CUSTOMER_COLUMNS
        );
        let rows = self
            .executor
            .fetch_all(sqlx::query_as::<_, CustomerRow>(&sql).bind(term))
            .await?;
        rows.into_iter().map(customer_from_row).collect()
    }
}
