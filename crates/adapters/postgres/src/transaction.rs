//! PostgreSQL 事务管理模块
//!
//! 同一份 Repository 实现既可以直接走连接池，也可以绑定到 Unit of Work 的共享事务。

use std::sync::Arc;

use dealer_errors::{AppError, AppResult};
use sqlx::postgres::{PgArguments, PgQueryResult, PgRow};
use sqlx::query::{Query, QueryAs, QueryScalar};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::map_sqlx_error;

/// 共享事务类型
pub type SharedTransaction = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

/// 查询执行目标
#[derive(Clone)]
pub enum PgExecutor {
    Pool(PgPool),
    Transaction(SharedTransaction),
}

impl PgExecutor {
    pub async fn execute(&self, query: Query<'_, Postgres, PgArguments>) -> AppResult<PgQueryResult> {
        match self {
            Self::Pool(pool) => query.execute(pool).await.map_err(map_sqlx_error),
            Self::Transaction(shared) => {
                let mut guard = shared.lock().await;
                let tx = guard.as_mut().ok_or_else(consumed)?;
                query.execute(&mut **tx).await.map_err(map_sqlx_error)
            }
        }
    }

    pub async fn fetch_optional<O>(
        &self,
        query: QueryAs<'_, Postgres, O, PgArguments>,
    ) -> AppResult<Option<O>>
    where
        O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        match self {
            Self::Pool(pool) => query.fetch_optional(pool).await.map_err(map_sqlx_error),
            Self::Transaction(shared) => {
                let mut guard = shared.lock().await;
                let tx = guard.as_mut().ok_or_else(consumed)?;
                query.fetch_optional(&mut **tx).await.map_err(map_sqlx_error)
            }
        }
    }

    pub async fn fetch_all<O>(&self, query: QueryAs<'_, Postgres, O, PgArguments>) -> AppResult<Vec<O>>
    where
        O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        match self {
            Self::Pool(pool) => query.fetch_all(pool).await.map_err(map_sqlx_error),
            Self::Transaction(shared) => {
                let mut guard = shared.lock().await;
                let tx = guard.as_mut().ok_or_else(consumed)?;
                query.fetch_all(&mut **tx).await.map_err(map_sqlx_error)
            }
        }
    }

    pub async fn fetch_scalar<O>(&self, query: QueryScalar<'_, Postgres, O, PgArguments>) -> AppResult<O>
    where
        O: Send + Unpin,
        (O,): for<'r> FromRow<'r, PgRow>,
    {
        match self {
            Self::Pool(pool) => query.fetch_one(pool).await.map_err(map_sqlx_error),
            Self::Transaction(shared) => {
                let mut guard = shared.lock().await;
                let tx = guard.as_mut().ok_or_else(consumed)?;
                query.fetch_one(&mut **tx).await.map_err(map_sqlx_error)
            }
        }
    }
}

fn consumed() -> AppError {
    AppError::internal("Transaction already consumed")
}

/// 开启一个可共享的事务
pub async fn begin_shared(pool: &PgPool) -> AppResult<SharedTransaction> {
    let tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;
    debug!("Transaction started");
    Ok(Arc::new(Mutex::new(Some(tx))))
}

/// 提交共享事务
///
/// 提交阶段的约束冲突同样经过 `map_sqlx_error`，以 `Conflict` 返回
pub async fn commit_shared(shared: &SharedTransaction) -> AppResult<()> {
    let tx = shared.lock().await.take().ok_or_else(consumed)?;
    tx.commit().await.map_err(map_sqlx_error)?;
    debug!("Transaction committed");
    Ok(())
}

/// 回滚共享事务
pub async fn rollback_shared(shared: &SharedTransaction) -> AppResult<()> {
    let tx = shared.lock().await.take().ok_or_else(consumed)?;
    tx.rollback()
        .await
        .map_err(|e| AppError::database(format!("Failed to rollback transaction: {}", e)))?;
    debug!("Transaction rolled back");
    Ok(())
}
