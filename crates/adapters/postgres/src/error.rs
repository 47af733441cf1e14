//! 数据库错误映射工具
//!
//! 提供统一的 SQLx 错误到 AppError 的转换。
//! 唯一约束冲突映射为 `Conflict`，消息中带约束名，供上层识别具体冲突。

use dealer_errors::AppError;

/// 唯一约束冲突
pub const UNIQUE_VIOLATION: &str = "23505";
/// 外键约束冲突
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// 将 SQLx 错误转换为 AppError，区分不同错误类型
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    AppError::conflict(format!("unique constraint {} violated", constraint))
                }
                Some(FOREIGN_KEY_VIOLATION) => AppError::conflict(format!(
                    "record is still referenced ({})",
                    constraint
                )),
                Some("23514") => {
                    AppError::validation(format!("check constraint {} violated", constraint))
                }
                Some("23502") => AppError::validation("Not null constraint violation"),
                Some("22001") => AppError::validation("String data too long"),
                Some(code) => AppError::database(format!("Database error ({}): {}", code, db_err)),
                None => AppError::database(db_err.to_string()),
            }
        }
        sqlx::Error::PoolTimedOut => AppError::internal("Database connection pool timeout"),
        sqlx::Error::PoolClosed => AppError::internal("Database connection pool is closed"),
        _ => AppError::database(e.to_string()),
    }
}

/// 是否为指定约束的唯一冲突
pub fn is_unique_violation_of(err: &AppError, constraint: &str) -> bool {
    matches!(err, AppError::Conflict(msg) if msg.contains(constraint))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_pool_timeout() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_constraint_detection() {
        let err = AppError::conflict("unique constraint uq_sales_contract_trailer violated");
        assert!(is_unique_violation_of(&err, "uq_sales_contract_trailer"));
        assert!(!is_unique_violation_of(&err, "uq_sales_contract_number"));
        assert!(!is_unique_violation_of(
            &AppError::validation("uq_sales_contract_trailer"),
            "uq_sales_contract_trailer"
        ));
    }
}
