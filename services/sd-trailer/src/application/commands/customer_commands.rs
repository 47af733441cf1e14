//! 客户命令

use dealer_errors::{AppError, AppResult};

use crate::domain::entities::CustomerSpec;
use crate::domain::value_objects::{CallerIdentity, CustomerId, Email};

#[derive(Debug, Clone)]
pub struct CreateCustomerCommand {
    pub caller: CallerIdentity,
    pub spec: CustomerSpec,
}

impl CreateCustomerCommand {
    pub fn validate(&self) -> AppResult<()> {
        validate_email(self.spec.email.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct UpdateCustomerCommand {
    pub customer_id: CustomerId,
    pub caller: CallerIdentity,
    pub spec: CustomerSpec,
}

impl UpdateCustomerCommand {
    pub fn validate(&self) -> AppResult<()> {
        validate_email(self.spec.email.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct DeleteCustomerCommand {
    pub customer_id: CustomerId,
    pub caller: CallerIdentity,
}

/// 空邮箱视为未填写
fn validate_email(email: Option<&str>) -> AppResult<()> {
    match email.map(str::trim) {
        Some(email) if !email.is_empty() => Email::new(email)
            .map(|_| ())
            .map_err(|e| AppError::validation(e.to_string())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_email_is_allowed() {
        assert!(validate_email(None).is_ok());
        assert!(validate_email(Some("   ")).is_ok());
    }

    #[test]
    fn test_malformed_email_is_validation_error() {
        let err = validate_email(Some("a@")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
