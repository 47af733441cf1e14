//! 领域枚举

mod customer_type;
mod item_type;
mod trailer_status;

pub use customer_type::{CustomerType, DocumentType};
pub use item_type::ItemType;
pub use trailer_status::TrailerStatus;

use thiserror::Error;

/// 无法识别的枚举取值
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("未知的{kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
