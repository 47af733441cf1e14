//! 客户类型与证件类型

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::UnknownVariant;

/// 客户类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerType {
    /// 自然人
    Person,
    /// 法人
    Company,
}

impl CustomerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Person => "PERSON",
            CustomerType::Company => "COMPANY",
        }
    }
}

impl FromStr for CustomerType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PERSON" => Ok(CustomerType::Person),
            "COMPANY" => Ok(CustomerType::Company),
            other => Err(UnknownVariant::new("客户类型", other)),
        }
    }
}

/// 自然人证件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// 身份证
    Id,
    /// 居留证
    Resident,
    /// 外国护照
    ForeignPassport,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Id => "ID",
            DocumentType::Resident => "RESIDENT",
            DocumentType::ForeignPassport => "FOREIGN_PASSPORT",
        }
    }

    /// 合同中使用的证件名称
    pub fn title_ru(&self) -> &'static str {
        match self {
            DocumentType::Id => "Удостоверение личности",
            DocumentType::Resident => "Вид на жительство",
            DocumentType::ForeignPassport => "Паспорт иностранного гражданина",
        }
    }
}

impl FromStr for DocumentType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ID" => Ok(DocumentType::Id),
            "RESIDENT" => Ok(DocumentType::Resident),
            "FOREIGN_PASSPORT" => Ok(DocumentType::ForeignPassport),
            other => Err(UnknownVariant::new("证件类型", other)),
        }
    }
}
