//! 物料类型

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::UnknownVariant;

/// 物料类型：挂车型号或配件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    /// 挂车（必须有 article）
    Trailer,
    /// 配件（篷布、侧板、锁等）
    Component,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Trailer => "TRAILER",
            ItemType::Component => "COMPONENT",
        }
    }

    pub fn requires_article(&self) -> bool {
        matches!(self, ItemType::Trailer)
    }
}

impl FromStr for ItemType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRAILER" => Ok(ItemType::Trailer),
            "COMPONENT" => Ok(ItemType::Component),
            other => Err(UnknownVariant::new("物料类型", other)),
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
