//! 挂车状态

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::UnknownVariant;

/// 挂车状态
///
/// `Sold` 只由合同生命周期设置：有合同引用时为 `Sold`，否则不是
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrailerStatus {
    /// 在库
    #[default]
    InStock,
    /// 已售
    Sold,
    /// 为客户预留
    Reserved,
    /// 在途 / 生产中
    InTransit,
    /// 已报废
    Decommissioned,
}

impl TrailerStatus {
    pub const ALL: [TrailerStatus; 5] = [
        TrailerStatus::InStock,
        TrailerStatus::Sold,
        TrailerStatus::Reserved,
        TrailerStatus::InTransit,
        TrailerStatus::Decommissioned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrailerStatus::InStock => "IN_STOCK",
            TrailerStatus::Sold => "SOLD",
            TrailerStatus::Reserved => "RESERVED",
            TrailerStatus::InTransit => "IN_TRANSIT",
            TrailerStatus::Decommissioned => "DECOMMISSIONED",
        }
    }

    pub fn is_sold(&self) -> bool {
        matches!(self, TrailerStatus::Sold)
    }
}

impl FromStr for TrailerStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrailerStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("挂车状态", s))
    }
}

impl std::fmt::Display for TrailerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all() {
        for status in TrailerStatus::ALL {
            assert_eq!(status.as_str().parse::<TrailerStatus>().unwrap(), status);
        }
        assert!("LOST".parse::<TrailerStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&TrailerStatus::InTransit).unwrap();
        assert_eq!(json, "\"IN_TRANSIT\"");
    }
}
