//! VIN 值对象

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// VIN 最大长度（与数据库列一致）
const MAX_LENGTH: usize = 50;

/// 修改码所在片段：第 4-9 位
const MODIFICATION_RANGE: std::ops::Range<usize> = 3..9;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VinError {
    #[error("VIN 不能为空")]
    Empty,
    #[error("VIN 长度不能超过 {MAX_LENGTH} 个字符")]
    TooLong,
    #[error("VIN 包含空白字符")]
    Whitespace,
}

/// 车辆识别码
///
/// 业务规则:
/// - 去除首尾空白并转为大写
/// - 全局唯一，创建后作为挂车的身份
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vin(String);

impl Vin {
    pub fn new(vin: impl Into<String>) -> Result<Self, VinError> {
        let vin = vin.into().trim().to_uppercase();

        if vin.is_empty() {
            return Err(VinError::Empty);
        }
        if vin.chars().count() > MAX_LENGTH {
            return Err(VinError::TooLong);
        }
        if vin.chars().any(char::is_whitespace) {
            return Err(VinError::Whitespace);
        }

        Ok(Self(vin))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 车型修改码，用于查找 OTTS 证书
    pub fn modification_code(&self) -> Option<String> {
        modification_code(&self.0)
    }
}

/// 从 VIN 中提取修改码
///
/// 取第 4-9 位：含 3 个以上数字时取最后三位数字；
/// 否则能解析为整数则补零到三位；再否则原样返回。
pub fn modification_code(vin: &str) -> Option<String> {
    let chars: Vec<char> = vin.trim().chars().collect();
    if chars.len() < MODIFICATION_RANGE.end {
        return None;
    }

    let raw: String = chars[MODIFICATION_RANGE].iter().collect();
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let digits: Vec<char> = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() >= 3 {
        return Some(digits[digits.len() - 3..].iter().collect());
    }

    match raw.parse::<i64>() {
        Ok(number) => Some(format!("{:03}", number)),
        Err(_) => Some(raw.to_string()),
    }
}

impl std::fmt::Display for Vin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Vin {
    type Error = VinError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Vin> for String {
    fn from(vin: Vin) -> Self {
        vin.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let vin = Vin::new("  y3ka00002r0000123 ").unwrap();
        assert_eq!(vin.as_str(), "Y3KA00002R0000123");
    }

    #[test]
    fn test_invalid_vin() {
        assert_eq!(Vin::new("   "), Err(VinError::Empty));
        assert_eq!(Vin::new("A".repeat(51)), Err(VinError::TooLong));
        assert_eq!(Vin::new("Y3K 0001"), Err(VinError::Whitespace));
    }

    #[test]
    fn test_modification_code_last_three_digits() {
        // 第 4-9 位为 "000012"
        assert_eq!(modification_code("Y3K000012R0000001"), Some("012".to_string()));
        assert_eq!(modification_code("Y3KA00002R0000123"), Some("002".to_string()));
    }

    #[test]
    fn test_modification_code_short_vin() {
        assert_eq!(modification_code("Y3K0001"), None);
        assert_eq!(modification_code(""), None);
    }

    #[test]
    fn test_modification_code_fallbacks() {
        // 不足三位数字且不是整数：原样返回
        assert_eq!(modification_code("Y3KAB12CDXXXX"), Some("AB12CD".to_string()));
        // 不足三位数字的整数：补零
        assert_eq!(modification_code("Y3K    42XXX"), Some("042".to_string()));
    }
}
