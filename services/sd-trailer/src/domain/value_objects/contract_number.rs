//! 合同编号

/// 根据已有编号推算下一个合同编号
///
/// 每个编号只保留数字字符后解析为整数，取最大值加一；
/// 没有可用数字时返回 "1"。仅作建议值，唯一性由存储层约束保证。
pub fn next_contract_number<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .filter_map(digits_value)
        .max()
        .and_then(|max| max.checked_add(1))
        .map(|next| next.to_string())
        .unwrap_or_else(|| "1".to_string())
}

fn digits_value(number: &str) -> Option<u128> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_numbers() {
        assert_eq!(next_contract_number(["5", "CN-12", "7"]), "13");
    }

    #[test]
    fn test_empty_and_non_numeric() {
        assert_eq!(next_contract_number(Vec::<&str>::new()), "1");
        assert_eq!(next_contract_number(["", "ДОГ-А", "  "]), "1");
    }

    #[test]
    fn test_digits_are_concatenated() {
        // "2024/15" -> 202415
        assert_eq!(next_contract_number(["2024/15", "99"]), "202416");
    }

    #[test]
    fn test_unparsable_entries_are_skipped() {
        let huge = "9".repeat(60);
        assert_eq!(next_contract_number([huge.as_str(), "41"]), "42");
    }
}
