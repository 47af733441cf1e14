//! 物料目录查询

use dealer_common::non_blank;
use dealer_errors::{AppError, AppResult};
use serde::Serialize;

use crate::domain::entities::Item;
use crate::domain::value_objects::{MatchCriteria, TentSelector};

/// 挂车表单中的特征选择
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSelection {
    pub size_body: Option<String>,
    pub axle_count: Option<i32>,
    pub wheel_radius: Option<String>,
    /// 表单以文本提交
    pub board_height_mm: Option<String>,
    pub jockey_wheel: bool,
    /// 0 表示无篷布
    pub tent_height_mm: Option<i32>,
}

impl ModelSelection {
    /// 转换为匹配条件；空值不参与过滤
    pub fn to_criteria(&self) -> AppResult<MatchCriteria> {
        let mut criteria = MatchCriteria::new(self.jockey_wheel);
        if let Some(size_body) = non_blank(self.size_body.as_deref()) {
            criteria = criteria.with_size_body(size_body);
        }
        if let Some(axle_count) = self.axle_count {
            criteria = criteria.with_axle_count(axle_count);
        }
        if let Some(wheel_radius) = non_blank(self.wheel_radius.as_deref()) {
            criteria = criteria.with_wheel_radius(wheel_radius);
        }
        if let Some(raw) = non_blank(self.board_height_mm.as_deref()) {
            let height = raw
                .parse::<i32>()
                .map_err(|_| AppError::validation("Некорректное значение высоты борта."))?;
            criteria = criteria.with_board_height_mm(height);
        }
        if let Some(height) = self.tent_height_mm {
            let tent = TentSelector::from_height(height)
                .ok_or_else(|| AppError::validation("Высота тента не может быть отрицательной"))?;
            criteria = criteria.with_tent(tent);
        }
        Ok(criteria)
    }
}

/// 挂车表单的可选值（来自启用的挂车型号）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrailerFormOptions {
    pub size_body: Vec<String>,
    pub axle_count: Vec<i32>,
    pub wheel_radius: Vec<String>,
    pub board_height_mm: Vec<i32>,
    /// 不含 0（“无篷布”由调用方添加）
    pub tent_height_mm: Vec<i32>,
}

impl TrailerFormOptions {
    pub fn from_items(items: &[Item]) -> Self {
        fn distinct<T: Ord + Clone>(values: impl Iterator<Item = T>) -> Vec<T> {
            let mut values: Vec<T> = values.collect();
            values.sort();
            values.dedup();
            values
        }

        Self {
            size_body: distinct(items.iter().filter_map(|i| i.size_body().map(str::to_string))),
            axle_count: distinct(items.iter().filter_map(Item::axle_count)),
            wheel_radius: distinct(items.iter().filter_map(|i| i.wheel_radius().map(str::to_string))),
            board_height_mm: distinct(items.iter().filter_map(Item::board_height_mm)),
            tent_height_mm: distinct(items.iter().filter_map(Item::tent_height_mm)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ItemSpec;
    use crate::domain::enums::ItemType;

    fn item(size_body: &str, axles: i32, tent: Option<i32>) -> Item {
        Item::new(
            ItemSpec {
                item_type: Some(ItemType::Trailer),
                article: Some(format!("A-{}-{}", size_body, axles)),
                name: "Прицеп".to_string(),
                size_body: Some(size_body.to_string()),
                axle_count: Some(axles),
                tent_height_mm: tent,
                is_active: true,
                ..Default::default()
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_selection_to_criteria() {
        let selection = ModelSelection {
            size_body: Some(" 2500x1300 ".to_string()),
            wheel_radius: Some("".to_string()),
            board_height_mm: Some("400".to_string()),
            jockey_wheel: true,
            tent_height_mm: Some(0),
            ..Default::default()
        };
        let criteria = selection.to_criteria().unwrap();
        assert_eq!(criteria.size_body.as_deref(), Some("2500x1300"));
        assert_eq!(criteria.wheel_radius, None);
        assert_eq!(criteria.board_height_mm, Some(400));
        assert_eq!(criteria.tent, Some(TentSelector::NoTent));
    }

    #[test]
    fn test_non_numeric_board_height() {
        let selection = ModelSelection {
            board_height_mm: Some("высокий".to_string()),
            ..Default::default()
        };
        assert!(matches!(selection.to_criteria(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_form_options_are_distinct_and_sorted() {
        let items = vec![
            item("3000x1500", 2, Some(60)),
            item("2500x1300", 1, None),
            item("2500x1300", 1, Some(60)),
        ];
        let options = TrailerFormOptions::from_items(&items);
        assert_eq!(options.size_body, vec!["2500x1300", "3000x1500"]);
        assert_eq!(options.axle_count, vec![1, 2]);
        assert_eq!(options.tent_height_mm, vec![60]);
    }
}
