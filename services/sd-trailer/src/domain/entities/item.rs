//! 物料（номенклатура）实体

use dealer_common::{non_blank, AuditInfo, UserId};
use dealer_errors::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::enums::ItemType;
use crate::domain::value_objects::ItemId;

/// 默认计量单位
pub const DEFAULT_UNIT: &str = "шт";

/// 物料的可编辑内容
///
/// 创建和修改共用；`Item::new` / `Item::revise` 负责规范化
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemSpec {
    pub item_type: Option<ItemType>,
    pub article: Option<String>,
    pub name: String,
    pub body_length_mm: Option<i32>,
    pub body_width_mm: Option<i32>,
    pub board_height_mm: Option<i32>,
    pub axle_count: Option<i32>,
    pub wheel_radius: Option<String>,
    /// 篷布高度是唯一依据：0 或空表示无篷布
    pub tent_height_mm: Option<i32>,
    pub has_jockey_wheel: Option<bool>,
    pub hub_type: Option<String>,
    pub size_external: Option<String>,
    pub size_body: Option<String>,
    pub unit: Option<String>,
    pub base_price: Option<Decimal>,
    pub is_active: bool,
}

/// 物料实体
///
/// 描述挂车型号（按 article）或配件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    item_type: ItemType,
    /// TRAILER 必填，(article, item_type) 唯一
    article: Option<String>,
    name: String,
    body_length_mm: Option<i32>,
    body_width_mm: Option<i32>,
    board_height_mm: Option<i32>,
    axle_count: Option<i32>,
    /// 轮辋规格，如 "R13"
    wheel_radius: Option<String>,
    has_tent: Option<bool>,
    /// 仅在 has_tent 时有意义
    tent_height_mm: Option<i32>,
    /// 三态：未知 / 有 / 无
    has_jockey_wheel: Option<bool>,
    hub_type: Option<String>,
    size_external: Option<String>,
    size_body: Option<String>,
    unit: String,
    base_price: Option<Decimal>,
    is_active: bool,
    audit_info: AuditInfo,
}

impl Item {
    /// 创建物料
    pub fn new(spec: ItemSpec, user_id: Option<UserId>) -> AppResult<Self> {
        let mut item = Self::restore(ItemId::new(), ItemType::Component, String::new());
        item.apply(spec)?;
        item.audit_info = AuditInfo::new(user_id);
        Ok(item)
    }

    /// 从存储恢复（其余字段通过 with_* 设置）
    pub fn restore(id: ItemId, item_type: ItemType, name: impl Into<String>) -> Self {
        Self {
            id,
            item_type,
            article: None,
            name: name.into(),
            body_length_mm: None,
            body_width_mm: None,
            board_height_mm: None,
            axle_count: None,
            wheel_radius: None,
            has_tent: None,
            tent_height_mm: None,
            has_jockey_wheel: None,
            hub_type: None,
            size_external: None,
            size_body: None,
            unit: DEFAULT_UNIT.to_string(),
            base_price: None,
            is_active: true,
            audit_info: AuditInfo::default(),
        }
    }

    /// 修改物料
    pub fn revise(&mut self, spec: ItemSpec, user_id: Option<UserId>) -> AppResult<()> {
        self.apply(spec)?;
        self.audit_info.update(user_id);
        Ok(())
    }

    fn apply(&mut self, spec: ItemSpec) -> AppResult<()> {
        let item_type = spec
            .item_type
            .ok_or_else(|| AppError::validation("Укажите тип номенклатуры"))?;
        let article = non_blank(spec.article.as_deref());
        if item_type.requires_article() && article.is_none() {
            return Err(AppError::validation("Для прицепа обязательно укажите артикул"));
        }
        let name = spec.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Укажите наименование"));
        }
        if spec.tent_height_mm.is_some_and(|h| h < 0) {
            return Err(AppError::validation("Высота тента не может быть отрицательной"));
        }

        let (has_tent, tent_height_mm) = match spec.tent_height_mm {
            None | Some(0) => (Some(false), None),
            Some(height) => (Some(true), Some(height)),
        };

        self.item_type = item_type;
        self.article = article;
        self.name = name;
        self.body_length_mm = spec.body_length_mm;
        self.body_width_mm = spec.body_width_mm;
        self.board_height_mm = spec.board_height_mm;
        self.axle_count = spec.axle_count;
        self.wheel_radius = non_blank(spec.wheel_radius.as_deref());
        self.has_tent = has_tent;
        self.tent_height_mm = tent_height_mm;
        self.has_jockey_wheel = spec.has_jockey_wheel;
        self.hub_type = non_blank(spec.hub_type.as_deref());
        self.size_external = non_blank(spec.size_external.as_deref());
        self.size_body = non_blank(spec.size_body.as_deref());
        self.unit = non_blank(spec.unit.as_deref()).unwrap_or_else(|| DEFAULT_UNIT.to_string());
        self.base_price = spec.base_price;
        self.is_active = spec.is_active;
        Ok(())
    }

    // ========== Getters ==========

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn article(&self) -> Option<&str> {
        self.article.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body_length_mm(&self) -> Option<i32> {
        self.body_length_mm
    }

    pub fn body_width_mm(&self) -> Option<i32> {
        self.body_width_mm
    }

    pub fn board_height_mm(&self) -> Option<i32> {
        self.board_height_mm
    }

    pub fn axle_count(&self) -> Option<i32> {
        self.axle_count
    }

    pub fn wheel_radius(&self) -> Option<&str> {
        self.wheel_radius.as_deref()
    }

    pub fn has_tent(&self) -> Option<bool> {
        self.has_tent
    }

    pub fn tent_height_mm(&self) -> Option<i32> {
        self.tent_height_mm
    }

    pub fn has_jockey_wheel(&self) -> Option<bool> {
        self.has_jockey_wheel
    }

    pub fn hub_type(&self) -> Option<&str> {
        self.hub_type.as_deref()
    }

    pub fn size_external(&self) -> Option<&str> {
        self.size_external.as_deref()
    }

    pub fn size_body(&self) -> Option<&str> {
        self.size_body.as_deref()
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn base_price(&self) -> Option<Decimal> {
        self.base_price
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    // ========== Builders ==========

    pub fn with_article(mut self, article: Option<String>) -> Self {
        self.article = article;
        self
    }

    pub fn with_body_dimensions(mut self, length_mm: Option<i32>, width_mm: Option<i32>) -> Self {
        self.body_length_mm = length_mm;
        self.body_width_mm = width_mm;
        self
    }

    pub fn with_board_height_mm(mut self, board_height_mm: Option<i32>) -> Self {
        self.board_height_mm = board_height_mm;
        self
    }

    pub fn with_axle_count(mut self, axle_count: Option<i32>) -> Self {
        self.axle_count = axle_count;
        self
    }

    pub fn with_wheel_radius(mut self, wheel_radius: Option<String>) -> Self {
        self.wheel_radius = wheel_radius;
        self
    }

    /// 原样设置篷布字段（不做规范化，用于恢复历史数据）
    pub fn with_tent(mut self, has_tent: Option<bool>, tent_height_mm: Option<i32>) -> Self {
        self.has_tent = has_tent;
        self.tent_height_mm = tent_height_mm;
        self
    }

    pub fn with_jockey_wheel(mut self, has_jockey_wheel: Option<bool>) -> Self {
        self.has_jockey_wheel = has_jockey_wheel;
        self
    }

    pub fn with_hub_type(mut self, hub_type: Option<String>) -> Self {
        self.hub_type = hub_type;
        self
    }

    pub fn with_sizes(mut self, size_external: Option<String>, size_body: Option<String>) -> Self {
        self.size_external = size_external;
        self.size_body = size_body;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_base_price(mut self, base_price: Option<Decimal>) -> Self {
        self.base_price = base_price;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn with_audit_info(mut self, audit_info: AuditInfo) -> Self {
        self.audit_info = audit_info;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trailer_spec() -> ItemSpec {
        ItemSpec {
            item_type: Some(ItemType::Trailer),
            article: Some(" MZSA-817 ".to_string()),
            name: " Прицеп 2,5 м ".to_string(),
            axle_count: Some(1),
            wheel_radius: Some("R13".to_string()),
            is_active: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_normalizes_fields() {
        let item = Item::new(trailer_spec(), None).unwrap();
        assert_eq!(item.article(), Some("MZSA-817"));
        assert_eq!(item.name(), "Прицеп 2,5 м");
        assert_eq!(item.unit(), DEFAULT_UNIT);
        assert_eq!(item.has_tent(), Some(false));
        assert_eq!(item.tent_height_mm(), None);
    }

    #[test]
    fn test_trailer_requires_article() {
        let spec = ItemSpec {
            article: Some("   ".to_string()),
            ..trailer_spec()
        };
        assert!(matches!(Item::new(spec, None), Err(AppError::Validation(_))));

        let component = ItemSpec {
            item_type: Some(ItemType::Component),
            article: None,
            name: "Тент".to_string(),
            ..Default::default()
        };
        assert!(Item::new(component, None).is_ok());
    }

    #[test]
    fn test_tent_height_is_source_of_truth() {
        let with_tent = Item::new(
            ItemSpec {
                tent_height_mm: Some(60),
                ..trailer_spec()
            },
            None,
        )
        .unwrap();
        assert_eq!(with_tent.has_tent(), Some(true));
        assert_eq!(with_tent.tent_height_mm(), Some(60));

        let zero = Item::new(
            ItemSpec {
                tent_height_mm: Some(0),
                ..trailer_spec()
            },
            None,
        )
        .unwrap();
        assert_eq!(zero.has_tent(), Some(false));
        assert_eq!(zero.tent_height_mm(), None);
    }

    #[test]
    fn test_revise_keeps_id_and_tristate_jockey_wheel() {
        let mut item = Item::new(trailer_spec(), None).unwrap();
        let id = item.id();
        item.revise(
            ItemSpec {
                has_jockey_wheel: None,
                unit: Some("комплект".to_string()),
                ..trailer_spec()
            },
            Some(UserId::new()),
        )
        .unwrap();
        assert_eq!(item.id(), id);
        assert_eq!(item.has_jockey_wheel(), None);
        assert_eq!(item.unit(), "комплект");
    }

    #[test]
    fn test_missing_name() {
        let spec = ItemSpec {
            name: "  ".to_string(),
            ..trailer_spec()
        };
        assert!(Item::new(spec, None).is_err());
    }
}
