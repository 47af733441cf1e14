//! 型号匹配条件

use serde::{Deserialize, Serialize};

use crate::domain::entities::Item;
use crate::domain::enums::ItemType;

/// 篷布条件
///
/// 表单中篷布高度 0 表示“无篷布”
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TentSelector {
    /// has_tent = false 或篷布高度为空
    NoTent,
    /// has_tent = true 且篷布高度精确相等
    Height(i32),
}

impl TentSelector {
    /// 由篷布高度构造，负数无效
    pub fn from_height(height_mm: i32) -> Option<Self> {
        match height_mm {
            0 => Some(TentSelector::NoTent),
            h if h > 0 => Some(TentSelector::Height(h)),
            _ => None,
        }
    }

    pub fn height_mm(&self) -> i32 {
        match self {
            TentSelector::NoTent => 0,
            TentSelector::Height(h) => *h,
        }
    }

    fn accepts(&self, item: &Item) -> bool {
        match self {
            TentSelector::NoTent => item.has_tent() == Some(false) || item.tent_height_mm().is_none(),
            TentSelector::Height(h) => item.has_tent() == Some(true) && item.tent_height_mm() == Some(*h),
        }
    }
}

/// 挂车型号匹配条件
///
/// 只在 TRAILER 且启用的物料中匹配；未提供的条件不过滤，
/// 所有比较都是精确相等。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCriteria {
    pub size_body: Option<String>,
    pub axle_count: Option<i32>,
    pub wheel_radius: Option<String>,
    pub board_height_mm: Option<i32>,
    /// 导向轮必须明确选择
    pub jockey_wheel: bool,
    pub tent: Option<TentSelector>,
}

impl MatchCriteria {
    pub fn new(jockey_wheel: bool) -> Self {
        Self {
            size_body: None,
            axle_count: None,
            wheel_radius: None,
            board_height_mm: None,
            jockey_wheel,
            tent: None,
        }
    }

    pub fn with_size_body(mut self, size_body: impl Into<String>) -> Self {
        self.size_body = Some(size_body.into());
        self
    }

    pub fn with_axle_count(mut self, axle_count: i32) -> Self {
        self.axle_count = Some(axle_count);
        self
    }

    pub fn with_wheel_radius(mut self, wheel_radius: impl Into<String>) -> Self {
        self.wheel_radius = Some(wheel_radius.into());
        self
    }

    pub fn with_board_height_mm(mut self, board_height_mm: i32) -> Self {
        self.board_height_mm = Some(board_height_mm);
        self
    }

    pub fn with_tent(mut self, tent: TentSelector) -> Self {
        self.tent = Some(tent);
        self
    }

    /// 物料是否满足全部条件
    pub fn matches(&self, item: &Item) -> bool {
        is_active_trailer(item)
            && eq_opt(&self.size_body, item.size_body())
            && self.axle_count.is_none_or(|v| item.axle_count() == Some(v))
            && eq_opt(&self.wheel_radius, item.wheel_radius())
            && self.board_height_mm.is_none_or(|v| item.board_height_mm() == Some(v))
            && item.has_jockey_wheel() == Some(self.jockey_wheel)
            && self.tent.is_none_or(|tent| tent.accepts(item))
    }
}

/// 按特征查找挂车型号（全部可选、纯相等过滤）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureQuery {
    pub axle_count: Option<i32>,
    pub board_height_mm: Option<i32>,
    pub wheel_radius: Option<String>,
    pub has_tent: Option<bool>,
    pub tent_height_mm: Option<i32>,
    pub has_jockey_wheel: Option<bool>,
}

impl FeatureQuery {
    pub fn matches(&self, item: &Item) -> bool {
        is_active_trailer(item)
            && self.axle_count.is_none_or(|v| item.axle_count() == Some(v))
            && self.board_height_mm.is_none_or(|v| item.board_height_mm() == Some(v))
            && eq_opt(&self.wheel_radius, item.wheel_radius())
            && self.has_tent.is_none_or(|v| item.has_tent() == Some(v))
            && self.tent_height_mm.is_none_or(|v| item.tent_height_mm() == Some(v))
            && self.has_jockey_wheel.is_none_or(|v| item.has_jockey_wheel() == Some(v))
    }
}

fn is_active_trailer(item: &Item) -> bool {
    item.item_type() == ItemType::Trailer && item.is_active()
}

fn eq_opt(expected: &Option<String>, actual: Option<&str>) -> bool {
    match expected {
        Some(expected) => actual == Some(expected.as_str()),
        None => true,
    }
}
