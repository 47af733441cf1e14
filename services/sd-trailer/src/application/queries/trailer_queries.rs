//! 挂车查询

use dealer_common::non_blank;

use crate::domain::entities::TrailerFilter;
use crate::domain::enums::TrailerStatus;
use crate::domain::value_objects::{CallerIdentity, WarehouseId};

/// 挂车列表查询
#[derive(Debug, Clone)]
pub struct ListTrailersQuery {
    pub caller: CallerIdentity,
    pub vin: Option<String>,
    pub article: Option<String>,
    pub status: Option<TrailerStatus>,
    pub warehouse_id: Option<WarehouseId>,
}

impl ListTrailersQuery {
    /// 构造过滤条件；有仓库的经理只能看到本仓库
    pub fn to_filter(&self) -> TrailerFilter {
        TrailerFilter {
            vin: non_blank(self.vin.as_deref()),
            article: non_blank(self.article.as_deref()),
            status: self.status,
            warehouse_id: self.caller.warehouse_scope().or(self.warehouse_id),
            exclude_status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_scope_overrides_requested_warehouse() {
        let own = WarehouseId::new();
        let query = ListTrailersQuery {
            caller: CallerIdentity::manager(None, Some(own)),
            vin: Some("  ".to_string()),
            article: None,
            status: None,
            warehouse_id: Some(WarehouseId::new()),
        };
        let filter = query.to_filter();
        assert_eq!(filter.warehouse_id, Some(own));
        assert_eq!(filter.vin, None);
    }

    #[test]
    fn test_admin_uses_requested_warehouse() {
        let requested = WarehouseId::new();
        let query = ListTrailersQuery {
            caller: CallerIdentity::admin(None),
            vin: None,
            article: Some("mzsa".to_string()),
            status: Some(TrailerStatus::InStock),
            warehouse_id: Some(requested),
        };
        assert_eq!(query.to_filter().warehouse_id, Some(requested));
    }
}
