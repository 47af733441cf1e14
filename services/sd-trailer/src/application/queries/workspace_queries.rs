//! 经理工作台查询

use serde::Serialize;

use super::contract_queries::ContractView;
use crate::domain::entities::{TrailerSummary, Warehouse};
use crate::domain::value_objects::{CallerIdentity, WarehouseId};

/// 没有型号编码时的分组名
pub const NO_ARTICLE: &str = "Без артикула";

#[derive(Debug, Clone)]
pub struct WorkspaceQuery {
    pub caller: CallerIdentity,
    /// 指定要查看的其他仓库，缺省取名称排序的第一个其他仓库
    pub other_warehouse_id: Option<WarehouseId>,
}

/// 同一型号编码下的挂车
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleGroup {
    pub article: String,
    pub trailers: Vec<TrailerSummary>,
}

/// 工作台视图
#[derive(Debug, Clone, Serialize)]
pub struct ManagerWorkspace {
    pub warehouse_id: WarehouseId,
    /// 本仓库未售挂车，按型号编码分组
    pub free_trailers: Vec<ArticleGroup>,
    /// 全部未付款合同
    pub unpaid_contracts: Vec<ContractView>,
    /// 全部已付款未发货合同
    pub paid_not_shipped: Vec<ContractView>,
    pub warehouses: Vec<Warehouse>,
    pub other_warehouse_id: Option<WarehouseId>,
    pub other_trailers: Vec<TrailerSummary>,
}

/// 按 (型号编码, VIN) 排序并分组，分组顺序与排序一致
pub fn group_by_article(mut trailers: Vec<TrailerSummary>) -> Vec<ArticleGroup> {
    sort_by_article(&mut trailers);
    let mut groups: Vec<ArticleGroup> = Vec::new();
    for summary in trailers {
        let article = summary.article.clone().unwrap_or_else(|| NO_ARTICLE.to_string());
        match groups.last_mut() {
            Some(group) if group.article == article => group.trailers.push(summary),
            _ => groups.push(ArticleGroup {
                article,
                trailers: vec![summary],
            }),
        }
    }
    groups
}

/// 型号编码为空的排在最后
pub fn sort_by_article(trailers: &mut [TrailerSummary]) {
    trailers.sort_by(|a, b| {
        let key = |s: &TrailerSummary| (s.article.is_none(), s.article.clone(), s.trailer.vin().as_str().to_string());
        key(a).cmp(&key(b))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Trailer;
    use crate::domain::enums::TrailerStatus;
    use crate::domain::value_objects::{ItemId, Vin};

    fn summary(vin: &str, article: Option<&str>) -> TrailerSummary {
        TrailerSummary {
            trailer: Trailer::new(
                Vin::new(vin).unwrap(),
                ItemId::new(),
                WarehouseId::new(),
                TrailerStatus::InStock,
                None,
            )
            .unwrap(),
            article: article.map(str::to_string),
            item_name: "Прицеп".to_string(),
            warehouse_name: "Алматы".to_string(),
        }
    }

    #[test]
    fn test_group_by_article() {
        let groups = group_by_article(vec![
            summary("VIN3", Some("B")),
            summary("VIN2", None),
            summary("VIN1", Some("B")),
            summary("VIN4", Some("A")),
        ]);
        let articles: Vec<_> = groups.iter().map(|g| g.article.as_str()).collect();
        assert_eq!(articles, vec!["A", "B", NO_ARTICLE]);
        let b_vins: Vec<_> = groups[1].trailers.iter().map(|s| s.trailer.vin().as_str()).collect();
        assert_eq!(b_vins, vec!["VIN1", "VIN3"]);
    }
}
