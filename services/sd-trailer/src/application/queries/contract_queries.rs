//! 合同查询

use serde::Serialize;

use crate::domain::entities::{ContractFilter, SalesContract, TrailerSummary};
use crate::domain::value_objects::WarehouseId;

/// 合同列表查询（经理也可以看到全部合同）
#[derive(Debug, Clone, Default)]
pub struct ListContractsQuery {
    pub warehouse_id: Option<WarehouseId>,
}

impl ListContractsQuery {
    pub fn to_filter(&self) -> ContractFilter {
        ContractFilter {
            warehouse_id: self.warehouse_id,
            ..Default::default()
        }
    }
}

/// 合同及其挂车信息
#[derive(Debug, Clone, Serialize)]
pub struct ContractView {
    pub contract: SalesContract,
    pub trailer: Option<TrailerSummary>,
    pub customer_name: Option<String>,
}
