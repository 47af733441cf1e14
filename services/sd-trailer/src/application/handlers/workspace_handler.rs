//! 经理工作台

use std::sync::Arc;

use dealer_errors::{AppError, AppResult};
use tracing::debug;

use super::ContractHandler;
use crate::application::queries::{group_by_article, sort_by_article, ManagerWorkspace, WorkspaceQuery};
use crate::domain::entities::{contract_list_order, ContractFilter, TrailerFilter, TrailerSummary};
use crate::domain::enums::TrailerStatus;
use crate::domain::repositories::{TrailerRepository, WarehouseRepository};
use crate::domain::value_objects::WarehouseId;

pub struct WorkspaceHandler {
    trailer_repo: Arc<dyn TrailerRepository>,
    warehouse_repo: Arc<dyn WarehouseRepository>,
    contracts: Arc<ContractHandler>,
}

impl WorkspaceHandler {
    pub fn new(
        trailer_repo: Arc<dyn TrailerRepository>,
        warehouse_repo: Arc<dyn WarehouseRepository>,
        contracts: Arc<ContractHandler>,
    ) -> Self {
        Self {
            trailer_repo,
            warehouse_repo,
            contracts,
        }
    }

    pub async fn workspace(&self, query: WorkspaceQuery) -> AppResult<ManagerWorkspace> {
        if query.caller.is_admin() {
            return Err(AppError::forbidden("Рабочее место доступно только менеджеру"));
        }
        let warehouse_id = query.caller.warehouse_id().ok_or_else(|| {
            AppError::failed_precondition(
                "За пользователем не закреплён склад. Обратитесь к администратору.",
            )
        })?;

        let free_trailers = group_by_article(self.unsold_trailers(warehouse_id).await?);

        let mut unpaid_contracts = self.contracts.contract_views(&ContractFilter::unpaid()).await?;
        let mut paid_not_shipped = self
            .contracts
            .contract_views(&ContractFilter::paid_not_shipped())
            .await?;
        unpaid_contracts.sort_by(|a, b| contract_list_order(&a.contract, &b.contract));
        paid_not_shipped.sort_by(|a, b| contract_list_order(&a.contract, &b.contract));

        let mut warehouses = self.warehouse_repo.list().await?;
        warehouses.sort_by(|a, b| a.name().cmp(b.name()));

        let other_warehouse_id = query.other_warehouse_id.or_else(|| {
            warehouses
                .iter()
                .map(|w| w.id())
                .find(|id| *id != warehouse_id)
        });
        let other_trailers = match other_warehouse_id {
            Some(other) => {
                let mut trailers = self.unsold_trailers(other).await?;
                sort_by_article(&mut trailers);
                trailers
            }
            None => Vec::new(),
        };

        debug!(
            warehouse_id = %warehouse_id,
            groups = free_trailers.len(),
            unpaid = unpaid_contracts.len(),
            paid_not_shipped = paid_not_shipped.len(),
            "Workspace assembled"
        );

        Ok(ManagerWorkspace {
            warehouse_id,
            free_trailers,
            unpaid_contracts,
            paid_not_shipped,
            warehouses,
            other_warehouse_id,
            other_trailers,
        })
    }

    async fn unsold_trailers(&self, warehouse_id: WarehouseId) -> AppResult<Vec<TrailerSummary>> {
        self.trailer_repo
            .list(&TrailerFilter {
                warehouse_id: Some(warehouse_id),
                exclude_status: Some(TrailerStatus::Sold),
                ..Default::default()
            })
            .await
    }
}
