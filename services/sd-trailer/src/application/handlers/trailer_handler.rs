//! 挂车登记

use std::sync::Arc;

use dealer_common::non_blank;
use dealer_errors::{AppError, AppResult};
use tracing::{info, warn};

use super::CatalogHandler;
use crate::application::commands::{CreateTrailerCommand, DeleteTrailerCommand, UpdateTrailerCommand};
use crate::application::queries::ListTrailersQuery;
use crate::domain::entities::{Trailer, TrailerSummary};
use crate::domain::enums::TrailerStatus;
use crate::domain::repositories::{
    ContractRepository, OttsRepository, TrailerRepository, WarehouseRepository,
};
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::value_objects::{OttsId, TrailerId, Vin, WarehouseId};

pub struct TrailerHandler {
    trailer_repo: Arc<dyn TrailerRepository>,
    warehouse_repo: Arc<dyn WarehouseRepository>,
    otts_repo: Arc<dyn OttsRepository>,
    contract_repo: Arc<dyn ContractRepository>,
    catalog: Arc<CatalogHandler>,
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl TrailerHandler {
    pub fn new(
        trailer_repo: Arc<dyn TrailerRepository>,
        warehouse_repo: Arc<dyn WarehouseRepository>,
        otts_repo: Arc<dyn OttsRepository>,
        contract_repo: Arc<dyn ContractRepository>,
        catalog: Arc<CatalogHandler>,
        uow_factory: Arc<dyn UnitOfWorkFactory>,
    ) -> Self {
        Self {
            trailer_repo,
            warehouse_repo,
            otts_repo,
            contract_repo,
            catalog,
            uow_factory,
        }
    }

    /// 入库
    pub async fn create_trailer(&self, cmd: CreateTrailerCommand) -> AppResult<TrailerId> {
        let vin = cmd.vin()?;
        info!(vin = %vin, warehouse_id = %cmd.warehouse_id, "Creating trailer");

        let item = self.catalog.resolve_model(&cmd.model).await?;
        self.ensure_warehouse(cmd.warehouse_id).await?;
        self.ensure_vin_free(&vin, None).await?;
        let otts_id = self.otts_for_vin(&vin).await?;

        let trailer = Trailer::new(vin, item.id(), cmd.warehouse_id, cmd.status, cmd.caller.user_id())?
            .with_manufacture_date(cmd.manufacture_date)
            .with_comment(non_blank(cmd.comment.as_deref()))
            .with_otts(otts_id);

        self.trailer_repo.save(&trailer).await?;
        info!(trailer_id = %trailer.id(), item_id = %item.id(), otts_id = ?otts_id, "Trailer created");
        Ok(trailer.id())
    }

    pub async fn get_trailer(&self, trailer_id: TrailerId) -> AppResult<Trailer> {
        self.trailer_repo
            .find_by_id(trailer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Прицеп не найден"))
    }

    /// 编辑；已售挂车的状态只能由合同改变
    ///
    /// 登记信息和状态在同一个工作单元中写入。状态只在读取后未被合同改动时写入，
    /// 否则整个编辑回滚并返回可重试的 Conflict。
    pub async fn update_trailer(&self, cmd: UpdateTrailerCommand) -> AppResult<()> {
        let vin = cmd.vin()?;
        let mut trailer = self.get_trailer(cmd.trailer_id).await?;

        let item = self.catalog.resolve_model(&cmd.model).await?;
        self.ensure_warehouse(cmd.warehouse_id).await?;
        self.ensure_vin_free(&vin, Some(trailer.id())).await?;
        let otts_id = self.otts_for_vin(&vin).await?;

        let previous = trailer.status();
        trailer.revise(
            vin,
            item.id(),
            cmd.warehouse_id,
            cmd.manufacture_date,
            cmd.status,
            non_blank(cmd.comment.as_deref()),
            otts_id,
            cmd.caller.user_id(),
        )?;

        let uow = self.uow_factory.begin().await?;
        match Self::write_revision(uow.as_ref(), &trailer, previous).await {
            Ok(()) => uow.commit().await?,
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                warn!(trailer_id = %trailer.id(), error = %e, "Trailer update rejected");
                return Err(e);
            }
        }

        info!(trailer_id = %trailer.id(), status = %trailer.status(), "Trailer updated");
        Ok(())
    }

    async fn write_revision(uow: &dyn UnitOfWork, trailer: &Trailer, previous: TrailerStatus) -> AppResult<()> {
        uow.trailers().update(trailer).await?;
        if trailer.status() != previous {
            uow.trailers().update_status(trailer, previous).await?;
        }
        Ok(())
    }

    /// 删除：经理只能删除本仓库的挂车，有合同时拒绝
    pub async fn delete_trailer(&self, cmd: DeleteTrailerCommand) -> AppResult<()> {
        let trailer = self.get_trailer(cmd.trailer_id).await?;

        if !cmd.caller.can_manage_warehouse(trailer.warehouse_id()) {
            warn!(trailer_id = %trailer.id(), user_id = ?cmd.caller.user_id(), "Trailer delete forbidden");
            return Err(AppError::forbidden("Нет доступа к этому прицепу"));
        }

        let contracts = self.contract_repo.count_by_trailer(trailer.id(), None).await?;
        if contracts > 0 {
            warn!(trailer_id = %trailer.id(), contracts, "Trailer delete rejected: contracts exist");
            return Err(AppError::conflict("Нельзя удалить прицеп, по которому есть договоры"));
        }

        self.trailer_repo.delete(trailer.id()).await?;
        info!(trailer_id = %trailer.id(), "Trailer deleted");
        Ok(())
    }

    pub async fn list_trailers(&self, query: ListTrailersQuery) -> AppResult<Vec<TrailerSummary>> {
        self.trailer_repo.list(&query.to_filter()).await
    }

    async fn ensure_warehouse(&self, warehouse_id: WarehouseId) -> AppResult<()> {
        match self.warehouse_repo.find_by_id(warehouse_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::validation("Склад не найден")),
        }
    }

    async fn ensure_vin_free(&self, vin: &Vin, exclude: Option<TrailerId>) -> AppResult<()> {
        match self.trailer_repo.find_by_vin(vin).await? {
            Some(existing) if Some(existing.id()) != exclude => Err(AppError::conflict(format!(
                "Прицеп с VIN {} уже существует",
                vin
            ))),
            _ => Ok(()),
        }
    }

    /// 按 VIN 修改码关联 OTTS
    async fn otts_for_vin(&self, vin: &Vin) -> AppResult<Option<OttsId>> {
        let Some(code) = vin.modification_code() else {
            return Ok(None);
        };
        Ok(self
            .otts_repo
            .find_by_modification(&code)
            .await?
            .map(|otts| otts.id()))
    }
}
