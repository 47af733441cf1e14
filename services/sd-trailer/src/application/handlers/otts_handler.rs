//! OTTS 证书

use std::sync::Arc;

use dealer_errors::{AppError, AppResult};
use tracing::info;

use crate::application::commands::{CreateOttsCommand, DeleteOttsCommand, UpdateOttsCommand};
use crate::domain::entities::Otts;
use crate::domain::repositories::OttsRepository;
use crate::domain::value_objects::{modification_code, OttsId};

pub struct OttsHandler {
    otts_repo: Arc<dyn OttsRepository>,
}

impl OttsHandler {
    pub fn new(otts_repo: Arc<dyn OttsRepository>) -> Self {
        Self { otts_repo }
    }

    pub async fn create_otts(&self, cmd: CreateOttsCommand) -> AppResult<OttsId> {
        let otts = Otts::new(cmd.spec)?;
        self.otts_repo.save(&otts).await?;
        info!(otts_id = %otts.id(), modification = otts.modification(), "OTTS created");
        Ok(otts.id())
    }

    pub async fn get_otts(&self, otts_id: OttsId) -> AppResult<Otts> {
        self.otts_repo
            .find_by_id(otts_id)
            .await?
            .ok_or_else(|| AppError::not_found("ОТТС не найден"))
    }

    pub async fn update_otts(&self, cmd: UpdateOttsCommand) -> AppResult<()> {
        let mut otts = self.get_otts(cmd.otts_id).await?;
        otts.revise(cmd.spec)?;
        self.otts_repo.update(&otts).await?;
        info!(otts_id = %otts.id(), "OTTS updated");
        Ok(())
    }

    /// 仅管理员
    pub async fn delete_otts(&self, cmd: DeleteOttsCommand) -> AppResult<()> {
        cmd.caller.require_admin()?;
        let otts = self.get_otts(cmd.otts_id).await?;
        self.otts_repo.delete(otts.id()).await?;
        info!(otts_id = %otts.id(), "OTTS deleted");
        Ok(())
    }

    pub async fn list_otts(&self) -> AppResult<Vec<Otts>> {
        self.otts_repo.list().await
    }

    /// 按 VIN 中的修改码查找证书
    pub async fn find_for_vin(&self, vin: &str) -> AppResult<Option<Otts>> {
        match modification_code(vin) {
            Some(code) => self.otts_repo.find_by_modification(&code).await,
            None => Ok(None),
        }
    }
}
