//! 物料目录与型号匹配

use std::sync::Arc;

use dealer_errors::{AppError, AppResult};
use tracing::{info, warn};

use crate::application::commands::{CreateItemCommand, DeleteItemCommand, UpdateItemCommand};
use crate::application::queries::{ModelSelection, TrailerFormOptions};
use crate::domain::entities::Item;
use crate::domain::repositories::{ItemRepository, TrailerRepository};
use crate::domain::value_objects::{FeatureQuery, ItemId, MatchCriteria};

/// 无匹配型号时给用户的提示
pub const NO_MATCH_MESSAGE: &str =
    "Не удалось подобрать модель по указанным характеристикам. Проверьте матрицу.";

pub struct CatalogHandler {
    item_repo: Arc<dyn ItemRepository>,
    trailer_repo: Arc<dyn TrailerRepository>,
}

impl CatalogHandler {
    pub fn new(item_repo: Arc<dyn ItemRepository>, trailer_repo: Arc<dyn TrailerRepository>) -> Self {
        Self {
            item_repo,
            trailer_repo,
        }
    }

    // ========== 物料 CRUD ==========

    pub async fn create_item(&self, cmd: CreateItemCommand) -> AppResult<ItemId> {
        cmd.validate()?;
        let item = Item::new(cmd.spec, cmd.caller.user_id())?;
        self.ensure_article_free(&item).await?;

        self.item_repo.save(&item).await?;
        info!(item_id = %item.id(), article = ?item.article(), item_type = %item.item_type(), "Item created");
        Ok(item.id())
    }

    pub async fn get_item(&self, item_id: ItemId) -> AppResult<Item> {
        self.item_repo
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("Номенклатура не найдена"))
    }

    pub async fn update_item(&self, cmd: UpdateItemCommand) -> AppResult<()> {
        cmd.validate()?;
        let mut item = self.get_item(cmd.item_id).await?;
        item.revise(cmd.spec, cmd.caller.user_id())?;
        self.ensure_article_free(&item).await?;

        self.item_repo.update(&item).await?;
        info!(item_id = %item.id(), "Item updated");
        Ok(())
    }

    /// 有挂车引用时不能删除
    pub async fn delete_item(&self, cmd: DeleteItemCommand) -> AppResult<()> {
        let item = self.get_item(cmd.item_id).await?;
        let in_use = self.trailer_repo.count_by_item(item.id()).await?;
        if in_use > 0 {
            warn!(item_id = %item.id(), trailers = in_use, "Item delete rejected: still referenced");
            return Err(AppError::conflict(format!(
                "Нельзя удалить номенклатуру: на неё ссылаются прицепы ({})",
                in_use
            )));
        }

        self.item_repo.delete(item.id()).await?;
        info!(item_id = %item.id(), "Item deleted");
        Ok(())
    }

    pub async fn list_items(&self) -> AppResult<Vec<Item>> {
        self.item_repo.list().await
    }

    /// (article, item_type) 预检查；存储约束仍是最终保证
    async fn ensure_article_free(&self, item: &Item) -> AppResult<()> {
        let Some(article) = item.article() else {
            return Ok(());
        };
        match self.item_repo.find_by_article(article, item.item_type()).await? {
            Some(existing) if existing.id() != item.id() => Err(AppError::validation(format!(
                "Номенклатура с артикулом {} ({}) уже существует",
                article,
                item.item_type()
            ))),
            _ => Ok(()),
        }
    }

    // ========== 型号匹配 ==========

    /// 按条件匹配型号；多条满足时返回存储顺序的第一条，没有则返回 None
    pub async fn match_model(&self, criteria: &MatchCriteria) -> AppResult<Option<Item>> {
        self.item_repo.find_first_matching(criteria).await
    }

    /// 解析表单选择，无匹配时返回可由用户修正的校验错误
    pub async fn resolve_model(&self, selection: &ModelSelection) -> AppResult<Item> {
        let criteria = selection.to_criteria()?;
        match self.match_model(&criteria).await? {
            Some(item) => Ok(item),
            None => {
                warn!(?criteria, "No trailer model matches the selection");
                Err(AppError::validation(NO_MATCH_MESSAGE))
            }
        }
    }

    /// 辅助特征查找（纯相等过滤）
    pub async fn find_by_features(&self, query: &FeatureQuery) -> AppResult<Option<Item>> {
        self.item_repo.find_first_by_features(query).await
    }

    pub async fn trailer_form_options(&self) -> AppResult<TrailerFormOptions> {
        let items = self.item_repo.list_active_trailers().await?;
        Ok(TrailerFormOptions::from_items(&items))
    }
}
