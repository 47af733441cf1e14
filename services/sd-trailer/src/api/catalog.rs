//! 物料目录与型号匹配接口

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use dealer_errors::AppResult;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::{Created, AppState};
use crate::application::commands::{CreateItemCommand, DeleteItemCommand, UpdateItemCommand};
use crate::application::queries::{ModelSelection, TrailerFormOptions};
use crate::domain::entities::{Item, ItemSpec};
use crate::domain::enums::ItemType;
use crate::domain::value_objects::{CallerIdentity, FeatureQuery, ItemId};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item).put(update_item).delete(delete_item))
        .route("/catalog/match", post(match_model))
        .route("/catalog/features", get(find_by_features))
        .route("/catalog/trailer-options", get(trailer_options))
}

/// 物料表单
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    pub item_type: Option<ItemType>,
    pub article: Option<String>,
    pub name: String,
    pub body_length_mm: Option<i32>,
    pub body_width_mm: Option<i32>,
    pub board_height_mm: Option<i32>,
    pub axle_count: Option<i32>,
    pub wheel_radius: Option<String>,
    pub tent_height_mm: Option<i32>,
    pub has_jockey_wheel: Option<bool>,
    pub hub_type: Option<String>,
    pub size_external: Option<String>,
    pub size_body: Option<String>,
    pub unit: Option<String>,
    pub base_price: Option<Decimal>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl ItemRequest {
    fn into_spec(self) -> ItemSpec {
        ItemSpec {
            item_type: self.item_type,
            article: self.article,
            name: self.name,
            body_length_mm: self.body_length_mm,
            body_width_mm: self.body_width_mm,
            board_height_mm: self.board_height_mm,
            axle_count: self.axle_count,
            wheel_radius: self.wheel_radius,
            tent_height_mm: self.tent_height_mm,
            has_jockey_wheel: self.has_jockey_wheel,
            hub_type: self.hub_type,
            size_external: self.size_external,
            size_body: self.size_body,
            unit: self.unit,
            base_price: self.base_price,
            is_active: self.is_active,
        }
    }

    pub fn into_create_command(self, caller: CallerIdentity) -> CreateItemCommand {
        CreateItemCommand {
            caller,
            spec: self.into_spec(),
        }
    }

    pub fn into_update_command(self, item_id: ItemId, caller: CallerIdentity) -> UpdateItemCommand {
        UpdateItemCommand {
            item_id,
            caller,
            spec: self.into_spec(),
        }
    }
}

/// 挂车表单中的特征选择
#[derive(Debug, Default, Deserialize)]
pub struct ModelSelectionRequest {
    pub size_body: Option<String>,
    pub axle_count: Option<i32>,
    pub wheel_radius: Option<String>,
    /// 表单文本，服务端解析
    pub board_height_mm: Option<String>,
    #[serde(default)]
    pub jockey_wheel: bool,
    pub tent_height_mm: Option<i32>,
}

impl ModelSelectionRequest {
    pub fn into_selection(self) -> ModelSelection {
        ModelSelection {
            size_body: self.size_body,
            axle_count: self.axle_count,
            wheel_radius: self.wheel_radius,
            board_height_mm: self.board_height_mm,
            jockey_wheel: self.jockey_wheel,
            tent_height_mm: self.tent_height_mm,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FeatureParams {
    pub axle_count: Option<i32>,
    pub board_height_mm: Option<i32>,
    pub wheel_radius: Option<String>,
    pub has_tent: Option<bool>,
    pub tent_height_mm: Option<i32>,
    pub has_jockey_wheel: Option<bool>,
}

impl FeatureParams {
    pub fn into_query(self) -> FeatureQuery {
        FeatureQuery {
            axle_count: self.axle_count,
            board_height_mm: self.board_height_mm,
            wheel_radius: self.wheel_radius,
            has_tent: self.has_tent,
            tent_height_mm: self.tent_height_mm,
            has_jockey_wheel: self.has_jockey_wheel,
        }
    }
}

async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<Item>>> {
    Ok(Json(state.catalog.list_items().await?))
}

async fn create_item(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(req): Json<ItemRequest>,
) -> AppResult<(StatusCode, Json<Created>)> {
    let id = state.catalog.create_item(req.into_create_command(caller)).await?;
    Ok(Created::response(id))
}

async fn get_item(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Item>> {
    Ok(Json(state.catalog.get_item(ItemId::from_uuid(id)).await?))
}

async fn update_item(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(req): Json<ItemRequest>,
) -> AppResult<StatusCode> {
    state
        .catalog
        .update_item(req.into_update_command(ItemId::from_uuid(id), caller))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_item(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .catalog
        .delete_item(DeleteItemCommand {
            item_id: ItemId::from_uuid(id),
            caller,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn match_model(
    State(state): State<AppState>,
    Json(req): Json<ModelSelectionRequest>,
) -> AppResult<Json<Item>> {
    Ok(Json(state.catalog.resolve_model(&req.into_selection()).await?))
}

async fn find_by_features(
    State(state): State<AppState>,
    Query(params): Query<FeatureParams>,
) -> AppResult<Json<Option<Item>>> {
    Ok(Json(state.catalog.find_by_features(&params.into_query()).await?))
}

async fn trailer_options(State(state): State<AppState>) -> AppResult<Json<TrailerFormOptions>> {
    Ok(Json(state.catalog.trailer_form_options().await?))
}
