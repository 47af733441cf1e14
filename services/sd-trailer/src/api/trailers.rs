//! 挂车登记接口

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use dealer_errors::AppResult;
use serde::Deserialize;
use uuid::Uuid;

use super::catalog::ModelSelectionRequest;
use super::{AppState, Created};
use crate::application::commands::{CreateTrailerCommand, DeleteTrailerCommand, UpdateTrailerCommand};
use crate::application::queries::ListTrailersQuery;
use crate::domain::entities::{Trailer, TrailerSummary};
use crate::domain::enums::TrailerStatus;
use crate::domain::value_objects::{CallerIdentity, TrailerId, WarehouseId};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trailers", get(list_trailers).post(create_trailer))
        .route(
            "/trailers/{id}",
            get(get_trailer).put(update_trailer).delete(delete_trailer),
        )
}

/// 挂车表单：型号通过特征选择给出
#[derive(Debug, Deserialize)]
pub struct TrailerRequest {
    pub vin: String,
    #[serde(flatten)]
    pub model: ModelSelectionRequest,
    pub warehouse_id: Uuid,
    pub manufacture_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: TrailerStatus,
    pub comment: Option<String>,
}

impl TrailerRequest {
    pub fn into_create_command(self, caller: CallerIdentity) -> CreateTrailerCommand {
        CreateTrailerCommand {
            caller,
            vin: self.vin,
            model: self.model.into_selection(),
            warehouse_id: WarehouseId::from_uuid(self.warehouse_id),
            manufacture_date: self.manufacture_date,
            status: self.status,
            comment: self.comment,
        }
    }

    pub fn into_update_command(self, trailer_id: TrailerId, caller: CallerIdentity) -> UpdateTrailerCommand {
        UpdateTrailerCommand {
            trailer_id,
            caller,
            vin: self.vin,
            model: self.model.into_selection(),
            warehouse_id: WarehouseId::from_uuid(self.warehouse_id),
            manufacture_date: self.manufacture_date,
            status: self.status,
            comment: self.comment,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TrailerListParams {
    pub vin: Option<String>,
    pub article: Option<String>,
    pub status: Option<TrailerStatus>,
    pub warehouse_id: Option<Uuid>,
}

impl TrailerListParams {
    pub fn into_query(self, caller: CallerIdentity) -> ListTrailersQuery {
        ListTrailersQuery {
            caller,
            vin: self.vin,
            article: self.article,
            status: self.status,
            warehouse_id: self.warehouse_id.map(WarehouseId::from_uuid),
        }
    }
}

async fn list_trailers(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(params): Query<TrailerListParams>,
) -> AppResult<Json<Vec<TrailerSummary>>> {
    Ok(Json(state.trailers.list_trailers(params.into_query(caller)).await?))
}

async fn create_trailer(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(req): Json<TrailerRequest>,
) -> AppResult<(StatusCode, Json<Created>)> {
    let id = state.trailers.create_trailer(req.into_create_command(caller)).await?;
    Ok(Created::response(id))
}

async fn get_trailer(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Trailer>> {
    Ok(Json(state.trailers.get_trailer(TrailerId::from_uuid(id)).await?))
}

async fn update_trailer(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(req): Json<TrailerRequest>,
) -> AppResult<StatusCode> {
    state
        .trailers
        .update_trailer(req.into_update_command(TrailerId::from_uuid(id), caller))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_trailer(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .trailers
        .delete_trailer(DeleteTrailerCommand {
            trailer_id: TrailerId::from_uuid(id),
            caller,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
