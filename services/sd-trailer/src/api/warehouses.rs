//! 仓库与 OTTS 证书接口

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use dealer_errors::AppResult;
use serde::Deserialize;
use uuid::Uuid;

use super::{AppState, Created};
use crate::application::commands::{
    CreateOttsCommand, CreateWarehouseCommand, DeleteOttsCommand, SetWarehouseActiveCommand, UpdateOttsCommand,
};
use crate::domain::entities::{Otts, OttsSpec, Warehouse};
use crate::domain::value_objects::{CallerIdentity, OttsId, WarehouseId};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/warehouses", get(list_warehouses).post(create_warehouse))
        .route("/warehouses/{id}", get(get_warehouse))
        .route("/warehouses/{id}/active", put(set_active))
        .route("/otts", get(list_otts).post(create_otts))
        .route("/otts/{id}", get(get_otts).put(update_otts).delete(delete_otts))
        .route("/otts/by-vin/{vin}", get(otts_for_vin))
}

#[derive(Debug, Deserialize)]
pub struct WarehouseRequest {
    pub name: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

impl WarehouseRequest {
    pub fn into_command(self, caller: CallerIdentity) -> CreateWarehouseCommand {
        CreateWarehouseCommand {
            caller,
            name: self.name,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct OttsRequest {
    pub number: String,
    pub date: Option<NaiveDate>,
    pub modification: String,
    pub name: String,
    pub axle_count: i32,
    pub full_mass_kg: Option<i32>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl OttsRequest {
    fn into_spec(self) -> OttsSpec {
        OttsSpec {
            number: self.number,
            date: self.date,
            modification: self.modification,
            name: self.name,
            axle_count: self.axle_count,
            full_mass_kg: self.full_mass_kg,
            is_active: self.is_active,
        }
    }

    pub fn into_create_command(self, caller: CallerIdentity) -> CreateOttsCommand {
        CreateOttsCommand {
            caller,
            spec: self.into_spec(),
        }
    }

    pub fn into_update_command(self, otts_id: OttsId, caller: CallerIdentity) -> UpdateOttsCommand {
        UpdateOttsCommand {
            otts_id,
            caller,
            spec: self.into_spec(),
        }
    }
}

// ========== 仓库 ==========

async fn list_warehouses(State(state): State<AppState>) -> AppResult<Json<Vec<Warehouse>>> {
    Ok(Json(state.warehouses.list_warehouses().await?))
}

async fn create_warehouse(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(req): Json<WarehouseRequest>,
) -> AppResult<(StatusCode, Json<Created>)> {
    let id = state.warehouses.create_warehouse(req.into_command(caller)).await?;
    Ok(Created::response(id))
}

async fn get_warehouse(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Warehouse>> {
    Ok(Json(state.warehouses.get_warehouse(WarehouseId::from_uuid(id)).await?))
}

async fn set_active(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(req): Json<ActiveRequest>,
) -> AppResult<StatusCode> {
    state
        .warehouses
        .set_active(SetWarehouseActiveCommand {
            warehouse_id: WarehouseId::from_uuid(id),
            caller,
            is_active: req.is_active,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== OTTS ==========

async fn list_otts(State(state): State<AppState>) -> AppResult<Json<Vec<Otts>>> {
    Ok(Json(state.otts.list_otts().await?))
}

async fn create_otts(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(req): Json<OttsRequest>,
) -> AppResult<(StatusCode, Json<Created>)> {
    let id = state.otts.create_otts(req.into_create_command(caller)).await?;
    Ok(Created::response(id))
}

async fn get_otts(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Otts>> {
    Ok(Json(state.otts.get_otts(OttsId::from_uuid(id)).await?))
}

async fn update_otts(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(req): Json<OttsRequest>,
) -> AppResult<StatusCode> {
    state
        .otts
        .update_otts(req.into_update_command(OttsId::from_uuid(id), caller))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_otts(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .otts
        .delete_otts(DeleteOttsCommand {
            otts_id: OttsId::from_uuid(id),
            caller,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn otts_for_vin(State(state): State<AppState>, Path(vin): Path<String>) -> AppResult<Json<Option<Otts>>> {
    Ok(Json(state.otts.find_for_vin(&vin).await?))
}
