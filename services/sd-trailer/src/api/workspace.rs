//! 经理工作台接口

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use dealer_errors::AppResult;
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::application::queries::{ManagerWorkspace, WorkspaceQuery};
use crate::domain::value_objects::{CallerIdentity, WarehouseId};

pub fn routes() -> Router<AppState> {
    Router::new().route("/workspace", get(workspace))
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkspaceParams {
    pub other_warehouse_id: Option<Uuid>,
}

async fn workspace(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(params): Query<WorkspaceParams>,
) -> AppResult<Json<ManagerWorkspace>> {
    let query = WorkspaceQuery {
        caller,
        other_warehouse_id: params.other_warehouse_id.map(WarehouseId::from_uuid),
    };
    Ok(Json(state.workspace.workspace(query).await?))
}
