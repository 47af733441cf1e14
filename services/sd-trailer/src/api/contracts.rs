//! 销售合同、合同文档与远程签名接口

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use dealer_errors::AppResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{pdf_response, AppState, Created};
use crate::application::commands::{
    AddOrgSignatureCommand, CreateContractCommand, DeleteContractCommand, SigningStepCommand,
    UpdateContractCommand,
};
use crate::application::queries::{ContractView, ListContractsQuery};
use crate::domain::entities::{ContractTerms, SalesContract, SigningRecord};
use crate::domain::value_objects::{CallerIdentity, ContractId, CustomerId, TrailerId, WarehouseId};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contracts", get(list_contracts).post(create_contract))
        .route("/contracts/next-number", get(next_number))
        .route(
            "/contracts/{id}",
            get(get_contract).put(update_contract).delete(delete_contract),
        )
        .route("/contracts/{id}/pdf", get(contract_pdf))
        .route("/contracts/{id}/pdf-base64", get(contract_pdf_base64))
        .route("/contracts/{id}/sigex/preregister", post(preregister))
        .route("/contracts/{id}/sigex/org-signature", post(add_org_signature))
        .route("/contracts/{id}/sigex/qr", post(start_qr))
        .route("/contracts/{id}/sigex/status", get(poll_status))
        .route("/contracts/{id}/sigex/ddc", get(signed_card))
}

/// 合同表单
#[derive(Debug, Deserialize)]
pub struct ContractRequest {
    pub trailer_id: Uuid,
    pub contract_number: Option<String>,
    pub contract_date: Option<NaiveDate>,
    pub customer_id: Option<Uuid>,
    pub price: Option<Decimal>,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub is_shipped: bool,
}

impl ContractRequest {
    fn terms(&self) -> ContractTerms {
        ContractTerms {
            contract_date: self.contract_date,
            customer_id: self.customer_id.map(CustomerId::from_uuid),
            price: self.price,
            payment_method: self.payment_method.clone(),
            is_paid: self.is_paid,
            is_shipped: self.is_shipped,
        }
    }

    pub fn into_create_command(self, caller: CallerIdentity) -> CreateContractCommand {
        CreateContractCommand {
            caller,
            terms: self.terms(),
            trailer_id: TrailerId::from_uuid(self.trailer_id),
            contract_number: self.contract_number,
        }
    }

    pub fn into_update_command(self, contract_id: ContractId, caller: CallerIdentity) -> UpdateContractCommand {
        UpdateContractCommand {
            contract_id,
            caller,
            terms: self.terms(),
            trailer_id: TrailerId::from_uuid(self.trailer_id),
            contract_number: self.contract_number,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContractListParams {
    pub warehouse_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct OrgSignatureRequest {
    pub signature: String,
    pub sign_type: Option<String>,
}

impl OrgSignatureRequest {
    pub fn into_command(self, contract_id: ContractId, caller: CallerIdentity) -> AddOrgSignatureCommand {
        AddOrgSignatureCommand {
            contract_id,
            caller,
            signature: self.signature,
            sign_type: self.sign_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NextNumberResponse {
    pub contract_number: String,
}

#[derive(Debug, Serialize)]
pub struct PdfBase64Response {
    #[serde(rename = "pdfBase64")]
    pub pdf_base64: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentIdResponse {
    pub document_id: String,
}

#[derive(Debug, Serialize)]
pub struct SignIdResponse {
    pub sign_id: i64,
}

#[derive(Debug, Serialize)]
pub struct OperationIdResponse {
    pub operation_id: String,
}

fn step(id: Uuid, caller: CallerIdentity) -> SigningStepCommand {
    SigningStepCommand {
        contract_id: ContractId::from_uuid(id),
        caller,
    }
}

// ========== 合同 ==========

async fn list_contracts(
    State(state): State<AppState>,
    Query(params): Query<ContractListParams>,
) -> AppResult<Json<Vec<ContractView>>> {
    let query = ListContractsQuery {
        warehouse_id: params.warehouse_id.map(WarehouseId::from_uuid),
    };
    Ok(Json(state.contracts.list_contracts(query).await?))
}

async fn create_contract(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(req): Json<ContractRequest>,
) -> AppResult<(StatusCode, Json<Created>)> {
    let id = state.contracts.create_contract(req.into_create_command(caller)).await?;
    Ok(Created::response(id))
}

async fn next_number(State(state): State<AppState>) -> AppResult<Json<NextNumberResponse>> {
    Ok(Json(NextNumberResponse {
        contract_number: state.contracts.next_contract_number().await?,
    }))
}

async fn get_contract(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<SalesContract>> {
    Ok(Json(state.contracts.get_contract(ContractId::from_uuid(id)).await?))
}

async fn update_contract(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(req): Json<ContractRequest>,
) -> AppResult<StatusCode> {
    state
        .contracts
        .update_contract(req.into_update_command(ContractId::from_uuid(id), caller))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_contract(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .contracts
        .delete_contract(DeleteContractCommand {
            contract_id: ContractId::from_uuid(id),
            caller,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== 合同文档 ==========

async fn contract_pdf(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Response> {
    let document = state.documents.contract_pdf(ContractId::from_uuid(id)).await?;
    Ok(pdf_response(document))
}

async fn contract_pdf_base64(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PdfBase64Response>> {
    Ok(Json(PdfBase64Response {
        pdf_base64: state.documents.contract_pdf_base64(ContractId::from_uuid(id)).await?,
    }))
}

// ========== 远程签名 ==========

async fn preregister(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DocumentIdResponse>> {
    Ok(Json(DocumentIdResponse {
        document_id: state.signing.preregister(step(id, caller)).await?,
    }))
}

async fn add_org_signature(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(req): Json<OrgSignatureRequest>,
) -> AppResult<Json<SignIdResponse>> {
    let cmd = req.into_command(ContractId::from_uuid(id), caller);
    Ok(Json(SignIdResponse {
        sign_id: state.signing.add_org_signature(cmd).await?,
    }))
}

async fn start_qr(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OperationIdResponse>> {
    Ok(Json(OperationIdResponse {
        operation_id: state.signing.start_qr(step(id, caller)).await?,
    }))
}

async fn poll_status(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SigningRecord>> {
    Ok(Json(state.signing.poll_qr_status(step(id, caller)).await?))
}

async fn signed_card(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let document = state.signing.signed_card(step(id, caller)).await?;
    Ok(pdf_response(document))
}
