//! 客户接口

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use dealer_errors::AppResult;
use serde::Deserialize;
use uuid::Uuid;

use super::{AppState, Created};
use crate::application::commands::{CreateCustomerCommand, DeleteCustomerCommand, UpdateCustomerCommand};
use crate::domain::entities::{Customer, CustomerKind, CustomerSpec, IdentityDocument};
use crate::domain::enums::{CustomerType, DocumentType};
use crate::domain::value_objects::{CallerIdentity, CustomerId};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(search_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// 客户表单；证件字段只对自然人有效，联系人只对法人有效
#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub customer_type: CustomerType,
    pub name: String,
    pub iin_bin: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub doc_type: Option<DocumentType>,
    pub doc_number: Option<String>,
    pub doc_issue_date: Option<NaiveDate>,
    pub doc_issuer: Option<String>,
    pub contact_person: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl CustomerRequest {
    fn into_spec(self) -> CustomerSpec {
        let kind = match self.customer_type {
            CustomerType::Person => CustomerKind::Person {
                document: IdentityDocument {
                    doc_type: self.doc_type,
                    number: self.doc_number,
                    issue_date: self.doc_issue_date,
                    issuer: self.doc_issuer,
                },
            },
            CustomerType::Company => CustomerKind::Company {
                contact_person: self.contact_person,
            },
        };
        CustomerSpec {
            kind,
            name: self.name,
            iin_bin: self.iin_bin,
            phone: self.phone,
            email: self.email,
            address: self.address,
            is_active: self.is_active,
        }
    }

    pub fn into_create_command(self, caller: CallerIdentity) -> CreateCustomerCommand {
        CreateCustomerCommand {
            caller,
            spec: self.into_spec(),
        }
    }

    pub fn into_update_command(self, customer_id: CustomerId, caller: CallerIdentity) -> UpdateCustomerCommand {
        UpdateCustomerCommand {
            customer_id,
            caller,
            spec: self.into_spec(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

async fn search_customers(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Customer>>> {
    Ok(Json(state.customers.search_customers(params.q.as_deref()).await?))
}

async fn create_customer(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(req): Json<CustomerRequest>,
) -> AppResult<(StatusCode, Json<Created>)> {
    let id = state.customers.create_customer(req.into_create_command(caller)).await?;
    Ok(Created::response(id))
}

async fn get_customer(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Customer>> {
    Ok(Json(state.customers.get_customer(CustomerId::from_uuid(id)).await?))
}

async fn update_customer(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(req): Json<CustomerRequest>,
) -> AppResult<StatusCode> {
    state
        .customers
        .update_customer(req.into_update_command(CustomerId::from_uuid(id), caller))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_customer(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .customers
        .delete_customer(DeleteCustomerCommand {
            customer_id: CustomerId::from_uuid(id),
            caller,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_request_drops_document_fields() {
        let req: CustomerRequest = serde_json::from_value(serde_json::json!({
            "customer_type": "COMPANY",
            "name": "ТОО Прицеп",
            "doc_number": "123",
            "contact_person": "Иванов"
        }))
        .unwrap();
        let spec = req.into_spec();
        assert!(spec.is_active);
        assert_eq!(
            spec.kind,
            CustomerKind::Company {
                contact_person: Some("Иванов".to_string())
            }
        );
    }
}
