//! 数据库行到领域对象的转换

use chrono::{DateTime, NaiveDate, Utc};
use dealer_common::{AuditInfo, UserId};
use dealer_errors::{AppError, AppResult};
use uuid::Uuid;

use crate::domain::entities::{
    ContractTerms, Customer, CustomerKind, IdentityDocument, Item, Otts, OttsSpec, SalesContract, SigningRecord,
    SigningState, Trailer, TrailerSummary, Warehouse,
};
use crate::domain::enums::{CustomerType, DocumentType, ItemType, TrailerStatus};
use crate::domain::value_objects::{ContractId, CustomerId, ItemId, OttsId, TrailerId, Vin, WarehouseId};

use super::rows::{ContractRow, CustomerRow, ItemRow, OttsRow, TrailerRow, TrailerSummaryRow, WarehouseRow};

fn corrupted(entity: &str, detail: impl std::fmt::Display) -> AppError {
    AppError::internal(format!("Corrupted {} row: {}", entity, detail))
}

/// 将 ItemRow 转换为 Item
pub fn item_from_row(row: ItemRow) -> AppResult<Item> {
    let item_type: ItemType = row.item_type.parse().map_err(|e| corrupted("item", e))?;
    let audit_info = build_audit_info(row.created_at, row.created_by, row.updated_at, row.updated_by);

    Ok(Item::restore(ItemId::from_uuid(row.id), item_type, row.name)
        .with_article(row.article)
        .with_body_dimensions(row.body_length_mm, row.body_width_mm)
        .with_board_height_mm(row.board_height_mm)
        .with_axle_count(row.axle_count)
        .with_wheel_radius(row.wheel_radius)
        .with_tent(row.has_tent, row.tent_height_mm)
        .with_jockey_wheel(row.has_jockey_wheel)
        .with_hub_type(row.hub_type)
        .with_sizes(row.size_external, row.size_body)
        .with_unit(row.unit)
        .with_base_price(row.base_price)
        .with_active(row.is_active)
        .with_audit_info(audit_info))
}

/// 将 TrailerRow 转换为 Trailer
pub fn trailer_from_row(row: TrailerRow) -> AppResult<Trailer> {
    let vin = Vin::new(row.vin).map_err(|e| corrupted("trailer", e))?;
    let status: TrailerStatus = row.status.parse().map_err(|e| corrupted("trailer", e))?;
    let audit_info = build_audit_info(row.created_at, row.created_by, row.updated_at, row.updated_by);

    Ok(Trailer::restore(
        TrailerId::from_uuid(row.id),
        vin,
        ItemId::from_uuid(row.item_id),
        WarehouseId::from_uuid(row.warehouse_id),
        status,
    )
    .with_manufacture_date(row.manufacture_date)
    .with_comment(row.comment)
    .with_otts(row.otts_id.map(OttsId::from_uuid))
    .with_audit_info(audit_info))
}

pub fn trailer_summary_from_row(row: TrailerSummaryRow) -> AppResult<TrailerSummary> {
    Ok(TrailerSummary {
        trailer: trailer_from_row(row.trailer)?,
        article: row.article,
        item_name: row.item_name,
        warehouse_name: row.warehouse_name,
    })
}

pub fn warehouse_from_row(row: WarehouseRow) -> Warehouse {
    Warehouse::restore(WarehouseId::from_uuid(row.id), row.name, row.is_active)
}

/// 将 CustomerRow 转换为 Customer，按类型还原证件或联系人
pub fn customer_from_row(row: CustomerRow) -> AppResult<Customer> {
    let customer_type: CustomerType = row.customer_type.parse().map_err(|e| corrupted("customer", e))?;
    let kind = match customer_type {
        CustomerType::Person => CustomerKind::Person {
            document: IdentityDocument {
                doc_type: row
                    .doc_type
                    .as_deref()
                    .map(str::parse::<DocumentType>)
                    .transpose()
                    .map_err(|e| corrupted("customer", e))?,
                number: row.doc_number,
                issue_date: row.doc_issue_date,
                issuer: row.doc_issuer,
            },
        },
        CustomerType::Company => CustomerKind::Company {
            contact_person: row.contact_person,
        },
    };
    let audit_info = build_audit_info(row.created_at, row.created_by, row.updated_at, row.updated_by);

    Ok(Customer::restore(CustomerId::from_uuid(row.id), kind, row.name)
        .with_contacts(row.iin_bin, row.phone, row.email, row.address)
        .with_active(row.is_active)
        .with_audit_info(audit_info))
}

pub fn otts_from_row(row: OttsRow) -> Otts {
    Otts::restore(
        OttsId::from_uuid(row.id),
        OttsSpec {
            number: row.number,
            date: row.date,
            modification: row.modification,
            name: row.name,
            axle_count: row.axle_count,
            full_mass_kg: row.full_mass_kg,
            is_active: row.is_active,
        },
    )
}

/// 将 ContractRow 转换为 SalesContract，签名状态由 sigex_state 判别
pub fn contract_from_row(row: ContractRow) -> AppResult<SalesContract> {
    let state = SigningState::from_parts(
        &row.sigex_state,
        row.sigex_document_id,
        row.sigex_operation_id,
        row.sigex_sign_id,
    )?;
    let signing = SigningRecord::restore(state, row.sigex_expire_at, row.sigex_last_status, row.sigex_last_sign_id);
    let audit_info = build_audit_info(row.created_at, row.created_by, row.updated_at, row.updated_by);

    Ok(
        SalesContract::restore(ContractId::from_uuid(row.id), TrailerId::from_uuid(row.trailer_id))
            .with_number(row.contract_number)
            .with_terms(ContractTerms {
                contract_date: row.contract_date,
                customer_id: row.customer_id.map(CustomerId::from_uuid),
                price: row.price,
                payment_method: row.payment_method,
                is_paid: row.is_paid,
                is_shipped: row.is_shipped,
            })
            .with_source(row.source)
            .with_signing(signing)
            .with_audit_info(audit_info),
    )
}

/// 构建审计信息
fn build_audit_info(
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
) -> AuditInfo {
    AuditInfo {
        created_at,
        created_by: created_by.map(UserId::from_uuid),
        updated_at,
        updated_by: updated_by.map(UserId::from_uuid),
    }
}

/// 客户证件列
pub fn customer_document_columns(
    customer: &Customer,
) -> (Option<&'static str>, Option<&str>, Option<NaiveDate>, Option<&str>) {
    match customer.kind() {
        CustomerKind::Person { document } => (
            document.doc_type.map(|t| t.as_str()),
            document.number.as_deref(),
            document.issue_date,
            document.issuer.as_deref(),
        ),
        CustomerKind::Company { .. } => (None, None, None, None),
    }
}
