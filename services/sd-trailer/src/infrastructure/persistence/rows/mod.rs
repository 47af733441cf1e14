//! 数据库行映射结构

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// 物料数据库行
#[derive(Debug, FromRow)]
pub struct ItemRow {
    pub id: Uuid,
    pub item_type: String,
    pub article: Option<String>,
    pub name: String,
    pub body_length_mm: Option<i32>,
    pub body_width_mm: Option<i32>,
    pub board_height_mm: Option<i32>,
    pub axle_count: Option<i32>,
    pub wheel_radius: Option<String>,
    pub has_tent: Option<bool>,
    pub tent_height_mm: Option<i32>,
    pub has_jockey_wheel: Option<bool>,
    pub hub_type: Option<String>,
    pub size_external: Option<String>,
    pub size_body: Option<String>,
    pub unit: String,
    pub base_price: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

/// 挂车数据库行
#[derive(Debug, FromRow)]
pub struct TrailerRow {
    pub id: Uuid,
    pub vin: String,
    pub item_id: Uuid,
    pub warehouse_id: Uuid,
    pub manufacture_date: Option<NaiveDate>,
    pub status: String,
    pub comment: Option<String>,
    pub otts_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

/// 挂车列表行（关联型号和仓库）
#[derive(Debug, FromRow)]
pub struct TrailerSummaryRow {
    #[sqlx(flatten)]
    pub trailer: TrailerRow,
    pub article: Option<String>,
    pub item_name: String,
    pub warehouse_name: String,
}

/// 仓库数据库行
#[derive(Debug, FromRow)]
pub struct WarehouseRow {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
}

/// 客户数据库行
#[derive(Debug, FromRow)]
pub struct CustomerRow {
    pub id: Uuid,
    pub customer_type: String,
    pub name: String,
    pub iin_bin: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub doc_type: Option<String>,
    pub doc_number: Option<String>,
    pub doc_issue_date: Option<NaiveDate>,
    pub doc_issuer: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

/// OTTS 数据库行
#[derive(Debug, FromRow)]
pub struct OttsRow {
    pub id: Uuid,
    pub number: String,
    pub date: Option<NaiveDate>,
    pub modification: String,
    pub name: String,
    pub axle_count: i32,
    pub full_mass_kg: Option<i32>,
    pub is_active: bool,
}

/// 合同数据库行
#[derive(Debug, FromRow)]
pub struct ContractRow {
    pub id: Uuid,
    pub contract_number: Option<String>,
    pub contract_date: Option<NaiveDate>,
    pub customer_id: Option<Uuid>,
    pub trailer_id: Uuid,
    pub price: Option<Decimal>,
    pub payment_method: Option<String>,
    pub source: Option<String>,
    pub is_paid: bool,
    pub is_shipped: bool,
    pub sigex_state: String,
    pub sigex_document_id: Option<String>,
    pub sigex_operation_id: Option<String>,
    pub sigex_sign_id: Option<i64>,
    pub sigex_expire_at: Option<DateTime<Utc>>,
    pub sigex_last_status: Option<String>,
    pub sigex_last_sign_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}
