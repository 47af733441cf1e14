//! HTTP API（/api/v1）

mod caller;
mod catalog;
mod contracts;
mod customers;
mod state;
mod trailers;
mod warehouses;
mod workspace;

use std::fmt::Display;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{middleware, Json, Router};
use serde::Serialize;

pub use caller::{caller_from_headers, require_caller, ROLE_HEADER, USER_ID_HEADER, WAREHOUSE_HEADER};
pub use state::AppState;

use crate::application::handlers::RenderedDocument;

/// 业务路由
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(catalog::routes())
        .merge(trailers::routes())
        .merge(warehouses::routes())
        .merge(customers::routes())
        .merge(contracts::routes())
        .merge(workspace::routes())
        .layer(middleware::from_fn(caller::require_caller));

    Router::new().nest("/api/v1", api).with_state(state)
}

/// 创建成功后返回的 ID
#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
}

impl Created {
    pub fn response(id: impl Display) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Json(Self { id: id.to_string() }))
    }
}

/// 以 application/pdf 返回文档
pub fn pdf_response(document: RenderedDocument) -> Response {
    let mut response = (
        [(CONTENT_TYPE, HeaderValue::from_static("application/pdf"))],
        document.bytes,
    )
        .into_response();
    if let Ok(value) = HeaderValue::from_str(&format!("inline; filename=\"{}\"", document.file_name)) {
        response.headers_mut().insert(CONTENT_DISPOSITION, value);
    }
    response
}
