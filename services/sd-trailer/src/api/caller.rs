//! 从网关请求头解析调用方身份

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use dealer_common::UserId;
use dealer_errors::AppError;
use tracing::debug;
use uuid::Uuid;

use crate::domain::value_objects::{CallerIdentity, CallerRole, WarehouseId};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ROLE_HEADER: &str = "x-user-role";
pub const WAREHOUSE_HEADER: &str = "x-warehouse-id";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, AppError> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(|v| Some(v.trim()).filter(|v| !v.is_empty()))
            .map_err(|_| AppError::validation(format!("Некорректный заголовок {}", name))),
    }
}

fn uuid_header(headers: &HeaderMap, name: &str) -> Result<Option<Uuid>, AppError> {
    header(headers, name)?
        .map(|raw| {
            Uuid::parse_str(raw).map_err(|_| AppError::validation(format!("Некорректный заголовок {}", name)))
        })
        .transpose()
}

/// 解析身份头；角色缺失视为未认证
pub fn caller_from_headers(headers: &HeaderMap) -> Result<CallerIdentity, AppError> {
    let role = header(headers, ROLE_HEADER)?
        .ok_or_else(|| AppError::unauthenticated("Не передана роль пользователя"))?
        .parse::<CallerRole>()
        .map_err(|e| AppError::forbidden(e.to_string()))?;
    let user_id = uuid_header(headers, USER_ID_HEADER)?.map(UserId::from_uuid);
    let warehouse_id = uuid_header(headers, WAREHOUSE_HEADER)?.map(WarehouseId::from_uuid);

    Ok(CallerIdentity::new(user_id, role, warehouse_id))
}

/// 身份中间件
///
/// 所有业务路由都要求调用方身份，解析结果放入请求扩展
pub async fn require_caller(mut request: Request, next: Next) -> Result<Response, AppError> {
    let caller = caller_from_headers(request.headers()).inspect_err(|e| {
        debug!(error = %e, uri = %request.uri(), "Caller identity rejected");
    })?;
    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<CallerIdentity>() {
            Some(caller) => Ok(caller.clone()),
            None => caller_from_headers(&parts.headers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_manager_with_warehouse() {
        let wh = Uuid::now_v7();
        let caller = caller_from_headers(&headers(&[
            (ROLE_HEADER, "Manager"),
            (WAREHOUSE_HEADER, &wh.to_string()),
            (USER_ID_HEADER, &Uuid::now_v7().to_string()),
        ]))
        .unwrap();
        assert!(caller.is_manager());
        assert_eq!(caller.warehouse_id(), Some(WarehouseId::from_uuid(wh)));
        assert!(caller.user_id().is_some());
    }

    #[test]
    fn test_missing_role_is_unauthenticated() {
        let err = caller_from_headers(&headers(&[])).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[test]
    fn test_bad_warehouse_header() {
        let err = caller_from_headers(&headers(&[(ROLE_HEADER, "admin"), (WAREHOUSE_HEADER, "abc")])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
