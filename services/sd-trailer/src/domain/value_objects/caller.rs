//! 调用方身份
//!
//! 由 API 层从网关请求头中解析，显式传入每个与可见性相关的查询

use dealer_common::UserId;
use dealer_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::WarehouseId;
use crate::domain::enums::UnknownVariant;

/// 调用方角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallerRole {
    Admin,
    Manager,
}

impl FromStr for CallerRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(CallerRole::Admin),
            "manager" => Ok(CallerRole::Manager),
            _ => Err(UnknownVariant::new("角色", s)),
        }
    }
}

/// 调用方身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    user_id: Option<UserId>,
    role: CallerRole,
    warehouse_id: Option<WarehouseId>,
}

impl CallerIdentity {
    pub fn new(user_id: Option<UserId>, role: CallerRole, warehouse_id: Option<WarehouseId>) -> Self {
        Self {
            user_id,
            role,
            warehouse_id,
        }
    }

    pub fn admin(user_id: Option<UserId>) -> Self {
        Self::new(user_id, CallerRole::Admin, None)
    }

    pub fn manager(user_id: Option<UserId>, warehouse_id: Option<WarehouseId>) -> Self {
        Self::new(user_id, CallerRole::Manager, warehouse_id)
    }

    // ========== Getters ==========

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn role(&self) -> CallerRole {
        self.role
    }

    pub fn warehouse_id(&self) -> Option<WarehouseId> {
        self.warehouse_id
    }

    pub fn is_admin(&self) -> bool {
        self.role == CallerRole::Admin
    }

    pub fn is_manager(&self) -> bool {
        self.role == CallerRole::Manager
    }

    // ========== 可见性 ==========

    /// 列表查询的仓库限制：绑定了仓库的经理只能看到本仓库
    pub fn warehouse_scope(&self) -> Option<WarehouseId> {
        if self.is_manager() {
            self.warehouse_id
        } else {
            None
        }
    }

    /// 是否可以修改指定仓库中的挂车
    pub fn can_manage_warehouse(&self, warehouse_id: WarehouseId) -> bool {
        match self.role {
            CallerRole::Admin => true,
            CallerRole::Manager => self.warehouse_id == Some(warehouse_id),
        }
    }

    /// 仅管理员可执行的操作（仓库维护、删除 OTTS）
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Доступно только администратору"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(" Admin ".parse::<CallerRole>().unwrap(), CallerRole::Admin);
        assert_eq!("manager".parse::<CallerRole>().unwrap(), CallerRole::Manager);
        assert!("director".parse::<CallerRole>().is_err());
    }

    #[test]
    fn test_warehouse_scope() {
        let wh = WarehouseId::new();
        assert_eq!(CallerIdentity::admin(None).warehouse_scope(), None);
        assert_eq!(CallerIdentity::manager(None, Some(wh)).warehouse_scope(), Some(wh));
        assert_eq!(CallerIdentity::manager(None, None).warehouse_scope(), None);
    }

    #[test]
    fn test_can_manage_warehouse() {
        let own = WarehouseId::new();
        let other = WarehouseId::new();
        let manager = CallerIdentity::manager(None, Some(own));
        assert!(manager.can_manage_warehouse(own));
        assert!(!manager.can_manage_warehouse(other));
        assert!(CallerIdentity::admin(None).can_manage_warehouse(other));
    }

    #[test]
    fn test_require_admin() {
        assert!(CallerIdentity::admin(None).require_admin().is_ok());
        assert!(matches!(
            CallerIdentity::manager(None, None).require_admin(),
            Err(AppError::Forbidden(_))
        ));
    }
}
