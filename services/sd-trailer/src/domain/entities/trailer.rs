//! 挂车实体（带 VIN 的具体车辆）

use chrono::NaiveDate;
use dealer_common::{AuditInfo, UserId};
use dealer_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::domain::enums::TrailerStatus;
use crate::domain::value_objects::{ItemId, OttsId, TrailerId, Vin, WarehouseId};

/// 挂车实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trailer {
    id: TrailerId,
    vin: Vin,
    /// 型号
    item_id: ItemId,
    warehouse_id: WarehouseId,
    manufacture_date: Option<NaiveDate>,
    status: TrailerStatus,
    comment: Option<String>,
    /// 由 VIN 修改码推断
    otts_id: Option<OttsId>,
    audit_info: AuditInfo,
}

impl Trailer {
    /// 入库创建
    ///
    /// 初始状态不能是 SOLD，SOLD 只由合同设置
    pub fn new(
        vin: Vin,
        item_id: ItemId,
        warehouse_id: WarehouseId,
        status: TrailerStatus,
        user_id: Option<UserId>,
    ) -> AppResult<Self> {
        ensure_not_sold(status)?;
        Ok(Self {
            id: TrailerId::new(),
            vin,
            item_id,
            warehouse_id,
            manufacture_date: None,
            status,
            comment: None,
            otts_id: None,
            audit_info: AuditInfo::new(user_id),
        })
    }

    /// 从存储恢复
    pub fn restore(
        id: TrailerId,
        vin: Vin,
        item_id: ItemId,
        warehouse_id: WarehouseId,
        status: TrailerStatus,
    ) -> Self {
        Self {
            id,
            vin,
            item_id,
            warehouse_id,
            manufacture_date: None,
            status,
            comment: None,
            otts_id: None,
            audit_info: AuditInfo::default(),
        }
    }

    // ========== Getters ==========

    pub fn id(&self) -> TrailerId {
        self.id
    }

    pub fn vin(&self) -> &Vin {
        &self.vin
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn manufacture_date(&self) -> Option<NaiveDate> {
        self.manufacture_date
    }

    pub fn status(&self) -> TrailerStatus {
        self.status
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn otts_id(&self) -> Option<OttsId> {
        self.otts_id
    }

    pub fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    // ========== Builders ==========

    pub fn with_manufacture_date(mut self, date: Option<NaiveDate>) -> Self {
        self.manufacture_date = date;
        self
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_otts(mut self, otts_id: Option<OttsId>) -> Self {
        self.otts_id = otts_id;
        self
    }

    pub fn with_audit_info(mut self, audit_info: AuditInfo) -> Self {
        self.audit_info = audit_info;
        self
    }

    /// 存储层保留或条件写入状态时使用
    pub(crate) fn with_status(mut self, status: TrailerStatus) -> Self {
        self.status = status;
        self
    }

    // ========== 业务操作 ==========

    /// 编辑挂车
    ///
    /// 已售挂车只能保持 SOLD；未售挂车不能通过编辑变为 SOLD
    #[allow(clippy::too_many_arguments)]
    pub fn revise(
        &mut self,
        vin: Vin,
        item_id: ItemId,
        warehouse_id: WarehouseId,
        manufacture_date: Option<NaiveDate>,
        status: TrailerStatus,
        comment: Option<String>,
        otts_id: Option<OttsId>,
        user_id: Option<UserId>,
    ) -> AppResult<()> {
        if self.status.is_sold() {
            if !status.is_sold() {
                return Err(AppError::invalid_state(
                    "Прицеп продан: статус меняется только через договор",
                ));
            }
        } else {
            ensure_not_sold(status)?;
        }

        self.vin = vin;
        self.item_id = item_id;
        self.warehouse_id = warehouse_id;
        self.manufacture_date = manufacture_date;
        self.status = status;
        self.comment = comment;
        self.otts_id = otts_id;
        self.audit_info.update(user_id);
        Ok(())
    }

    /// 合同创建或转入本车时调用
    pub fn mark_sold(&mut self, user_id: Option<UserId>) {
        self.status = TrailerStatus::Sold;
        self.audit_info.update(user_id);
    }

    /// 不再有合同引用时调用
    pub fn release(&mut self, user_id: Option<UserId>) {
        self.status = TrailerStatus::InStock;
        self.audit_info.update(user_id);
    }
}

fn ensure_not_sold(status: TrailerStatus) -> AppResult<()> {
    if status.is_sold() {
        return Err(AppError::validation(
            "Статус SOLD устанавливается только при оформлении договора",
        ));
    }
    Ok(())
}

/// 列表视图：挂车及其型号、仓库名称
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailerSummary {
    pub trailer: Trailer,
    pub article: Option<String>,
    pub item_name: String,
    pub warehouse_name: String,
}

/// 挂车列表过滤条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrailerFilter {
    /// VIN 子串（不区分大小写）
    pub vin: Option<String>,
    /// article 子串（不区分大小写）
    pub article: Option<String>,
    pub status: Option<TrailerStatus>,
    pub warehouse_id: Option<WarehouseId>,
    /// 排除该状态（工作台用于过滤已售）
    pub exclude_status: Option<TrailerStatus>,
}

impl TrailerFilter {
    pub fn matches(&self, summary: &TrailerSummary) -> bool {
        let trailer = &summary.trailer;
        contains_ci(self.vin.as_deref(), Some(trailer.vin().as_str()))
            && contains_ci(self.article.as_deref(), summary.article.as_deref())
            && self.status.is_none_or(|s| trailer.status() == s)
            && self.warehouse_id.is_none_or(|w| trailer.warehouse_id() == w)
            && self.exclude_status.is_none_or(|s| trailer.status() != s)
    }
}

fn contains_ci(needle: Option<&str>, haystack: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => haystack
            .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false),
    }
}
