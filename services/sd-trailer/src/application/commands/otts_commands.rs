//! OTTS 命令

use crate::domain::entities::OttsSpec;
use crate::domain::value_objects::{CallerIdentity, OttsId};

#[derive(Debug, Clone)]
pub struct CreateOttsCommand {
    pub caller: CallerIdentity,
    pub spec: OttsSpec,
}

#[derive(Debug, Clone)]
pub struct UpdateOttsCommand {
    pub otts_id: OttsId,
    pub caller: CallerIdentity,
    pub spec: OttsSpec,
}

#[derive(Debug, Clone)]
pub struct DeleteOttsCommand {
    pub otts_id: OttsId,
    pub caller: CallerIdentity,
}
