//! 值对象模块

mod caller;
mod contract_number;
mod email;
mod ids;
mod match_criteria;
mod vin;

pub use caller::{CallerIdentity, CallerRole};
pub use contract_number::next_contract_number;
pub use email::{Email, EmailError};
pub use ids::{ContractId, CustomerId, ItemId, OttsId, TrailerId, WarehouseId};
pub use match_criteria::{FeatureQuery, MatchCriteria, TentSelector};
pub use vin::{modification_code, Vin, VinError};
