//! 实体模块

mod customer;
mod item;
mod otts;
mod sales_contract;
mod signing;
mod trailer;
mod warehouse;

pub use customer::{Customer, CustomerIdentityKey, CustomerKind, CustomerSpec, IdentityDocument};
pub use item::{Item, ItemSpec, DEFAULT_UNIT};
pub use otts::{Otts, OttsSpec};
pub use sales_contract::{contract_list_order, ContractFilter, ContractTerms, SalesContract, SOURCE_MANUAL};
pub use signing::{SigningError, SigningRecord, SigningState, STATUS_ORG_SIGNED, STATUS_QR_STARTED};
pub use trailer::{Trailer, TrailerFilter, TrailerSummary};
pub use warehouse::Warehouse;
