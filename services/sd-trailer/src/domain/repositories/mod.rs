//! 仓储接口

mod contract_repository;
mod customer_repository;
mod item_repository;
mod otts_repository;
mod trailer_repository;
mod warehouse_repository;

pub use contract_repository::{stale_signing, ContractRepository};
pub use customer_repository::CustomerRepository;
pub use item_repository::ItemRepository;
pub use otts_repository::OttsRepository;
pub use trailer_repository::{stale_trailer_status, TrailerRepository};
pub use warehouse_repository::WarehouseRepository;
