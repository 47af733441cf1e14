//! PostgreSQL 持久化实现

mod converters;
mod postgres_contract_repository;
mod postgres_customer_repository;
mod postgres_item_repository;
mod postgres_otts_repository;
mod postgres_trailer_repository;
mod postgres_unit_of_work;
mod postgres_warehouse_repository;
mod rows;

pub use postgres_contract_repository::PostgresContractRepository;
pub use postgres_customer_repository::PostgresCustomerRepository;
pub use postgres_item_repository::PostgresItemRepository;
pub use postgres_otts_repository::PostgresOttsRepository;
pub use postgres_trailer_repository::PostgresTrailerRepository;
pub use postgres_unit_of_work::{PostgresUnitOfWork, PostgresUnitOfWorkFactory};
pub use postgres_warehouse_repository::PostgresWarehouseRepository;
