//! 业务处理器

mod catalog_handler;
mod contract_handler;
mod customer_handler;
mod document_handler;
mod otts_handler;
mod signing_handler;
mod trailer_handler;
mod warehouse_handler;
mod workspace_handler;

pub use catalog_handler::{CatalogHandler, NO_MATCH_MESSAGE};
pub use contract_handler::ContractHandler;
pub use customer_handler::CustomerHandler;
pub use document_handler::{ContractContext, ContractDocumentHandler, RenderedDocument};
pub use otts_handler::OttsHandler;
pub use signing_handler::{SigningCoordinator, SigningSettings};
pub use trailer_handler::TrailerHandler;
pub use warehouse_handler::WarehouseHandler;
pub use workspace_handler::WorkspaceHandler;
