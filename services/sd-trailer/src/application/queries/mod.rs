//! 查询模块

pub mod catalog_queries;
pub mod contract_queries;
pub mod trailer_queries;
pub mod workspace_queries;

pub use catalog_queries::*;
pub use contract_queries::*;
pub use trailer_queries::*;
pub use workspace_queries::*;
