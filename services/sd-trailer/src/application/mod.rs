//! 应用层
//!
//! 命令、查询和各业务处理器

pub mod commands;
pub mod handlers;
pub mod queries;

pub use commands::*;
pub use handlers::*;
pub use queries::*;
