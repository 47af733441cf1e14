//! 命令模块

pub mod contract_commands;
pub mod customer_commands;
pub mod item_commands;
pub mod otts_commands;
pub mod signing_commands;
pub mod trailer_commands;
pub mod warehouse_commands;

pub use contract_commands::*;
pub use customer_commands::*;
pub use item_commands::*;
pub use otts_commands::*;
pub use signing_commands::*;
pub use trailer_commands::*;
pub use warehouse_commands::*;
