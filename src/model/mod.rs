//! Database models module
//!
//! All database entity structs are consolidated in models.rs,
//! with table.rs holding the typed table handle used by the DAO layer.

mod models;
mod table;

pub use models::*;
pub use table::Table;
