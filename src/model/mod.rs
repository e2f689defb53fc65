pub mod worker;

use crate::db::TableSchema;

/// Every table the application owns, in creation order.
pub static TABLES: &[&TableSchema] = &[&worker::SCHEMA];
