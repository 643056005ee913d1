//! voucher-core - Core library for Voucher Sheet
//!
//! This crate contains the voucher model, the mapping between vouchers and
//! sheet rows, the table storage port with its `SQLite` and in-memory
//! implementations, and the sync/load operations used by the HTTP service.

pub mod dates;
pub mod db;
pub mod error;
pub mod models;
pub mod sheet;
pub mod store;

pub use db::Database;
pub use error::{Error, Result};
pub use models::{CellValue, RowStyle, TableRow, Voucher, VoucherId};
pub use sheet::{load_vouchers, sync_vouchers, LoadOutcome, DEFAULT_SHEET_NAME};
pub use store::{MemoryTableStore, SqliteTableStore, TableStore};
