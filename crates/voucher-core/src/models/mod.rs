//! Data models for Voucher Sheet

mod row;
mod voucher;

pub use row::{CellValue, RowStyle, TableRow, COLUMN_COUNT, HEADER};
pub use voucher::{Voucher, VoucherId};
