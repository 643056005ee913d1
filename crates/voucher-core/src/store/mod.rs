//! Table storage port
//!
//! A [`TableStore`] is one named sheet: a fixed header row followed by
//! data rows, with per-row background styling and fitted column widths.
//! Data row indices are zero-based; index `0` is sheet row 2.

mod memory;
mod sqlite;

pub use memory::MemoryTableStore;
pub use sqlite::SqliteTableStore;

use crate::error::Result;
use crate::models::{RowStyle, TableRow, COLUMN_COUNT};

/// Presentation state of a sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    /// Header cells are bold
    pub header_bold: bool,
    /// Rows pinned at the top
    pub frozen_rows: u32,
    /// Column widths in characters, zero until first resize
    pub column_widths: [usize; COLUMN_COUNT],
}

/// Trait for sheet storage operations
pub trait TableStore {
    /// Name of the sheet this store operates on
    fn sheet_name(&self) -> &str;

    /// Whether the sheet has been created
    fn table_exists(&self) -> Result<bool>;

    /// Create the sheet with its styled header row if absent.
    ///
    /// Returns `true` when the sheet was created by this call.
    fn ensure_initialized(&mut self) -> Result<bool>;

    /// Number of rows below the header
    fn data_row_count(&self) -> Result<usize>;

    /// Remove every data row, keeping the header
    fn clear_data_rows(&mut self) -> Result<()>;

    /// Write rows starting at the first data row
    fn write_rows(&mut self, rows: &[TableRow]) -> Result<()>;

    /// Read all data rows in sheet order
    fn read_rows(&self) -> Result<Vec<TableRow>>;

    /// Fit every column to its widest cell, header included
    fn auto_resize_columns(&mut self) -> Result<()>;

    /// Set the background of one data row
    fn style_row(&mut self, index: usize, style: RowStyle) -> Result<()>;

    /// Style of one data row, if any was applied
    fn row_style(&self, index: usize) -> Result<Option<RowStyle>>;

    /// Presentation state, `None` when the sheet does not exist
    fn layout(&self) -> Result<Option<SheetLayout>>;
}

/// Widest cell per column across the given rows
pub(crate) fn fitted_widths<'a>(rows: impl IntoIterator<Item = &'a TableRow>) -> [usize; COLUMN_COUNT] {
    let mut widths = [0; COLUMN_COUNT];
    for row in rows {
        for (width, cell_width) in widths.iter_mut().zip(row.widths()) {
            *width = (*width).max(cell_width);
        }
    }
    widths
}
