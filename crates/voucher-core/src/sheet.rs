//! Sync and load operations over a [`TableStore`]

use crate::error::Result;
use crate::models::{TableRow, Voucher};
use crate::store::TableStore;

/// Sheet name used when none is configured
pub const DEFAULT_SHEET_NAME: &str = "Vouchers";

/// Result of reading a sheet back
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The sheet has never been created
    NoSheet,
    /// The sheet holds only its header row
    NoData,
    /// Data rows mapped back to vouchers, in sheet order
    Loaded(Vec<Voucher>),
}

impl LoadOutcome {
    /// Status message reported alongside the vouchers, if any
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::NoSheet => Some("No sheet found"),
            Self::NoData => Some("No data in sheet"),
            Self::Loaded(_) => None,
        }
    }

    /// The loaded vouchers, empty for the no-data outcomes
    pub fn into_vouchers(self) -> Vec<Voucher> {
        match self {
            Self::NoSheet | Self::NoData => Vec::new(),
            Self::Loaded(vouchers) => vouchers,
        }
    }
}

/// Replace every data row of the sheet with `vouchers`.
///
/// All rows are mapped before the store is touched, so a malformed
/// redemption date leaves the sheet as it was. Returns the number of rows
/// written.
pub fn sync_vouchers<S>(store: &mut S, vouchers: &[Voucher]) -> Result<usize>
where
    S: TableStore + ?Sized,
{
    tracing::info!(
        sheet = store.sheet_name(),
        count = vouchers.len(),
        "Starting voucher sync"
    );

    let rows = vouchers
        .iter()
        .map(TableRow::from_voucher)
        .collect::<Result<Vec<_>>>()?;

    if store.ensure_initialized()? {
        tracing::info!(sheet = store.sheet_name(), "Created sheet with header row");
    }

    let existing = store.data_row_count()?;
    if existing > 0 {
        tracing::debug!(
            sheet = store.sheet_name(),
            rows = existing,
            "Clearing existing data rows"
        );
        store.clear_data_rows()?;
    }

    if !rows.is_empty() {
        store.write_rows(&rows)?;
        store.auto_resize_columns()?;
        for (index, row) in rows.iter().enumerate() {
            store.style_row(index, row.style())?;
        }
    }

    tracing::info!(
        sheet = store.sheet_name(),
        count = rows.len(),
        "Synced vouchers"
    );
    Ok(rows.len())
}

/// Read every data row back as vouchers
pub fn load_vouchers<S>(store: &S) -> Result<LoadOutcome>
where
    S: TableStore + ?Sized,
{
    if !store.table_exists()? {
        tracing::info!(sheet = store.sheet_name(), "No sheet found");
        return Ok(LoadOutcome::NoSheet);
    }

    if store.data_row_count()? == 0 {
        tracing::info!(sheet = store.sheet_name(), "Sheet has only its header row");
        return Ok(LoadOutcome::NoData);
    }

    let vouchers = store
        .read_rows()?
        .iter()
        .map(TableRow::to_voucher)
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        sheet = store.sheet_name(),
        count = vouchers.len(),
        "Loaded vouchers"
    );
    Ok(LoadOutcome::Loaded(vouchers))
}
