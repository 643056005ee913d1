//! `SQLite` implementation of `TableStore`

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for row numbers

use rusqlite::{params, Connection, OptionalExtension};

use super::{fitted_widths, SheetLayout, TableStore};
use crate::error::{Error, Result};
use crate::models::{RowStyle, TableRow, COLUMN_COUNT};

/// Sheet row number of the header
const HEADER_ROW: i64 = 1;

/// Sheet stored in the `sheets` / `sheet_rows` / `sheet_columns` tables.
///
/// Borrows a connection so it can run inside a caller-owned transaction.
pub struct SqliteTableStore<'a> {
    conn: &'a Connection,
    name: String,
}

impl<'a> SqliteTableStore<'a> {
    /// Create a store for the named sheet on the given connection
    pub fn new(conn: &'a Connection, name: impl Into<String>) -> Self {
        Self {
            conn,
            name: name.into(),
        }
    }

    fn require_sheet(&self) -> Result<()> {
        if self.table_exists()? {
            Ok(())
        } else {
            Err(Error::Storage(format!(
                "sheet `{}` does not exist",
                self.name
            )))
        }
    }

    fn insert_row(&self, row_number: i64, row: &TableRow) -> Result<()> {
        let [c1, c2, c3, c4, c5] = &row.cells;
        let mut stmt = self.conn.prepare_cached(
            "INSERT OR REPLACE INTO sheet_rows
                (sheet, row_number, cell_1, cell_2, cell_3, cell_4, cell_5, background)
             VALUES (?, ?, ?, ?, ?, ?, ?, NULL)",
        )?;
        stmt.execute(params![self.name, row_number, c1, c2, c3, c4, c5])?;
        Ok(())
    }

    /// Parse a row from `cell_1..cell_5`
    fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TableRow> {
        Ok(TableRow::new([
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
        ]))
    }

    fn all_rows_with_header(&self) -> Result<Vec<TableRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT cell_1, cell_2, cell_3, cell_4, cell_5
             FROM sheet_rows
             WHERE sheet = ?
             ORDER BY row_number",
        )?;
        let rows = stmt
            .query_map(params![self.name], Self::parse_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

impl TableStore for SqliteTableStore<'_> {
    fn sheet_name(&self) -> &str {
        &self.name
    }

    fn table_exists(&self) -> Result<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sheets WHERE name = ?)",
            params![self.name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn ensure_initialized(&mut self) -> Result<bool> {
        if self.table_exists()? {
            return Ok(false);
        }

        self.conn.execute(
            "INSERT INTO sheets (name, header_bold, frozen_rows, created_at) VALUES (?, 1, 1, ?)",
            params![self.name, chrono::Utc::now().timestamp_millis()],
        )?;
        self.insert_row(HEADER_ROW, &TableRow::header())?;
        Ok(true)
    }

    fn data_row_count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sheet_rows WHERE sheet = ? AND row_number > ?",
            params![self.name, HEADER_ROW],
            |row| row.get(0),
        )?;
        usize::try_from(count).map_err(|_| Error::Storage(format!("invalid row count {count}")))
    }

    fn clear_data_rows(&mut self) -> Result<()> {
        self.require_sheet()?;
        self.conn.execute(
            "DELETE FROM sheet_rows WHERE sheet = ? AND row_number > ?",
            params![self.name, HEADER_ROW],
        )?;
        Ok(())
    }

    fn write_rows(&mut self, rows: &[TableRow]) -> Result<()> {
        self.require_sheet()?;
        for (index, row) in rows.iter().enumerate() {
            self.insert_row(HEADER_ROW + 1 + index as i64, row)?;
        }
        Ok(())
    }

    fn read_rows(&self) -> Result<Vec<TableRow>> {
        self.require_sheet()?;
        let mut stmt = self.conn.prepare(
            "SELECT cell_1, cell_2, cell_3, cell_4, cell_5
             FROM sheet_rows
             WHERE sheet = ? AND row_number > ?
             ORDER BY row_number",
        )?;
        let rows = stmt
            .query_map(params![self.name, HEADER_ROW], Self::parse_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn auto_resize_columns(&mut self) -> Result<()> {
        self.require_sheet()?;
        let widths = fitted_widths(&self.all_rows_with_header()?);

        let mut stmt = self.conn.prepare_cached(
            "INSERT OR REPLACE INTO sheet_columns (sheet, column_number, width) VALUES (?, ?, ?)",
        )?;
        for (index, width) in widths.iter().enumerate() {
            stmt.execute(params![self.name, index as i64 + 1, *width as i64])?;
        }
        Ok(())
    }

    fn style_row(&mut self, index: usize, style: RowStyle) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE sheet_rows SET background = ? WHERE sheet = ? AND row_number = ?",
            params![
                style.background(),
                self.name,
                HEADER_ROW + 1 + index as i64
            ],
        )?;
        if updated == 0 {
            return Err(Error::Storage(format!(
                "sheet `{}` has no data row {index}",
                self.name
            )));
        }
        Ok(())
    }

    fn row_style(&self, index: usize) -> Result<Option<RowStyle>> {
        let background: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT background FROM sheet_rows WHERE sheet = ? AND row_number = ?",
                params![self.name, HEADER_ROW + 1 + index as i64],
                |row| row.get(0),
            )
            .optional()?;
        Ok(background
            .flatten()
            .and_then(|color| RowStyle::from_background(&color)))
    }

    fn layout(&self) -> Result<Option<SheetLayout>> {
        let flags: Option<(bool, u32)> = self
            .conn
            .query_row(
                "SELECT header_bold, frozen_rows FROM sheets WHERE name = ?",
                params![self.name],
                |row| Ok((row.get::<_, i32>(0)? != 0, row.get(1)?)),
            )
            .optional()?;
        let Some((header_bold, frozen_rows)) = flags else {
            return Ok(None);
        };

        let mut column_widths = [0; COLUMN_COUNT];
        let mut stmt = self.conn.prepare(
            "SELECT column_number, width FROM sheet_columns WHERE sheet = ? ORDER BY column_number",
        )?;
        let stored = stmt
            .query_map(params![self.name], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        for (column_number, width) in stored {
            let slot = usize::try_from(column_number - 1)
                .ok()
                .and_then(|index| column_widths.get_mut(index));
            if let (Some(slot), Ok(width)) = (slot, usize::try_from(width)) {
                *slot = width;
            }
        }

        Ok(Some(SheetLayout {
            header_bold,
            frozen_rows,
            column_widths,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::CellValue;
    use pretty_assertions::assert_eq;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn row(cells: [CellValue; COLUMN_COUNT]) -> TableRow {
        TableRow::new(cells)
    }

    #[test]
    fn test_missing_sheet() {
        let db = setup();
        let store = SqliteTableStore::new(db.connection(), "Vouchers");

        assert!(!store.table_exists().unwrap());
        assert_eq!(store.data_row_count().unwrap(), 0);
        assert!(store.layout().unwrap().is_none());
        assert!(matches!(store.read_rows(), Err(Error::Storage(_))));
    }

    #[test]
    fn test_initialize_writes_styled_header() {
        let db = setup();
        let mut store = SqliteTableStore::new(db.connection(), "Vouchers");

        assert!(store.ensure_initialized().unwrap());
        assert!(!store.ensure_initialized().unwrap());

        assert_eq!(store.all_rows_with_header().unwrap(), vec![TableRow::header()]);
        assert_eq!(store.data_row_count().unwrap(), 0);
        let layout = store.layout().unwrap().unwrap();
        assert!(layout.header_bold);
        assert_eq!(layout.frozen_rows, 1);
    }

    #[test]
    fn test_cells_keep_storage_class() {
        let db = setup();
        let mut store = SqliteTableStore::new(db.connection(), "Vouchers");
        store.ensure_initialized().unwrap();

        let written = vec![
            row([
                CellValue::text("007"),
                CellValue::text("Spa Day"),
                CellValue::text("SPA"),
                CellValue::text("No"),
                CellValue::text(""),
            ]),
            row([
                CellValue::Integer(8),
                CellValue::Empty,
                CellValue::Float(1.5),
                CellValue::text("Yes"),
                CellValue::text("2/14/2026, 7:05:09 PM"),
            ]),
        ];
        store.write_rows(&written).unwrap();

        assert_eq!(store.read_rows().unwrap(), written);
    }

    #[test]
    fn test_clear_keeps_header() {
        let db = setup();
        let mut store = SqliteTableStore::new(db.connection(), "Vouchers");
        store.ensure_initialized().unwrap();
        store.write_rows(&[TableRow::default(), TableRow::default()]).unwrap();
        assert_eq!(store.data_row_count().unwrap(), 2);

        store.clear_data_rows().unwrap();
        assert_eq!(store.data_row_count().unwrap(), 0);
        assert_eq!(store.all_rows_with_header().unwrap(), vec![TableRow::header()]);
    }

    #[test]
    fn test_style_and_resize() {
        let db = setup();
        let mut store = SqliteTableStore::new(db.connection(), "Vouchers");
        store.ensure_initialized().unwrap();
        store
            .write_rows(&[row([
                CellValue::Integer(1),
                CellValue::text("A very long voucher title"),
                CellValue::text("C"),
                CellValue::text("Yes"),
                CellValue::text(""),
            ])])
            .unwrap();

        store.style_row(0, RowStyle::Redeemed).unwrap();
        assert_eq!(store.row_style(0).unwrap(), Some(RowStyle::Redeemed));
        assert_eq!(store.row_style(5).unwrap(), None);
        assert!(store.style_row(5, RowStyle::Pending).is_err());

        store.auto_resize_columns().unwrap();
        assert_eq!(
            store.layout().unwrap().unwrap().column_widths,
            [2, 25, 4, 8, 13]
        );
    }

    #[test]
    fn test_overwrite_drops_previous_style() {
        let db = setup();
        let mut store = SqliteTableStore::new(db.connection(), "Vouchers");
        store.ensure_initialized().unwrap();
        store.write_rows(&[TableRow::default()]).unwrap();
        store.style_row(0, RowStyle::Pending).unwrap();

        store.write_rows(&[TableRow::default()]).unwrap();
        assert_eq!(store.row_style(0).unwrap(), None);
    }

    #[test]
    fn test_sheets_are_independent() {
        let db = setup();
        let mut first = SqliteTableStore::new(db.connection(), "Vouchers");
        first.ensure_initialized().unwrap();
        first.write_rows(&[TableRow::default()]).unwrap();

        let second = SqliteTableStore::new(db.connection(), "Archive");
        assert!(!second.table_exists().unwrap());
        assert_eq!(first.data_row_count().unwrap(), 1);
    }
}
