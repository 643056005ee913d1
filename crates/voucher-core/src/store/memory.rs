//! In-memory `TableStore`, used in tests and for throwaway sheets

use super::{fitted_widths, SheetLayout, TableStore};
use crate::error::{Error, Result};
use crate::models::{RowStyle, TableRow, COLUMN_COUNT};

#[derive(Debug, Clone)]
struct MemorySheet {
    header: TableRow,
    layout: SheetLayout,
    rows: Vec<(TableRow, Option<RowStyle>)>,
}

/// Sheet held entirely in process memory
#[derive(Debug, Clone)]
pub struct MemoryTableStore {
    name: String,
    sheet: Option<MemorySheet>,
}

impl MemoryTableStore {
    /// Create a store for a sheet that does not exist yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheet: None,
        }
    }

    fn sheet(&self) -> Result<&MemorySheet> {
        self.sheet.as_ref().ok_or_else(|| self.missing())
    }

    fn sheet_mut(&mut self) -> Result<&mut MemorySheet> {
        let missing = self.missing();
        self.sheet.as_mut().ok_or(missing)
    }

    fn missing(&self) -> Error {
        Error::Storage(format!("sheet `{}` does not exist", self.name))
    }
}

impl TableStore for MemoryTableStore {
    fn sheet_name(&self) -> &str {
        &self.name
    }

    fn table_exists(&self) -> Result<bool> {
        Ok(self.sheet.is_some())
    }

    fn ensure_initialized(&mut self) -> Result<bool> {
        if self.sheet.is_some() {
            return Ok(false);
        }
        self.sheet = Some(MemorySheet {
            header: TableRow::header(),
            layout: SheetLayout {
                header_bold: true,
                frozen_rows: 1,
                column_widths: [0; COLUMN_COUNT],
            },
            rows: Vec::new(),
        });
        Ok(true)
    }

    fn data_row_count(&self) -> Result<usize> {
        Ok(self.sheet.as_ref().map_or(0, |sheet| sheet.rows.len()))
    }

    fn clear_data_rows(&mut self) -> Result<()> {
        self.sheet_mut()?.rows.clear();
        Ok(())
    }

    fn write_rows(&mut self, rows: &[TableRow]) -> Result<()> {
        let sheet = self.sheet_mut()?;
        for (index, row) in rows.iter().enumerate() {
            match sheet.rows.get_mut(index) {
                Some(existing) => *existing = (row.clone(), None),
                None => sheet.rows.push((row.clone(), None)),
            }
        }
        Ok(())
    }

    fn read_rows(&self) -> Result<Vec<TableRow>> {
        Ok(self.sheet()?.rows.iter().map(|(row, _)| row.clone()).collect())
    }

    fn auto_resize_columns(&mut self) -> Result<()> {
        let sheet = self.sheet_mut()?;
        let widths = fitted_widths(
            std::iter::once(&sheet.header).chain(sheet.rows.iter().map(|(row, _)| row)),
        );
        sheet.layout.column_widths = widths;
        Ok(())
    }

    fn style_row(&mut self, index: usize, style: RowStyle) -> Result<()> {
        let name = self.name.clone();
        let slot = self
            .sheet_mut()?
            .rows
            .get_mut(index)
            .ok_or_else(|| Error::Storage(format!("sheet `{name}` has no data row {index}")))?;
        slot.1 = Some(style);
        Ok(())
    }

    fn row_style(&self, index: usize) -> Result<Option<RowStyle>> {
        Ok(self
            .sheet()?
            .rows
            .get(index)
            .and_then(|(_, style)| *style))
    }

    fn layout(&self) -> Result<Option<SheetLayout>> {
        Ok(self.sheet.as_ref().map(|sheet| sheet.layout.clone()))
    }
}
