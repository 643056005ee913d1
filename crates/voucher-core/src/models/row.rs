//! Sheet row model and the voucher <-> row mapping

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use std::fmt;

use super::voucher::{Voucher, VoucherId};
use crate::dates;
use crate::error::{Error, Result};

/// Number of columns in a voucher sheet
pub const COLUMN_COUNT: usize = 5;

/// Fixed header row
pub const HEADER: [&str; COLUMN_COUNT] = ["ID", "Title", "Code", "Redeemed", "Redeemed Date"];

const REDEEMED_YES: &str = "Yes";
const REDEEMED_NO: &str = "No";

/// A single typed cell value
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Build a text cell
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// True for blank cells and empty text
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(value) => value.is_empty(),
            Self::Integer(_) | Self::Float(_) => false,
        }
    }

    /// Cell content as the sheet would display it
    pub fn display_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&VoucherId> for CellValue {
    fn from(id: &VoucherId) -> Self {
        match id {
            VoucherId::Integer(value) => Self::Integer(*value),
            VoucherId::Float(value) => Self::Float(*value),
            VoucherId::Text(value) => Self::Text(value.clone()),
        }
    }
}

impl From<CellValue> for VoucherId {
    fn from(cell: CellValue) -> Self {
        match cell {
            CellValue::Empty => Self::default(),
            CellValue::Integer(value) => Self::Integer(value),
            CellValue::Float(value) => Self::Float(value),
            CellValue::Text(value) => Self::Text(value),
        }
    }
}

impl ToSql for CellValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Empty => ToSqlOutput::from(rusqlite::types::Null),
            Self::Integer(value) => ToSqlOutput::from(*value),
            Self::Float(value) => ToSqlOutput::from(*value),
            Self::Text(value) => ToSqlOutput::from(value.as_str()),
        })
    }
}

impl FromSql for CellValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Self::Empty),
            ValueRef::Integer(value) => Ok(Self::Integer(value)),
            ValueRef::Real(value) => Ok(Self::Float(value)),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(|text| Self::Text(text.to_string()))
                .map_err(|err| FromSqlError::Other(Box::new(err))),
            ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

/// Background highlight applied to a data row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Redeemed,
    Pending,
}

impl RowStyle {
    /// Background color for this style
    pub const fn background(self) -> &'static str {
        match self {
            Self::Redeemed => "#ffcccc",
            Self::Pending => "#ccffcc",
        }
    }

    /// Reverse lookup from a stored background color
    pub fn from_background(color: &str) -> Option<Self> {
        match color {
            "#ffcccc" => Some(Self::Redeemed),
            "#ccffcc" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// One data row of a voucher sheet, in column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    pub cells: [CellValue; COLUMN_COUNT],
}

impl TableRow {
    /// Create a row from its five cells
    pub const fn new(cells: [CellValue; COLUMN_COUNT]) -> Self {
        Self { cells }
    }

    /// The header row as text cells
    pub fn header() -> Self {
        Self::new(HEADER.map(CellValue::text))
    }

    /// Map a voucher to its persisted row.
    ///
    /// Fails only when the redemption timestamp cannot be parsed.
    pub fn from_voucher(voucher: &Voucher) -> Result<Self> {
        let redeemed_date = if voucher.has_redeemed_date() {
            CellValue::Text(dates::to_sheet_text(&voucher.redeemed_date)?)
        } else {
            CellValue::text("")
        };

        Ok(Self::new([
            CellValue::from(&voucher.id),
            CellValue::text(voucher.title.as_str()),
            CellValue::text(voucher.code.as_str()),
            CellValue::text(if voucher.redeemed {
                REDEEMED_YES
            } else {
                REDEEMED_NO
            }),
            redeemed_date,
        ]))
    }

    /// Map a persisted row back to a voucher
    pub fn to_voucher(&self) -> Result<Voucher> {
        let [id, title, code, redeemed, redeemed_date] = self.cells.clone();

        let redeemed_date = if redeemed_date.is_blank() {
            String::new()
        } else {
            dates::to_wire_text(&redeemed_date.display_text()).map_err(|err| match err {
                Error::InvalidDate(detail) => {
                    Error::InvalidDate(format!("stored redeemed date: {detail}"))
                }
                other => other,
            })?
        };

        Ok(Voucher {
            id: id.into(),
            title: title.display_text(),
            code: code.display_text(),
            redeemed: matches!(&redeemed, CellValue::Text(value) if value == REDEEMED_YES),
            redeemed_date,
        })
    }

    /// Whether the `Redeemed` column reads `Yes`
    pub fn is_redeemed(&self) -> bool {
        matches!(&self.cells[3], CellValue::Text(value) if value == REDEEMED_YES)
    }

    /// Highlight for this row
    pub fn style(&self) -> RowStyle {
        if self.is_redeemed() {
            RowStyle::Redeemed
        } else {
            RowStyle::Pending
        }
    }

    /// Display width of each cell in characters
    pub fn widths(&self) -> [usize; COLUMN_COUNT] {
        let mut widths = [0; COLUMN_COUNT];
        for (width, cell) in widths.iter_mut().zip(&self.cells) {
            *width = cell.display_text().chars().count();
        }
        widths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_voucher_to_row() {
        let voucher = Voucher::new(1, "Free Coffee", "ABC123");
        let row = TableRow::from_voucher(&voucher).unwrap();

        assert_eq!(
            row.cells,
            [
                CellValue::Integer(1),
                CellValue::text("Free Coffee"),
                CellValue::text("ABC123"),
                CellValue::text("No"),
                CellValue::text(""),
            ]
        );
        assert_eq!(row.style(), RowStyle::Pending);
    }

    #[test]
    fn test_redeemed_voucher_to_row() {
        let voucher = Voucher::new("v1", "Dinner", "XYZ").redeemed_at("2026-02-14T19:05:09.000Z");
        let row = TableRow::from_voucher(&voucher).unwrap();

        assert_eq!(row.cells[3], CellValue::text("Yes"));
        assert_eq!(row.cells[4], CellValue::text("2/14/2026, 7:05:09 PM"));
        assert_eq!(row.style(), RowStyle::Redeemed);
    }

    #[test]
    fn test_date_without_redeemed_flag_is_kept() {
        let mut voucher = Voucher::new(2, "Movie", "M1");
        voucher.redeemed_date = "2026-02-14".to_string();
        let row = TableRow::from_voucher(&voucher).unwrap();

        assert_eq!(row.cells[3], CellValue::text("No"));
        assert_eq!(row.cells[4], CellValue::text("2/14/2026, 12:00:00 AM"));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let voucher = Voucher::new(1, "Bad", "B").redeemed_at("not a date");
        assert!(matches!(
            TableRow::from_voucher(&voucher),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn test_row_to_voucher() {
        let row = TableRow::new([
            CellValue::Integer(7),
            CellValue::text("Breakfast"),
            CellValue::text("BRK"),
            CellValue::text("Yes"),
            CellValue::text("2/14/2026, 7:05:09 PM"),
        ]);

        assert_eq!(
            row.to_voucher().unwrap(),
            Voucher::new(7, "Breakfast", "BRK").redeemed_at("2026-02-14T19:05:09.000Z")
        );
    }

    #[test]
    fn test_blank_cells_become_empty_strings() {
        let row = TableRow::default();
        assert_eq!(row.to_voucher().unwrap(), Voucher::default());
    }

    #[test]
    fn test_only_exact_yes_is_redeemed() {
        let mut row = TableRow::default();
        row.cells[3] = CellValue::text("yes");
        assert!(!row.to_voucher().unwrap().redeemed);
        assert_eq!(row.style(), RowStyle::Pending);
    }

    #[test]
    fn test_corrupt_stored_date_fails() {
        let mut row = TableRow::default();
        row.cells[4] = CellValue::text("Invalid Date");
        let err = row.to_voucher().unwrap_err();
        assert!(err.to_string().contains("stored redeemed date"));
    }

    #[test]
    fn test_row_style_colors() {
        assert_eq!(RowStyle::Redeemed.background(), "#ffcccc");
        assert_eq!(RowStyle::Pending.background(), "#ccffcc");
        assert_eq!(RowStyle::from_background("#ccffcc"), Some(RowStyle::Pending));
        assert_eq!(RowStyle::from_background("#ffffff"), None);
    }

    #[test]
    fn test_header_widths() {
        assert_eq!(TableRow::header().widths(), [2, 5, 4, 8, 13]);
    }
}
