//! Database migrations

use crate::error::Result;
use rusqlite::Connection;

/// Current schema version
const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations
pub fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn)?;

    if version < 1 {
        migrate_v1(conn)?;
    }
    if version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// Get the current schema version
fn get_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

/// Migration to version 1: sheets and their rows.
///
/// Cell columns carry no declared type so values keep the storage class
/// they were written with (a text `"007"` id stays text).
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );
        CREATE TABLE IF NOT EXISTS sheets (
            name TEXT PRIMARY KEY,
            header_bold INTEGER NOT NULL DEFAULT 0,
            frozen_rows INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS sheet_rows (
            sheet TEXT NOT NULL REFERENCES sheets(name) ON DELETE CASCADE,
            row_number INTEGER NOT NULL,
            cell_1,
            cell_2,
            cell_3,
            cell_4,
            cell_5,
            background TEXT,
            PRIMARY KEY (sheet, row_number)
        );
        INSERT INTO schema_version (version) VALUES (1);
        COMMIT;",
    )?;

    tracing::debug!("Applied migration v1");
    Ok(())
}

/// Migration to version 2: fitted column widths
fn migrate_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;
        CREATE TABLE IF NOT EXISTS sheet_columns (
            sheet TEXT NOT NULL REFERENCES sheets(name) ON DELETE CASCADE,
            column_number INTEGER NOT NULL,
            width INTEGER NOT NULL,
            PRIMARY KEY (sheet, column_number)
        );
        INSERT INTO schema_version (version) VALUES (2);
        COMMIT;",
    )?;

    tracing::debug!("Applied migration v2, schema at v{CURRENT_VERSION}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_reach_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        assert_eq!(get_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let versions: i32 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, CURRENT_VERSION);
    }
}
