//! Database connection management

use rusqlite::{Connection, TransactionBehavior};
use std::path::Path;

use super::migrations;
use crate::error::Result;
use crate::models::Voucher;
use crate::sheet::{self, LoadOutcome};
use crate::store::SqliteTableStore;

/// Database wrapper for a `SQLite` connection
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        let database = Self { conn };
        database.configure()?;
        database.migrate()?;
        tracing::debug!("Opened database at {}", path.as_ref().display());
        Ok(database)
    }

    /// Open an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let database = Self { conn };
        database.configure()?;
        database.migrate()?;
        Ok(database)
    }

    /// Configure `SQLite` pragmas
    fn configure(&self) -> Result<()> {
        // In-memory databases refuse WAL; keep their default journal.
        self.conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })
            .ok();
        self.conn.pragma_update(None, "synchronous", "NORMAL")?;
        self.conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        migrations::run(&self.conn)
    }

    /// Get a reference to the underlying connection
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Replace the named sheet's data rows with `vouchers`.
    ///
    /// Sheet creation, clearing, writing and styling commit together; any
    /// failure leaves the previous contents in place.
    pub fn sync_vouchers(&mut self, sheet_name: &str, vouchers: &[Voucher]) -> Result<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let written = {
            let mut store = SqliteTableStore::new(&tx, sheet_name);
            sheet::sync_vouchers(&mut store, vouchers)?
        };
        tx.commit()?;
        Ok(written)
    }

    /// Read the named sheet back as vouchers
    pub fn load_vouchers(&self, sheet_name: &str) -> Result<LoadOutcome> {
        let store = SqliteTableStore::new(&self.conn, sheet_name);
        sheet::load_vouchers(&store)
    }
}
