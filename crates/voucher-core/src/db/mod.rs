//! Database layer for Voucher Sheet

mod connection;
mod migrations;

pub use connection::Database;
