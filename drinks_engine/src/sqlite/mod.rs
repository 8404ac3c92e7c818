//! SQLite backend for the drinks catalog.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
