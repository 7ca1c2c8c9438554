//! Spreadsheet-as-database access.
//!
//! The spreadsheets are the only source of truth; nothing here caches across calls.

pub mod dates;
pub mod ids;
pub mod mapper;
mod repository;
mod stats;

pub use repository::*;
