//! Data models for the alumni association site.
//!
//! Every entity is a value object rebuilt from the spreadsheet on each fetch.
//! Field names serialize as camelCase to match the front-end.

mod content;
mod member;
mod stats;
mod support;

pub use content::*;
pub use member::*;
pub use stats::*;
pub use support::*;
