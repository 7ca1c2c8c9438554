//! Voting and pledging: the aggregate join, the duplicate guard, the pending
//! overlay and the submission pipeline.

pub mod aggregate;
pub mod guard;
pub mod overlay;
mod pipeline;

pub use pipeline::*;
