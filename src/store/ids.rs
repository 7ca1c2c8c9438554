//! Id assignment for mapped rows.
//!
//! Sheets have no primary keys. By default an entity's id is its 1-based
//! position among the data rows, which changes when rows are inserted, moved or
//! deleted. [`IdColumn`] uses an `ID` column when the sheet has one.

use std::sync::Arc;

use crate::config::IdStrategyKind;

/// Where a row sits and what its `ID` column holds, if the sheet has one.
#[derive(Debug, Clone, Copy)]
pub struct RowKey<'a> {
    /// 1-based index among data rows, counted before any filtering
    pub position: usize,
    pub id_cell: Option<&'a str>,
}

pub trait IdStrategy: Send + Sync {
    fn assign(&self, key: RowKey<'_>) -> String;
}

/// Row position, ignoring any id column.
#[derive(Debug, Default, Clone, Copy)]
pub struct RowPosition;

impl IdStrategy for RowPosition {
    fn assign(&self, key: RowKey<'_>) -> String {
        key.position.to_string()
    }
}

/// The `ID` column when present and non-empty, else row position.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdColumn;

impl IdStrategy for IdColumn {
    fn assign(&self, key: RowKey<'_>) -> String {
        match key.id_cell.map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => key.position.to_string(),
        }
    }
}

pub fn strategy_for(kind: IdStrategyKind) -> Arc<dyn IdStrategy> {
    match kind {
        IdStrategyKind::RowPosition => Arc::new(RowPosition),
        IdStrategyKind::IdColumn => Arc::new(IdColumn),
    }
}
