//! Spreadsheet transports.
//!
//! Reads go through a [`SheetReader`]; vote writes go through a [`VoteWriter`].
//! The writer can be the values `:append` endpoint or an opaque proxy, and the
//! vote guard and aggregator do not care which one is configured.

mod client;
mod proxy;

#[cfg(test)]
pub mod memory;

pub use client::*;
pub use proxy::*;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::config::{Config, SheetConfig};
use crate::errors::AppError;
use crate::models::{Vote, WriteAck};

/// Raw rows of a sheet, header included, every cell stringified.
pub type RawRows = Vec<Vec<String>>;

/// Read access to spreadsheet ranges.
#[async_trait]
pub trait SheetReader: Send + Sync {
    async fn read_rows(&self, sheet: &SheetConfig) -> Result<RawRows, AppError>;
}

/// Write path for new votes.
#[async_trait]
pub trait VoteWriter: Send + Sync {
    async fn append_vote(&self, vote: &Vote) -> Result<WriteAck, AppError>;
}

/// Body of a values read: `{ "values": [[...], ...] }`. A sheet with no data omits `values`.
#[derive(Debug, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    pub fn into_rows(self) -> RawRows {
        self.values
            .into_iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect()
    }
}

/// Stringify a cell the way the sheet displays it.
pub fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Build the read transport and the configured vote writer.
pub fn build_transports(
    config: &Config,
) -> Result<(Arc<dyn SheetReader>, Arc<dyn VoteWriter>), AppError> {
    let client = SheetsClient::new(config)?;

    let writer: Arc<dyn VoteWriter> = match &config.vote_proxy_url {
        Some(url) => {
            tracing::info!("Votes are written through proxy {}", url);
            Arc::new(ProxyVoteWriter::new(client.http().clone(), url.clone()))
        }
        None => {
            tracing::info!("Votes are appended directly to the votes sheet");
            Arc::new(AppendVoteWriter::new(client.clone(), config.votes_sheet.clone()))
        }
    };

    Ok((Arc::new(client), writer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_range_stringifies_cells() {
        let range: ValueRange = serde_json::from_value(json!({
            "values": [["ID", "Featured"], [7, true, null, "x"]]
        }))
        .unwrap();

        assert_eq!(
            range.into_rows(),
            vec![
                vec!["ID".to_string(), "Featured".to_string()],
                vec!["7".to_string(), "TRUE".to_string(), String::new(), "x".to_string()],
            ]
        );
    }

    #[test]
    fn test_missing_values_is_empty_sheet() {
        let range: ValueRange = serde_json::from_value(json!({ "range": "Sheet1!A1:D1" })).unwrap();
        assert!(range.into_rows().is_empty());
    }
}
