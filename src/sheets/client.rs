//! HTTP client for the spreadsheet values API.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde_json::{json, Value};

use super::{RawRows, SheetReader, ValueRange, VoteWriter};
use crate::config::{Config, SheetConfig};
use crate::errors::AppError;
use crate::models::{Vote, WriteAck};

/// Reads ranges with `GET {base}/{id}/values/{range}?key=...`.
#[derive(Clone)]
pub struct SheetsClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl SheetsClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.sheets_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// `{base}/{spreadsheet_id}/values/{range}{suffix}` with the API key attached.
    fn values_url(&self, sheet: &SheetConfig, suffix: &str) -> Result<Url, AppError> {
        if !sheet.is_configured() {
            return Err(AppError::NotConfigured(format!(
                "No spreadsheet configured for range {}",
                sheet.range
            )));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::Internal(format!("Invalid sheets base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Sheets base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(&sheet.spreadsheet_id)
            .push("values")
            .push(&format!("{}{}", sheet.range, suffix));

        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    /// Append one row to the end of a range.
    pub async fn append_row(
        &self,
        sheet: &SheetConfig,
        row: Vec<String>,
    ) -> Result<Value, AppError> {
        let mut url = self.values_url(sheet, ":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");

        let response = self
            .http
            .post(url)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        let response = ensure_success(response).await?;

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl SheetReader for SheetsClient {
    async fn read_rows(&self, sheet: &SheetConfig) -> Result<RawRows, AppError> {
        let url = self.values_url(sheet, "")?;
        tracing::debug!("Reading range {} of {}", sheet.range, sheet.spreadsheet_id);

        let response = self.http.get(url).send().await?;
        let response = ensure_success(response).await?;
        let range: ValueRange = response.json().await?;

        Ok(range.into_rows())
    }
}

/// Turn a non-2xx response into a transport error, using the API's
/// `{ "error": { "message": ... } }` body when there is one.
async fn ensure_success(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.json::<Value>().await.ok();
    let message = body
        .as_ref()
        .and_then(|b| b.pointer("/error/message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Spreadsheet API returned {}", status));

    tracing::warn!("Spreadsheet API error ({}): {}", status, message);
    Err(AppError::Transport(message))
}

/// Writes votes through the values `:append` endpoint. The sheet must be
/// writable with the configured key.
pub struct AppendVoteWriter {
    client: SheetsClient,
    sheet: SheetConfig,
}

impl AppendVoteWriter {
    pub fn new(client: SheetsClient, sheet: SheetConfig) -> Self {
        Self { client, sheet }
    }
}

/// Column order of the Votes sheet.
pub fn vote_to_row(vote: &Vote) -> Vec<String> {
    vec![
        vote.support_request_id.clone(),
        vote.user_email.clone(),
        vote.user_name.clone(),
        vote.comment.clone(),
        vote.pledge_amount.to_string(),
        vote.timestamp.clone(),
    ]
}

#[async_trait]
impl VoteWriter for AppendVoteWriter {
    async fn append_vote(&self, vote: &Vote) -> Result<WriteAck, AppError> {
        let body = self.client.append_row(&self.sheet, vote_to_row(vote)).await?;
        tracing::debug!(
            "Appended vote, updated range {:?}",
            body.pointer("/updates/updatedRange")
        );
        Ok(WriteAck::Confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn client_with(pairs: &[(&str, &str)]) -> SheetsClient {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let config = Config::from_vars(|key| vars.get(key).cloned());
        SheetsClient::new(&config).unwrap()
    }

    #[test]
    fn test_values_url_encodes_range_and_key() {
        let client = client_with(&[
            ("ALUMNI_SHEETS_BASE_URL", "http://127.0.0.1:9999/v4/spreadsheets/"),
            ("ALUMNI_SHEETS_API_KEY", "abc"),
        ]);
        let sheet = SheetConfig::new("sheet-id", "Support Votes!A:F");

        let url = client.values_url(&sheet, "").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9999/v4/spreadsheets/sheet-id/values/Support%20Votes!A:F?key=abc"
        );

        let url = client.values_url(&sheet, ":append").unwrap();
        assert!(url.path().ends_with("/values/Support%20Votes!A:F:append"));
    }

    #[test]
    fn test_unconfigured_sheet_is_rejected() {
        let client = client_with(&[]);
        let err = client
            .values_url(&SheetConfig::new("", "Sheet1!A:D"), "")
            .unwrap_err();
        assert!(matches!(err, AppError::NotConfigured(_)));
    }

    #[test]
    fn test_vote_to_row_column_order() {
        let vote = Vote {
            support_request_id: "2".into(),
            user_email: "a@x.com".into(),
            user_name: "Ada".into(),
            comment: "Count me in".into(),
            pledge_amount: 5000.0,
            timestamp: "2024-02-01T10:00:00Z".into(),
        };
        assert_eq!(
            vote_to_row(&vote),
            vec!["2", "a@x.com", "Ada", "Count me in", "5000", "2024-02-01T10:00:00Z"]
        );
    }
}
