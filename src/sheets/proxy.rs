//! Vote writes through an opaque proxy (e.g. a script web app that owns the
//! credentials for the Votes sheet).
//!
//! The proxy's response body is never read, so a successful call only means
//! that no transport error occurred. Writes through here are acknowledged as
//! [`WriteAck::Optimistic`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::VoteWriter;
use crate::errors::AppError;
use crate::models::{Vote, WriteAck};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProxyVoteBody<'a> {
    support_request_id: &'a str,
    user_email: &'a str,
    user_name: &'a str,
    comment: &'a str,
    pledge_amount: f64,
}

pub struct ProxyVoteWriter {
    http: Client,
    url: String,
}

impl ProxyVoteWriter {
    pub fn new(http: Client, url: String) -> Self {
        Self { http, url }
    }
}

#[async_trait]
impl VoteWriter for ProxyVoteWriter {
    async fn append_vote(&self, vote: &Vote) -> Result<WriteAck, AppError> {
        let body = ProxyVoteBody {
            support_request_id: &vote.support_request_id,
            user_email: &vote.user_email,
            user_name: &vote.user_name,
            comment: &vote.comment,
            pledge_amount: vote.pledge_amount,
        };

        let response = self.http.post(&self.url).json(&body).send().await?;

        // The body is opaque, but a status we can see is still worth reporting.
        if response.status().is_client_error() || response.status().is_server_error() {
            tracing::warn!("Vote proxy answered {}", response.status());
            return Err(AppError::Transport(format!(
                "Vote proxy returned {}",
                response.status()
            )));
        }

        Ok(WriteAck::Optimistic)
    }
}
