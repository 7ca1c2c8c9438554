//! Support request and vote models.
//!
//! Votes reference support requests by a string id. Ids coming from callers may
//! be JSON numbers, so [`RequestId`] accepts both shapes and always renders as a string.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A community support request. Only approved requests are surfaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportRequest {
    /// Assigned by the id strategy, not read from the sheet's own ID column
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Display string, e.g. "₦500,000"
    pub amount: String,
    pub requested_by: String,
    pub requested_by_email: String,
    pub date: String,
    pub status: String,
}

/// One row of the Votes sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub support_request_id: String,
    /// Trimmed and lowercased
    pub user_email: String,
    pub user_name: String,
    pub comment: String,
    pub pledge_amount: f64,
    pub timestamp: String,
}

impl Vote {
    /// Whether this vote belongs to the given (already normalized) pair.
    pub fn matches(&self, request_id: &str, user_email: &str) -> bool {
        self.support_request_id == request_id && self.user_email == user_email
    }
}

/// A vote as shown under a support request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteComment {
    pub user_name: String,
    pub comment: String,
    pub pledge_amount: f64,
    pub timestamp: String,
}

impl From<&Vote> for VoteComment {
    fn from(vote: &Vote) -> Self {
        Self {
            user_name: vote.user_name.clone(),
            comment: vote.comment.clone(),
            pledge_amount: vote.pledge_amount,
            timestamp: vote.timestamp.clone(),
        }
    }
}

/// A support request joined with its votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportRequestWithVotes {
    #[serde(flatten)]
    pub request: SupportRequest,
    pub votes: usize,
    pub total_pledged: f64,
    pub comments: Vec<VoteComment>,
}

/// A support request id as sent by a caller: either a number or a string.
///
/// Integral floats such as `3.0` count as numbers. Anything that is neither a
/// number nor a string becomes an empty id, which the vote pipeline rejects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub enum RequestId {
    Number(i64),
    Text(String),
}

impl From<Value> for RequestId {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => RequestId::Number(i),
                (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    RequestId::Number(f as i64)
                }
                _ => RequestId::Text(n.to_string()),
            },
            Value::String(s) => RequestId::Text(s),
            _ => RequestId::Text(String::new()),
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Pledge as sent by a caller: free text ("50,000") or a JSON number.
///
/// Never fails to deserialize: `null`, booleans, arrays and objects all
/// become empty text, which parses as a zero pledge.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum PledgeInput {
    Number(f64),
    Text(String),
}

impl From<Value> for PledgeInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map(PledgeInput::Number).unwrap_or_default(),
            Value::String(s) => PledgeInput::Text(s),
            _ => PledgeInput::default(),
        }
    }
}

impl Default for PledgeInput {
    fn default() -> Self {
        PledgeInput::Text(String::new())
    }
}

/// Request body for supporting a request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVoteRequest {
    pub request_id: RequestId,
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub pledge_amount: PledgeInput,
}

/// How far a write is known to have landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WriteAck {
    /// The store answered with a readable success response
    Confirmed,
    /// No transport error was raised, but the response was opaque
    Optimistic,
}

/// Result of a successful vote submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub vote: Vote,
    pub ack: WriteAck,
}

/// Query parameters for the support request listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupportQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

/// Query parameters for a user's voted request ids.
#[derive(Debug, Clone, Deserialize)]
pub struct VotedQuery {
    pub email: String,
}
