//! Vote submission.
//!
//! A submission is validated, checked against the pending overlay, checked
//! again against a fresh read of the Votes sheet, and only then written.
//!
//! Submissions inside this process are serialized, so two concurrent requests
//! for the same pair cannot both pass the guard. The store itself has no
//! transactions: a vote written by another client between our read and our
//! append is not seen, and a duplicate can land. That race is accepted.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tokio::sync::{Mutex, RwLock};

use super::aggregate;
use super::guard::{has_voted, VoteKey};
use super::overlay::PendingVotes;
use crate::errors::AppError;
use crate::models::{
    PledgeInput, SubmitVoteRequest, SupportRequestWithVotes, Vote, VoteReceipt, WriteAck,
};
use crate::sheets::VoteWriter;
use crate::store::mapper::parse_pledge;
use crate::store::Repository;

pub const ALREADY_SUPPORTED: &str = "You have already supported this request";

/// Pledge amount from caller input; never rejects, only zeroes.
pub fn pledge_amount(input: &PledgeInput) -> f64 {
    match input {
        PledgeInput::Number(n) if n.is_finite() && *n >= 0.0 => *n,
        PledgeInput::Number(_) => 0.0,
        PledgeInput::Text(text) => parse_pledge(text),
    }
}

/// Votes over a swappable write transport, with a pending overlay for
/// optimistic tallies.
pub struct VoteService {
    repo: Repository,
    writer: Arc<dyn VoteWriter>,
    pending: RwLock<PendingVotes>,
    submit_lock: Mutex<()>,
}

impl VoteService {
    pub fn new(repo: Repository, writer: Arc<dyn VoteWriter>) -> Self {
        Self {
            repo,
            writer,
            pending: RwLock::new(PendingVotes::new()),
            submit_lock: Mutex::new(()),
        }
    }

    /// Validate and append one vote.
    pub async fn submit_vote(&self, request: &SubmitVoteRequest) -> Result<VoteReceipt, AppError> {
        let key = VoteKey::new(&request.request_id, &request.user_email);
        let comment = request.comment.trim();

        if key.request_id.is_empty() {
            return Err(AppError::Validation("Support request id is required".to_string()));
        }
        if key.user_email.is_empty() {
            return Err(AppError::Validation("User email is required".to_string()));
        }
        if comment.is_empty() {
            return Err(AppError::Validation("Comment is required".to_string()));
        }

        let _guard = self.submit_lock.lock().await;

        if self.pending.read().await.contains(&key) {
            tracing::info!("Duplicate vote for request {} (pending)", key.request_id);
            return Err(AppError::DuplicateVote(ALREADY_SUPPORTED.to_string()));
        }

        let votes = self.repo.fetch_votes().await?;
        if has_voted(&votes, &key.request_id, &key.user_email) {
            tracing::info!("Duplicate vote for request {}", key.request_id);
            return Err(AppError::DuplicateVote(ALREADY_SUPPORTED.to_string()));
        }

        let vote = Vote {
            support_request_id: key.request_id,
            user_email: key.user_email,
            user_name: request.user_name.trim().to_string(),
            comment: comment.to_string(),
            pledge_amount: pledge_amount(&request.pledge_amount),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let ack = self.writer.append_vote(&vote).await?;
        match ack {
            WriteAck::Confirmed => tracing::info!(
                "Vote recorded for request {} (pledge {})",
                vote.support_request_id,
                vote.pledge_amount
            ),
            WriteAck::Optimistic => tracing::info!(
                "Vote sent for request {} (pledge {}), awaiting sheet",
                vote.support_request_id,
                vote.pledge_amount
            ),
        }

        self.pending.write().await.record(vote.clone());
        Ok(VoteReceipt { vote, ack })
    }

    /// Approved requests with confirmed votes plus pending ones.
    pub async fn support_board(&self) -> Result<Vec<SupportRequestWithVotes>, AppError> {
        let (requests, votes) = tokio::try_join!(
            self.repo.fetch_support_requests(),
            self.repo.fetch_votes()
        )?;
        let merged = self.pending.write().await.merge(votes);
        Ok(aggregate::join_votes(requests, &merged))
    }

    /// Request ids the user has voted for, pending votes included.
    pub async fn voted_request_ids(&self, user_email: &str) -> Result<Vec<String>, AppError> {
        let mut ids = self.repo.voted_request_ids(user_email).await?;
        let key_email = VoteKey::new("", user_email).user_email;
        for vote in self.pending.read().await.votes() {
            if vote.user_email == key_email && !ids.contains(&vote.support_request_id) {
                ids.push(vote.support_request_id.clone());
            }
        }
        Ok(ids)
    }

    #[cfg(test)]
    async fn pending_votes(&self) -> Vec<Vote> {
        self.pending.read().await.votes().to_vec()
    }
}
