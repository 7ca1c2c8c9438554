//! Support request and voting endpoints.

use axum::extract::State;

use super::{success, ApiJson, ApiQuery, ApiResult};
use crate::errors::AppError;
use crate::models::{SubmitVoteRequest, SupportQuery, SupportRequestWithVotes, VoteReceipt, VotedQuery};
use crate::votes::aggregate::{filter_category, rank_by_votes};
use crate::AppState;

/// GET /api/support - Approved requests with vote tallies.
///
/// `category` keeps one category; `sort=votes` ranks by vote count.
pub async fn list_support_requests(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SupportQuery>,
) -> ApiResult<Vec<SupportRequestWithVotes>> {
    let board = state.votes.support_board().await?;

    let mut items = match query.category.as_deref() {
        Some(category) => filter_category(board, category),
        None => board,
    };
    if query.sort.as_deref() == Some("votes") {
        rank_by_votes(&mut items);
    }

    success(items)
}

/// POST /api/support/votes - Vote for a request, with an optional pledge.
pub async fn submit_vote(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SubmitVoteRequest>,
) -> ApiResult<VoteReceipt> {
    success(state.votes.submit_vote(&request).await?)
}

/// GET /api/support/votes?email= - Ids of requests the user has voted for.
pub async fn list_voted_requests(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<VotedQuery>,
) -> ApiResult<Vec<String>> {
    if query.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }
    success(state.votes.voted_request_ids(&query.email).await?)
}
