//! Member and executive directory endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::{Executive, Member};
use crate::AppState;

/// GET /api/members - The alumni directory, in sheet order.
pub async fn list_members(State(state): State<AppState>) -> ApiResult<Vec<Member>> {
    success(state.repo.fetch_members().await?)
}

/// GET /api/executives - Executives, president first.
pub async fn list_executives(State(state): State<AppState>) -> ApiResult<Vec<Executive>> {
    success(state.repo.fetch_executives().await?)
}
