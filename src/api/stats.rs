//! Home page statistics and sheet diagnostics.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::{ConnectionStatus, HomeStats};
use crate::AppState;

/// GET /api/stats - Counts and totals for the home page.
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<HomeStats> {
    success(state.repo.home_stats().await?)
}

/// GET /api/connections - Try reading every sheet.
pub async fn test_connections(State(state): State<AppState>) -> ApiResult<Vec<ConnectionStatus>> {
    success(state.repo.test_all_connections().await)
}
