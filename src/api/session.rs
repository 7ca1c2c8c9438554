//! Login session endpoints.

use axum::extract::State;

use super::{success, ApiJson, ApiResult};
use crate::auth;
use crate::models::{LoginRequest, SessionUser};
use crate::AppState;

/// POST /api/session - Log in with email and the shared password.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<SessionUser> {
    let user = auth::login(
        &state.repo,
        &state.config,
        &state.sessions,
        &request.email,
        &request.password,
    )
    .await?;
    success(user)
}

/// GET /api/session - The logged-in user, or null.
pub async fn current_session(State(state): State<AppState>) -> ApiResult<Option<SessionUser>> {
    success(state.sessions.load().await)
}

/// DELETE /api/session - Log out.
pub async fn logout(State(state): State<AppState>) -> ApiResult<()> {
    auth::logout(&state.sessions).await?;
    success(())
}
