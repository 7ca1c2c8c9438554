//! Shared-password login.
//!
//! Members sign in with their email plus one password shared by the whole
//! association. The password check is constant-time; the email must belong
//! to an active authorized user.

use subtle::ConstantTimeEq;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::SessionUser;
use crate::session::SessionStore;
use crate::store::Repository;

/// Check credentials and persist the session.
///
/// The password is checked before the Auth sheet is read, so a wrong
/// password never costs a round trip.
pub async fn login(
    repo: &Repository,
    config: &Config,
    sessions: &SessionStore,
    email: &str,
    password: &str,
) -> Result<SessionUser, AppError> {
    if email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }
    if config.shared_password.is_empty() {
        return Err(AppError::NotConfigured(
            "No shared password configured (ALUMNI_SHARED_PASSWORD)".to_string(),
        ));
    }
    if !constant_time_compare(password, &config.shared_password) {
        tracing::info!("Login rejected: invalid password");
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let Some(user) = repo.verify_user(email).await? else {
        tracing::info!("Login rejected: email not authorized");
        return Err(AppError::Unauthorized(
            "Email not found in authorized users".to_string(),
        ));
    };

    let session = SessionUser::from(&user);
    sessions.save(&session).await?;
    tracing::info!("User logged in: {}", session.email);
    Ok(session)
}

pub async fn logout(sessions: &SessionStore) -> Result<(), AppError> {
    sessions.clear().await?;
    tracing::info!("User logged out");
    Ok(())
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
