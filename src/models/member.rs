//! Directory and login models backed by the Members and AuthorizedUsers sheets.

use serde::{Deserialize, Serialize};

/// A row of the member directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub work: String,
    pub birthday: String,
    pub class: String,
    pub city: String,
}

/// A person allowed to log in. Provisioned outside this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedUser {
    pub id: String,
    /// Trimmed and lowercased
    pub email: String,
    pub name: String,
    pub status: String,
    pub class: String,
}

/// The logged-in user persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub class: String,
    #[serde(default = "default_logged_in")]
    pub is_logged_in: bool,
}

fn default_logged_in() -> bool {
    true
}

impl From<&AuthorizedUser> for SessionUser {
    fn from(user: &AuthorizedUser) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
            class: user.class.clone(),
            is_logged_in: true,
        }
    }
}

/// Request body for logging in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
