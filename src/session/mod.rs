//! Session persistence.
//!
//! The logged-in user survives restarts in a small JSON file, stored under a
//! single well-known key. A missing or corrupt file means nobody is logged in.

use std::collections::HashMap;
use std::path::PathBuf;

use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::SessionUser;

/// Key the session user is stored under.
pub const SESSION_KEY: &str = "loyola_user";

/// The one session of this process.
///
/// This stands in for the browser's local storage, so it holds a single user
/// for every caller: a login from one client replaces the session seen by all
/// of them. It is not a per-client session store.
pub struct SessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[cfg(test)]
    fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// The stored user, if any.
    pub async fn load(&self) -> Option<SessionUser> {
        let _guard = self.lock.lock().await;
        self.read_entries().await.remove(SESSION_KEY).and_then(|value| {
            serde_json::from_value(value)
                .inspect_err(|e| tracing::warn!("Discarding malformed session: {}", e))
                .ok()
        })
    }

    pub async fn save(&self, user: &SessionUser) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await;
        let value = serde_json::to_value(user)
            .map_err(|e| AppError::Internal(format!("Cannot encode session: {}", e)))?;
        entries.insert(SESSION_KEY.to_string(), value);
        self.write_entries(&entries).await
    }

    /// Forget the stored user. Clearing an absent session succeeds.
    pub async fn clear(&self) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await;
        if entries.remove(SESSION_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries).await
    }

    async fn read_entries(&self) -> HashMap<String, serde_json::Value> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                tracing::warn!("Cannot read session file {:?}: {}", self.path, e);
                return HashMap::new();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!("Ignoring corrupt session file {:?}: {}", self.path, e);
            HashMap::new()
        })
    }

    async fn write_entries(
        &self,
        entries: &HashMap<String, serde_json::Value>,
    ) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(format!("Cannot create session dir: {}", e)))?;
        }

        let body = serde_json::to_vec_pretty(entries)
            .map_err(|e| AppError::Internal(format!("Cannot encode session: {}", e)))?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| AppError::Internal(format!("Cannot write session file: {}", e)))
    }
}
