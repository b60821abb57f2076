// SPDX-License-Identifier: MIT

//! Session-token persistence, the client-side localStorage analog.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::fs;

use crate::flow::error::SessionError;
use crate::flow::ports::TokenStore;

/// Stores the token as a plain file, `~/.medilink/token` by default,
/// overridable through `MEDILINK_TOKEN_FILE`.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn from_env() -> Self {
        let path = std::env::var("MEDILINK_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".medilink")
                    .join("token")
            });
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn store(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, token).await?;
        log::info!("session token stored at {}", self.path.display());
        Ok(())
    }

    async fn load(&self) -> Result<String, SessionError> {
        match fs::read_to_string(&self.path).await {
            Ok(token) => {
                let token = token.trim().to_string();
                if token.is_empty() {
                    Err(SessionError::NoToken)
                } else {
                    Ok(token)
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SessionError::NoToken),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn store(&self, token: &str) -> Result<(), SessionError> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    async fn load(&self) -> Result<String, SessionError> {
        self.token
            .lock()
            .unwrap()
            .clone()
            .ok_or(SessionError::NoToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join("medilink-tests")
            .join(format!("{}-{}", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let path = scratch_path("round-trip");
        let store = FileTokenStore::at(&path);

        store.store("tok-abc").await.unwrap();
        assert_eq!(store.load().await.unwrap(), "tok-abc");

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_file_store_missing_token() {
        let store = FileTokenStore::at(scratch_path("never-written"));
        assert!(matches!(store.load().await, Err(SessionError::NoToken)));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryTokenStore::new();
        assert!(matches!(store.load().await, Err(SessionError::NoToken)));

        store.store("tok-xyz").await.unwrap();
        assert_eq!(store.load().await.unwrap(), "tok-xyz");
    }
}
