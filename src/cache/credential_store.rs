use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cache::credential::Credential;

/// Shared cell holding the current credential.
///
/// Writers always swap the whole [`Credential`], so readers either see the previous
/// token with its expiry or the new one with its expiry, never a mix of both.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Option<Credential>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the cached credential, usable or not
    pub async fn current(&self) -> Option<Credential> {
        self.inner.read().await.clone()
    }

    /// Cached credential if it is still outside the expiry buffer
    pub async fn get_usable(&self, buffer_seconds: u64) -> Option<Credential> {
        self.inner
            .read()
            .await
            .as_ref()
            .filter(|credential| credential.is_usable(buffer_seconds))
            .cloned()
    }

    pub async fn replace(&self, credential: Credential) {
        *self.inner.write().await = Some(credential);
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}
