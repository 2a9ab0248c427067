use tracing::{debug, info};

use crate::cache::credential::Credential;
use crate::cache::credential_store::CredentialStore;
use crate::config::credentials::ClientCredentials;
use crate::errors::GatewayError;
use crate::helpers::time::now_u64;
use crate::observability::metrics::{get_metrics, ERROR_MSG, SUCCESS_MSG};
use crate::sources::issuer::IssueToken;

/// Hands out a token that is valid at the moment of return.
///
/// A cached token is reused until it enters the expiry buffer; after that the next
/// caller re-issues. Concurrent callers may both re-issue, the last write wins.
#[derive(Debug)]
pub struct TokenManager<I> {
    issuer: I,
    credentials: ClientCredentials,
    store: CredentialStore,
    buffer_seconds: u64,
}

impl<I> TokenManager<I>
where
    I: IssueToken + Send + Sync,
{
    pub fn new(issuer: I, credentials: ClientCredentials, store: CredentialStore, buffer_seconds: u64) -> Self {
        Self { issuer, credentials, store, buffer_seconds }
    }

    pub async fn get_token(&self) -> Result<String, GatewayError> {
        self.get_credential().await.map(|credential| credential.token)
    }

    /// Like [`get_token`](Self::get_token) but also exposes the expiry.
    pub async fn get_credential(&self) -> Result<Credential, GatewayError> {
        if let Some(credential) = self.store.get_usable(self.buffer_seconds).await {
            get_metrics().await.token_cache_hits.inc();
            return Ok(credential);
        }
        self.refresh().await
    }

    /// Drop the cached credential so the next call re-issues.
    pub async fn invalidate(&self) {
        debug!("invalidating cached access token");
        self.store.clear().await;
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    async fn refresh(&self) -> Result<Credential, GatewayError> {
        let metrics = get_metrics().await;
        let issued_at = now_u64();
        let issued = self
            .issuer
            .issue(&self.credentials)
            .await
            .inspect_err(|_| metrics.token_issuance.with_label_values(&[ERROR_MSG]).inc())?;

        let credential = Credential::issued(
            issued.access_token,
            issued_at,
            issued.lifetime_seconds.unwrap_or(0),
        );
        self.store.replace(credential.clone()).await;

        metrics.token_issuance.with_label_values(&[SUCCESS_MSG]).inc();
        metrics.token_expiry_unix.set(credential.expires_at_unix_ts as i64);
        info!(
            expires_at = credential.expires_at_unix_ts,
            token_len = credential.token.len(),
            "access token issued"
        );
        Ok(credential)
    }
}
