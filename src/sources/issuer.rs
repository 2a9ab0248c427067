//! Token issuance
//!
//! One-shot client-credentials exchange against the provider's token endpoint.

use std::future::Future;

use http::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::config::credentials::ClientCredentials;
use crate::errors::{GatewayError, UpstreamFailure};
use crate::utils::constants::{GRANT_TYPE_CLIENT_CREDENTIALS, TOKEN_SCOPE};

static ISSUE_CONTEXT: &str = "Failed to obtain access token";

/// Token and lifetime returned by a successful issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    /// seconds; `None` when the provider omitted `expires_in`
    pub lifetime_seconds: Option<u64>,
}

pub trait IssueToken {
    fn issue(
        &self,
        credentials: &ClientCredentials,
    ) -> impl Future<Output = Result<IssuedToken, GatewayError>> + Send;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct OAuth2Issuer {
    client: Client,
    token_url: String,
}

impl OAuth2Issuer {
    pub fn new(client: Client, token_url: impl Into<String>) -> Self {
        Self { client, token_url: token_url.into() }
    }
}

impl IssueToken for OAuth2Issuer {
    async fn issue(&self, credentials: &ClientCredentials) -> Result<IssuedToken, GatewayError> {
        debug!(client_id = %credentials.client_id(), url = %self.token_url, "requesting access token");

        let response = self
            .client
            .post(&self.token_url)
            .header(AUTHORIZATION, credentials.basic_authorization())
            .form(&[("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS), ("scope", TOKEN_SCOPE)])
            .send()
            .await
            .map_err(|err| auth_failure(UpstreamFailure::from_transport(ISSUE_CONTEXT, &err)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| auth_failure(UpstreamFailure::from_transport(ISSUE_CONTEXT, &err)))?;

        if !status.is_success() {
            return Err(auth_failure(UpstreamFailure::from_response(ISSUE_CONTEXT, status, &body)));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|err| auth_failure(UpstreamFailure::malformed(ISSUE_CONTEXT, status, err, &body)))?;
        if token.access_token.is_empty() {
            return Err(auth_failure(UpstreamFailure::malformed(ISSUE_CONTEXT, status, "empty access_token", &body)));
        }

        Ok(IssuedToken {
            access_token: token.access_token,
            lifetime_seconds: token.expires_in,
        })
    }
}

fn auth_failure(failure: UpstreamFailure) -> GatewayError {
    error!(status = failure.status, "{}", failure.message);
    GatewayError::Auth(failure)
}
