// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use httpmock::Method::POST;
use httpmock::{Mock, MockServer};
use reqwest::Client;

use crate::config::credentials::ClientCredentials;
use crate::config::settings::SettingsConfig;
use crate::errors::{GatewayError, UpstreamFailure};
use crate::provider::{build_gateway, FatSecretGateway};
use crate::sources::issuer::{IssueToken, IssuedToken};

pub const TOKEN_PATH: &str = "/connect/token";
pub const API_PATH: &str = "/rest/server.api";
/// base64("client:secret")
pub const BASIC_AUTH: &str = "Basic Y2xpZW50OnNlY3JldA==";

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn test_credentials() -> ClientCredentials {
    ClientCredentials::new("client", "secret").unwrap()
}

/// Settings pointing both provider endpoints at the mock server.
pub fn mock_settings(server: &MockServer) -> SettingsConfig {
    let mut settings = SettingsConfig::default();
    settings.provider.token_url = server.url(TOKEN_PATH);
    settings.provider.api_url = server.url(API_PATH);
    settings.request_timeout_ms = Some(5_000);
    settings
}

pub fn mock_gateway(server: &MockServer) -> FatSecretGateway {
    build_gateway(&mock_settings(server), test_credentials()).unwrap()
}

/// Token endpoint answering every client-credentials request with `token`.
pub async fn mock_token_endpoint<'a>(server: &'a MockServer, token: &str, expires_in: u64) -> Mock<'a> {
    let body = json!({"access_token": token, "expires_in": expires_in, "token_type": "Bearer"});
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(TOKEN_PATH)
                .header("authorization", BASIC_AUTH)
                .body_includes("grant_type=client_credentials")
                .body_includes("scope=basic");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body);
        })
        .await
}

/// In-memory issuer counting how often it was asked for a token.
#[derive(Debug, Clone, Default)]
pub struct CountingIssuer {
    pub calls: Arc<AtomicUsize>,
    pub lifetime_seconds: Option<u64>,
    pub fail: bool,
    /// add the call index to the lifetime so every issuance is distinguishable
    pub vary_lifetime: bool,
}

impl CountingIssuer {
    pub fn with_lifetime(lifetime_seconds: Option<u64>) -> Self {
        Self { lifetime_seconds, ..Default::default() }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IssueToken for CountingIssuer {
    async fn issue(&self, _credentials: &ClientCredentials) -> Result<IssuedToken, GatewayError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) as u64;
        if self.fail {
            return Err(GatewayError::Auth(UpstreamFailure {
                status: 401,
                message: "Failed to obtain access token (HTTP 401 Unauthorized): invalid_client".into(),
                detail: Some(json!({"error": "invalid_client"})),
            }));
        }
        let lifetime_seconds = match (self.lifetime_seconds, self.vary_lifetime) {
            (Some(lifetime), true) => Some(lifetime + n),
            (lifetime, _) => lifetime,
        };
        Ok(IssuedToken { access_token: format!("token-{}", n), lifetime_seconds })
    }
}
