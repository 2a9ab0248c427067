pub mod gateway;
pub mod operations;
pub mod request;

use reqwest::Client;
use std::time::Duration;

use crate::cache::credential_store::CredentialStore;
use crate::config::credentials::ClientCredentials;
use crate::config::settings::SettingsConfig;
use crate::sources::issuer::OAuth2Issuer;
use crate::sources::token_manager::TokenManager;

pub use gateway::ProviderGateway;
pub use operations::{FoodSearch, RecipeSearch, TrendingRecipes};
pub use request::{ParamValue, ProviderRequest};

pub type FatSecretGateway = ProviderGateway<OAuth2Issuer>;

/// Wire the HTTP client, issuer, token manager and gateway from settings.
pub fn build_gateway(settings: &SettingsConfig, credentials: ClientCredentials) -> anyhow::Result<FatSecretGateway> {
    let client = Client::builder()
        .timeout(Duration::from_millis(settings.request_timeout_ms()))
        .build()?;
    let issuer = OAuth2Issuer::new(client.clone(), settings.provider.token_url.clone());
    let tokens = TokenManager::new(
        issuer,
        credentials,
        CredentialStore::new(),
        settings.expiry_buffer_seconds(),
    );
    Ok(ProviderGateway::new(client, settings.provider.api_url.clone(), tokens))
}
