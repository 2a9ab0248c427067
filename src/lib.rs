//! # Nutrition Provider Gateway
//!
//! Authenticates against the FatSecret platform API with OAuth2 client credentials,
//! proxies food and recipe lookups, and re-expresses food servings in Indian
//! reference portions with scaled nutrition values.
//!
//! Modules:
//! - `cache` — credential and its shared store
//! - `sources` — token issuance and the token manager
//! - `provider` — provider calls with single retry on authorization failure
//! - `serving` — dish classification and serving normalization
//! - `config` — settings, credentials, YAML loading
//! - `server` — HTTP surface

pub mod cache;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod observability;
pub mod provider;
pub mod server;
pub mod serving;
pub mod sources;
pub mod tests;
pub mod utils;

pub use crate::config::settings::ServiceConfig;
pub use crate::errors::{GatewayError, UpstreamFailure};
