use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::errors::CredentialsError;

/// Client id and secret used for the client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    /// Both values must be present and non-blank.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self, CredentialsError> {
        let client_id = client_id.into().trim().to_owned();
        let client_secret = client_secret.into().trim().to_owned();
        if client_id.is_empty() {
            return Err(CredentialsError::MissingClientId);
        }
        if client_secret.is_empty() {
            return Err(CredentialsError::MissingClientSecret);
        }
        Ok(Self { client_id, client_secret })
    }

    pub fn from_options(client_id: Option<String>, client_secret: Option<String>) -> Result<Self, CredentialsError> {
        Self::new(client_id.unwrap_or_default(), client_secret.unwrap_or_default())
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// `Authorization` header value for HTTP Basic auth.
    pub fn basic_authorization(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        format!("Basic {}", encoded)
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}
