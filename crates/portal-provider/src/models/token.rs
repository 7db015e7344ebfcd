//! OAuth2 token endpoint payloads

use portal_core::{AccessToken, IdentityId};
use serde::Deserialize;

/// Successful token endpoint response
#[derive(Deserialize)]
pub struct TokenResponseModel {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponseModel {
    /// Build the domain token owned by `identity_id`
    pub fn into_access_token(self, identity_id: IdentityId) -> AccessToken {
        let mut token = AccessToken::new(identity_id, self.access_token);
        if let Some(expires_in) = self.expires_in {
            token = token.with_expires_in(expires_in);
        }
        if let Some(refresh_token) = self.refresh_token {
            token = token.with_refresh_token(refresh_token);
        }
        token
    }
}

/// Error body returned by the token endpoint
#[derive(Debug, Deserialize)]
pub struct TokenErrorModel {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl TokenErrorModel {
    pub fn message(&self) -> String {
        match &self.error_description {
            Some(description) => format!("{}: {}", self.error, description),
            None => self.error.clone(),
        }
    }
}
