//! OAuth2 authorization-code client for the Microsoft identity platform.

use async_trait::async_trait;
use portal_common::{OAuthConfig, ProviderConfig};
use portal_core::{AccessToken, AuthError, IdentityId, IdentityProvider};
use reqwest::{header, Client, Url};

use crate::error::SetupError;
use crate::graph::body_preview;
use crate::models::{TokenErrorModel, TokenResponseModel};

/// Identity provider issuing delegated Graph tokens
#[derive(Debug, Clone)]
pub struct OAuthIdentityProvider {
    client: Client,
    config: OAuthConfig,
}

impl OAuthIdentityProvider {
    /// Build from configuration, reusing the provider request timeout
    ///
    /// # Errors
    ///
    /// Returns an error when the authority URL is malformed or the client
    /// cannot be built.
    pub fn from_config(config: OAuthConfig, provider: &ProviderConfig) -> Result<Self, SetupError> {
        // Fail at startup rather than on the first login
        Url::parse(&config.authorize_endpoint())?;
        let client = Client::builder()
            .timeout(provider.request_timeout())
            .build()?;
        Ok(Self { client, config })
    }

    fn credentials(&self) -> Result<(&str, &str), AuthError> {
        match (
            self.config.client_id.as_deref(),
            self.config.client_secret.as_deref(),
        ) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Ok((id, secret)),
            _ => Err(AuthError::NotConfigured),
        }
    }

    fn scope(&self) -> String {
        self.config.scopes.join(" ")
    }

    async fn request_token(
        &self,
        identity_id: &IdentityId,
        grant: &[(&str, &str)],
    ) -> Result<AccessToken, AuthError> {
        let (client_id, client_secret) = self.credentials()?;
        let scope = self.scope();

        let mut form: Vec<(&str, &str)> = vec![
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("scope", scope.as_str()),
        ];
        form.extend_from_slice(grant);

        let response = self
            .client
            .post(self.config.token_endpoint())
            .header(header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<TokenErrorModel>(body.as_ref()).map_or_else(
                |_| format!("status {}: {}", status.as_u16(), body_preview(body.as_ref())),
                |error| error.message(),
            );
            return if status.is_client_error() {
                Err(AuthError::Rejected(message))
            } else {
                Err(AuthError::Transport(message))
            };
        }

        let model: TokenResponseModel = serde_json::from_slice(body.as_ref())
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        Ok(model.into_access_token(identity_id.clone()))
    }
}

#[async_trait]
impl IdentityProvider for OAuthIdentityProvider {
    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        let (client_id, _) = self.credentials()?;
        let scope = self.scope();
        let url = Url::parse_with_params(
            &self.config.authorize_endpoint(),
            &[
                ("client_id", client_id),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_mode", "query"),
                ("scope", scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        Ok(url.into())
    }

    async fn exchange_code(
        &self,
        identity_id: &IdentityId,
        code: &str,
    ) -> Result<AccessToken, AuthError> {
        let token = self
            .request_token(
                identity_id,
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code),
                    ("redirect_uri", self.config.redirect_uri.as_str()),
                ],
            )
            .await?;

        tracing::info!(identity_id = %identity_id, "Exchanged authorization code");
        Ok(token)
    }

    async fn refresh(
        &self,
        identity_id: &IdentityId,
        refresh_token: &str,
    ) -> Result<AccessToken, AuthError> {
        let token = self
            .request_token(
                identity_id,
                &[("grant_type", "refresh_token"), ("refresh_token", refresh_token)],
            )
            .await?;

        tracing::debug!(identity_id = %identity_id, "Refreshed access token");
        Ok(token)
    }
}
