//! Token service
//!
//! Stores provider tokens per identity, drives the authorization-code login,
//! and hands out usable tokens (refreshing expired ones when possible).

use portal_core::{AccessToken, DomainError, IdentityId, ProviderError};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Token service
pub struct TokenService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TokenService<'a> {
    /// Create a new TokenService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Store a token obtained outside the login flow
    #[instrument(skip(self, access_token, refresh_token))]
    pub async fn store_token(
        &self,
        identity_id: &IdentityId,
        access_token: String,
        expires_in: Option<i64>,
        refresh_token: Option<String>,
    ) -> ServiceResult<()> {
        if access_token.trim().is_empty() {
            return Err(ServiceError::validation("access_token must not be empty"));
        }

        let mut token = AccessToken::new(identity_id.clone(), access_token);
        if let Some(seconds) = expires_in {
            token = token.with_expires_in(seconds);
        }
        if let Some(refresh_token) = refresh_token.filter(|t| !t.is_empty()) {
            token = token.with_refresh_token(refresh_token);
        }

        self.ctx.token_store().put(identity_id, token).await?;

        info!(identity_id = %identity_id, "Access token stored");
        Ok(())
    }

    /// Forget the identity's token; succeeds whether or not one was stored
    #[instrument(skip(self))]
    pub async fn logout(&self, identity_id: &IdentityId) -> ServiceResult<()> {
        self.ctx.token_store().remove(identity_id).await?;
        info!(identity_id = %identity_id, "Logged out");
        Ok(())
    }

    /// A usable token for the identity
    ///
    /// Expired tokens are refreshed through the identity provider when a
    /// refresh token is on file; otherwise they are dropped and the caller is
    /// unauthenticated. A token stored while the refresh was in flight is
    /// kept. A refresh that fails transiently keeps the expired token so the
    /// next request can retry.
    #[instrument(skip(self))]
    pub async fn access_token(&self, identity_id: &IdentityId) -> ServiceResult<AccessToken> {
        let token = self.ctx.token_store().get(identity_id).await?;
        if !token.is_expired() {
            return Ok(token);
        }

        let identity_provider = self.ctx.identity_provider();
        match token.refresh_token.as_deref() {
            Some(refresh_token) if identity_provider.is_configured() => {
                match identity_provider.refresh(identity_id, refresh_token).await {
                    Ok(refreshed) => {
                        let refreshed = refreshed.owned_by(identity_id.clone());
                        self.ctx
                            .token_store()
                            .put(identity_id, refreshed.clone())
                            .await?;
                        info!(identity_id = %identity_id, "Expired access token refreshed");
                        Ok(refreshed)
                    }
                    Err(error) if error.is_transient() => {
                        warn!(
                            identity_id = %identity_id,
                            error = %error,
                            "Token refresh unavailable"
                        );
                        let error = ProviderError::Transport(error.to_string());
                        Err(DomainError::Provider(error).into())
                    }
                    Err(error) => {
                        warn!(identity_id = %identity_id, error = %error, "Token refresh failed");
                        self.drop_stale(identity_id, &token).await
                    }
                }
            }
            _ => {
                info!(identity_id = %identity_id, "Access token expired");
                self.drop_stale(identity_id, &token).await
            }
        }
    }

    /// Remove `stale` unless a newer token replaced it; hands out the newer one
    async fn drop_stale(
        &self,
        identity_id: &IdentityId,
        stale: &AccessToken,
    ) -> ServiceResult<AccessToken> {
        let store = self.ctx.token_store();
        if store.remove_if_current(identity_id, stale).await? {
            return Err(ServiceError::unauthenticated(identity_id));
        }

        match store.get(identity_id).await {
            Ok(current) if !current.is_expired() => Ok(current),
            Ok(_) | Err(DomainError::Unauthenticated(_)) => {
                Err(ServiceError::unauthenticated(identity_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the identity has a token that is usable or refreshable
    pub async fn is_authenticated(&self, identity_id: &IdentityId) -> ServiceResult<bool> {
        match self.ctx.token_store().get(identity_id).await {
            Ok(token) => Ok(!token.is_expired() || token.refresh_token.is_some()),
            Err(DomainError::Unauthenticated(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Authorization URL that starts the login; `state` carries the identity
    #[instrument(skip(self))]
    pub fn begin_login(&self, identity_id: &IdentityId) -> ServiceResult<String> {
        Ok(self
            .ctx
            .identity_provider()
            .authorization_url(identity_id.as_str())?)
    }

    /// Finish the login: exchange the code and store the token under `state`
    #[instrument(skip(self, code))]
    pub async fn complete_login(&self, code: &str, state: &str) -> ServiceResult<IdentityId> {
        let identity_id = IdentityId::parse(state)?;
        if code.trim().is_empty() {
            return Err(ServiceError::validation("code must not be empty"));
        }

        let token = self
            .ctx
            .identity_provider()
            .exchange_code(&identity_id, code)
            .await?
            .owned_by(identity_id.clone());

        self.ctx.token_store().put(&identity_id, token).await?;

        info!(identity_id = %identity_id, "Login completed");
        Ok(identity_id)
    }
}
