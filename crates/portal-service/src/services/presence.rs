//! Presence service
//!
//! Answers presence queries for an authenticated caller. Provider failures
//! degrade to offline entries; only a missing token or invalid input fails
//! the request.

use chrono::Utc;
use portal_core::{EngineerStatus, Identity, IdentityId};
use tracing::{info, instrument};

use crate::dto::{IntegrationStatusResponse, PresenceResponse, RosterViewResponse};

use super::aggregator::EngineerStatusAggregator;
use super::batch_fetcher::BatchPresenceFetcher;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::token::TokenService;

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    /// Create a new PresenceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn fetcher(&self) -> BatchPresenceFetcher<'a> {
        BatchPresenceFetcher::new(self.ctx.presence_provider(), self.ctx.fetch_policy())
    }

    /// Caller's own presence
    #[instrument(skip(self))]
    pub async fn get_own(&self, identity_id: &IdentityId) -> ServiceResult<PresenceResponse> {
        let token = TokenService::new(self.ctx).access_token(identity_id).await?;
        let checked_at = Utc::now();
        let presence = self.fetcher().fetch_own(&token).await;

        let identity = self.ctx.roster().resolve(identity_id);
        Ok(EngineerStatus::from_presence(identity, presence, checked_at).into())
    }

    /// Presence of one identity
    #[instrument(skip(self))]
    pub async fn get_presence(
        &self,
        identity_id: &IdentityId,
        target_id: &IdentityId,
    ) -> ServiceResult<PresenceResponse> {
        let token = TokenService::new(self.ctx).access_token(identity_id).await?;
        let checked_at = Utc::now();
        let presence = self.fetcher().fetch_one(&token, target_id).await;

        let identity = self.ctx.roster().resolve(target_id);
        Ok(EngineerStatus::from_presence(identity, presence, checked_at).into())
    }

    /// Presence of the server-owned team roster
    #[instrument(skip(self))]
    pub async fn get_team(&self, identity_id: &IdentityId) -> ServiceResult<RosterViewResponse> {
        let roster = self.ctx.roster().members();
        self.roster_view(identity_id, roster).await
    }

    /// Presence of a caller-supplied roster
    ///
    /// Ids are validated before the token is looked up, so malformed input is
    /// a 400 regardless of authentication state.
    #[instrument(skip(self, identity_ids), fields(requested = identity_ids.len()))]
    pub async fn get_bulk(
        &self,
        identity_id: &IdentityId,
        identity_ids: &[String],
    ) -> ServiceResult<RosterViewResponse> {
        let roster = self.parse_bulk_roster(identity_ids)?;
        self.roster_view(identity_id, &roster).await
    }

    /// Integration flags for the caller; never touches the presence provider
    #[instrument(skip(self))]
    pub async fn integration_status(
        &self,
        identity_id: &IdentityId,
    ) -> ServiceResult<IntegrationStatusResponse> {
        let is_authenticated = TokenService::new(self.ctx)
            .is_authenticated(identity_id)
            .await?;
        Ok(IntegrationStatusResponse::new(
            self.ctx.identity_provider().is_configured(),
            is_authenticated,
        ))
    }

    async fn roster_view(
        &self,
        identity_id: &IdentityId,
        roster: &[Identity],
    ) -> ServiceResult<RosterViewResponse> {
        let token = TokenService::new(self.ctx).access_token(identity_id).await?;
        let checked_at = Utc::now();
        let fetched = self.fetcher().fetch(&token, roster).await;
        let view = EngineerStatusAggregator::assemble(roster, &fetched, checked_at);

        info!(
            identity_id = %identity_id,
            total = view.total_count(),
            online = view.online_count(),
            "Roster presence assembled"
        );
        Ok(view.into())
    }

    fn parse_bulk_roster(&self, identity_ids: &[String]) -> ServiceResult<Vec<Identity>> {
        if identity_ids.is_empty() {
            return Err(ServiceError::validation("identity_ids must not be empty"));
        }
        let max = self.ctx.fetch_policy().max_batch_size;
        if identity_ids.len() > max {
            return Err(ServiceError::validation(format!(
                "identity_ids must contain at most {max} entries"
            )));
        }

        identity_ids
            .iter()
            .map(|raw| {
                IdentityId::parse(raw)
                    .map(|id| self.ctx.roster().resolve(&id))
                    .map_err(ServiceError::from)
            })
            .collect()
    }
}
