//! Scripted in-process providers
//!
//! Used when `PORTAL_PROVIDER_MODE=mock` and by tests that need to control
//! what the provider returns, how long it takes, and when it fails.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use portal_core::{
    AccessToken, Activity, AuthError, Availability, BatchPresence, Identity, IdentityId,
    IdentityProvider, PresenceProvider, ProviderError, ProviderResult, RawPresence,
};
use tokio::sync::Mutex;
use url::Url;

/// Presence provider answering from a scripted table
#[derive(Debug, Default)]
pub struct ScriptedPresenceProvider {
    presences: DashMap<IdentityId, RawPresence>,
    unavailable: DashSet<IdentityId>,
    batch_failures: Mutex<VecDeque<ProviderError>>,
    batch_requests: Mutex<Vec<Vec<IdentityId>>>,
    delay: Mutex<Option<Duration>>,
    single_calls: AtomicUsize,
}

impl ScriptedPresenceProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Seed a deterministic spread of statuses across a roster
    #[must_use]
    pub fn seeded(roster: &[Identity]) -> Self {
        const SCRIPT: [(Availability, Activity); 6] = [
            (Availability::Available, Activity::Available),
            (Availability::Busy, Activity::InACall),
            (Availability::Away, Activity::Away),
            (Availability::DoNotDisturb, Activity::Presenting),
            (Availability::Offline, Activity::OutOfOffice),
            (Availability::Offline, Activity::Offline),
        ];

        let provider = Self::new();
        for (identity, (availability, activity)) in roster.iter().zip(SCRIPT.iter().cycle()) {
            provider.set_presence(RawPresence::new(
                identity.id.clone(),
                availability.clone(),
                activity.clone(),
            ));
        }
        provider
    }

    /// Script the presence returned for its identity
    pub fn set_presence(&self, presence: RawPresence) {
        self.unavailable.remove(&presence.identity_id);
        self.presences.insert(presence.identity_id.clone(), presence);
    }

    /// Make one identity fail individually inside otherwise successful calls
    pub fn set_unavailable(&self, identity_id: IdentityId) {
        self.unavailable.insert(identity_id);
    }

    /// Fail the next batch call with `error`; queued failures are consumed in order
    pub async fn fail_next_batch(&self, error: ProviderError) {
        self.batch_failures.lock().await.push_back(error);
    }

    /// Fail the next `count` batch calls with `error`
    pub async fn fail_batches(&self, count: usize, error: ProviderError) {
        let mut failures = self.batch_failures.lock().await;
        failures.extend(std::iter::repeat(error).take(count));
    }

    /// Sleep before answering every call
    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().await = delay;
    }

    /// Number of batch calls received, including failed ones
    pub async fn batch_calls(&self) -> usize {
        self.batch_requests.lock().await.len()
    }

    /// Ids requested by each batch call, in call order
    pub async fn batch_requests(&self) -> Vec<Vec<IdentityId>> {
        self.batch_requests.lock().await.clone()
    }

    /// Number of single-identity calls (own or one)
    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn lookup(&self, identity_id: &IdentityId) -> ProviderResult<RawPresence> {
        if self.unavailable.contains(identity_id) {
            return Err(ProviderError::NotFound(identity_id.to_string()));
        }
        self.presences
            .get(identity_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ProviderError::NotFound(identity_id.to_string()))
    }
}

#[async_trait]
impl PresenceProvider for ScriptedPresenceProvider {
    async fn fetch_own(&self, token: &AccessToken) -> ProviderResult<RawPresence> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.lookup(&token.owning_identity_id)
    }

    async fn fetch_one(
        &self,
        _token: &AccessToken,
        identity_id: &IdentityId,
    ) -> ProviderResult<RawPresence> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.lookup(identity_id)
    }

    async fn fetch_batch(
        &self,
        _token: &AccessToken,
        identity_ids: &[IdentityId],
    ) -> ProviderResult<BatchPresence> {
        self.batch_requests.lock().await.push(identity_ids.to_vec());
        self.pause().await;

        if let Some(error) = self.batch_failures.lock().await.pop_front() {
            return Err(error);
        }

        let mut batch = BatchPresence::new();
        for identity_id in identity_ids {
            match self.lookup(identity_id) {
                Ok(presence) => batch.insert_found(presence),
                Err(error) => batch.insert_failed(identity_id.clone(), error.to_string()),
            }
        }
        Ok(batch)
    }
}

/// Identity provider that accepts any code except `"invalid"`
#[derive(Debug, Clone)]
pub struct MockIdentityProvider {
    configured: bool,
    token_lifetime_secs: i64,
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self {
            configured: true,
            token_lifetime_secs: 3600,
        }
    }
}

impl MockIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that reports missing client credentials
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::default()
        }
    }

    /// Lifetime of issued tokens; negative values issue already-expired tokens
    #[must_use]
    pub fn with_token_lifetime(mut self, seconds: i64) -> Self {
        self.token_lifetime_secs = seconds;
        self
    }

    fn ensure_configured(&self) -> Result<(), AuthError> {
        if self.configured {
            Ok(())
        } else {
            Err(AuthError::NotConfigured)
        }
    }

    fn issue(&self, identity_id: &IdentityId, value: String) -> AccessToken {
        AccessToken::new(identity_id.clone(), value)
            .with_expires_in(self.token_lifetime_secs)
            .with_refresh_token(format!("mock-refresh-{identity_id}"))
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    fn is_configured(&self) -> bool {
        self.configured
    }

    fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        self.ensure_configured()?;
        Url::parse_with_params("https://login.mock.invalid/authorize", &[("state", state)])
            .map(String::from)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }

    async fn exchange_code(
        &self,
        identity_id: &IdentityId,
        code: &str,
    ) -> Result<AccessToken, AuthError> {
        self.ensure_configured()?;
        if code == "invalid" {
            return Err(AuthError::Rejected("invalid_grant".to_string()));
        }
        Ok(self.issue(identity_id, format!("mock-access-{code}")))
    }

    async fn refresh(
        &self,
        identity_id: &IdentityId,
        refresh_token: &str,
    ) -> Result<AccessToken, AuthError> {
        self.ensure_configured()?;
        if refresh_token != format!("mock-refresh-{identity_id}") {
            return Err(AuthError::Rejected("invalid_grant".to_string()));
        }
        Ok(self
            .issue(identity_id, format!("mock-refreshed-{identity_id}"))
            .with_expires_in(self.token_lifetime_secs.max(60)))
    }
}
