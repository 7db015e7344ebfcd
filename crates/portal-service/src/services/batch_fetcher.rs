//! Batch presence fetcher
//!
//! Wraps provider calls with a per-attempt timeout and a bounded, jittered
//! retry. Provider failures never escape: an identity the provider could not
//! answer for maps to `None`, which the aggregator renders as offline.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::time::Duration;

use portal_common::ProviderConfig;
use portal_core::{
    AccessToken, Identity, IdentityId, PresenceProvider, ProviderError, ProviderResult,
    RawPresence,
};
use rand::Rng;
use tracing::{debug, warn};

/// Timeout and retry settings for provider calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Upper bound for one attempt
    pub request_timeout: Duration,
    /// Retries after the first attempt, for transient failures only
    pub max_retries: u32,
    /// Backoff before retry `n` is `retry_base_delay * 2^n` plus up to one base of jitter
    pub retry_base_delay: Duration,
    /// Largest caller-supplied roster accepted by bulk queries
    pub max_batch_size: usize,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self::from_config(&ProviderConfig::default())
    }
}

impl FetchPolicy {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            request_timeout: config.request_timeout(),
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay(),
            max_batch_size: config.max_batch_size,
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let base = self.retry_base_delay.as_millis() as u64;
        let exponential = base.saturating_mul(1_u64 << attempt.min(16));
        let jitter = if base == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=base)
        };
        Duration::from_millis(exponential.saturating_add(jitter))
    }
}

/// Fetches raw presence on behalf of one caller
pub struct BatchPresenceFetcher<'a> {
    provider: &'a dyn PresenceProvider,
    policy: &'a FetchPolicy,
}

impl<'a> BatchPresenceFetcher<'a> {
    pub fn new(provider: &'a dyn PresenceProvider, policy: &'a FetchPolicy) -> Self {
        Self { provider, policy }
    }

    /// Fetch presence for a whole roster with one batch query
    ///
    /// The result has an entry for every distinct identity in `roster`.
    /// An empty roster makes no provider call.
    pub async fn fetch(
        &self,
        token: &AccessToken,
        roster: &[Identity],
    ) -> HashMap<IdentityId, Option<RawPresence>> {
        let ids = distinct_ids(roster);
        if ids.is_empty() {
            return HashMap::new();
        }

        let mut found = match self
            .with_retry("batch", || self.provider.fetch_batch(token, &ids))
            .await
        {
            Ok(batch) => {
                if batch.failed_count() > 0 {
                    debug!(
                        requested = ids.len(),
                        failed = batch.failed_count(),
                        "Some identities missing from presence batch"
                    );
                }
                batch.into_found()
            }
            Err(error) => {
                warn!(
                    requested = ids.len(),
                    kind = error.kind(),
                    error = %error,
                    "Presence batch failed; reporting roster offline"
                );
                HashMap::new()
            }
        };

        ids.into_iter()
            .map(|id| {
                let presence = found.remove(&id);
                (id, presence)
            })
            .collect()
    }

    /// Presence of the token owner, `None` on provider failure
    pub async fn fetch_own(&self, token: &AccessToken) -> Option<RawPresence> {
        self.with_retry("own", || self.provider.fetch_own(token))
            .await
            .map_err(|error| {
                warn!(
                    identity_id = %token.owning_identity_id,
                    kind = error.kind(),
                    error = %error,
                    "Own presence lookup failed; reporting offline"
                );
            })
            .ok()
    }

    /// Presence of one identity, `None` on provider failure
    pub async fn fetch_one(
        &self,
        token: &AccessToken,
        identity_id: &IdentityId,
    ) -> Option<RawPresence> {
        self.with_retry("one", || self.provider.fetch_one(token, identity_id))
            .await
            .map_err(|error| {
                warn!(
                    identity_id = %identity_id,
                    kind = error.kind(),
                    error = %error,
                    "Presence lookup failed; reporting offline"
                );
            })
            .ok()
    }

    async fn with_retry<T, F, Fut>(
        &self,
        call: &'static str,
        mut attempt_fn: F,
    ) -> ProviderResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ProviderResult<T>>,
    {
        let mut attempt = 0;
        loop {
            let timeout = self.policy.request_timeout;
            let outcome = match tokio::time::timeout(timeout, attempt_fn()).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(format!(
                    "no answer within {} ms",
                    timeout.as_millis()
                ))),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(error) if error.is_transient() && attempt < self.policy.max_retries => {
                    let delay = self.policy.backoff(attempt);
                    attempt += 1;
                    debug!(
                        call,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        kind = error.kind(),
                        "Retrying provider call"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

fn distinct_ids(roster: &[Identity]) -> Vec<IdentityId> {
    let mut seen = HashSet::with_capacity(roster.len());
    roster
        .iter()
        .filter(|identity| seen.insert(identity.id.clone()))
        .map(|identity| identity.id.clone())
        .collect()
}
