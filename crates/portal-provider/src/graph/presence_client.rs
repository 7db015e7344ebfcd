//! Reqwest-backed Graph presence adapter.
//!
//! Owns transport details only: URL building, bearer auth, HTTP error mapping,
//! and JSON decoding into domain presence.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use portal_common::ProviderConfig;
use portal_core::{
    AccessToken, BatchPresence, IdentityId, PresenceProvider, ProviderError, ProviderResult,
    RawPresence,
};
use reqwest::{header, Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::{map_status_error, map_transport_error};
use crate::error::SetupError;
use crate::models::{PresenceListModel, PresenceModel};

/// Largest id list Graph accepts in one `getPresencesByUserId` call
pub const GRAPH_BATCH_LIMIT: usize = 650;

#[derive(Serialize)]
struct PresencesByUserIdBody<'a> {
    ids: Vec<&'a str>,
}

/// Presence provider talking to Microsoft Graph
#[derive(Debug, Clone)]
pub struct GraphPresenceProvider {
    client: Client,
    base_url: Url,
    batch_limit: usize,
}

impl GraphPresenceProvider {
    /// Build an adapter with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is unusable or the client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SetupError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(SetupError::NotABase(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            batch_limit: GRAPH_BATCH_LIMIT,
        })
    }

    /// Build from the provider configuration section
    pub fn from_config(config: &ProviderConfig) -> Result<Self, SetupError> {
        Self::new(&config.base_url, config.request_timeout())
    }

    /// Split batch calls into chunks of at most `limit` ids
    #[must_use]
    pub fn with_batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = limit.clamp(1, GRAPH_BATCH_LIMIT);
        self
    }

    fn endpoint(&self, segments: &[&str]) -> ProviderResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ProviderError::Transport(format!("unusable base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_presence(&self, token: &AccessToken, url: Url) -> ProviderResult<PresenceModel> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&token.value)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        decode(response).await
    }

    async fn post_batch(
        &self,
        token: &AccessToken,
        identity_ids: &[IdentityId],
    ) -> ProviderResult<Vec<PresenceModel>> {
        let url = self.endpoint(&["communications", "getPresencesByUserId"])?;
        let body = PresencesByUserIdBody {
            ids: identity_ids.iter().map(IdentityId::as_str).collect(),
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&token.value)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let list: PresenceListModel = decode(response).await?;
        Ok(list.value)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ProviderResult<T> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }

    serde_json::from_slice(body.as_ref())
        .map_err(|error| ProviderError::Decode(format!("invalid Graph JSON payload: {error}")))
}

/// Match returned resources to requested ids
///
/// Graph object ids are GUIDs and may come back in a different case. Ids the
/// provider did not return are recorded as failed lookups.
fn assemble_chunk(
    batch: &mut BatchPresence,
    requested: &[IdentityId],
    returned: Vec<PresenceModel>,
) {
    let mut by_id: HashMap<String, PresenceModel> = returned
        .into_iter()
        .filter_map(|model| model.id.clone().map(|id| (id.to_lowercase(), model)))
        .collect();

    for identity_id in requested {
        match by_id.remove(&identity_id.as_str().to_lowercase()) {
            Some(model) => batch.insert_found(model.into_raw(identity_id.clone())),
            None => batch.insert_failed(identity_id.clone(), "not returned by provider"),
        }
    }
}

/// Post `identity_ids` in chunks of `limit` and merge the answers
///
/// A failed chunk marks its own ids as failed lookups. The call only fails
/// when no chunk succeeded.
async fn fetch_chunked<'a, F, Fut>(
    identity_ids: &'a [IdentityId],
    limit: usize,
    mut post: F,
) -> ProviderResult<BatchPresence>
where
    F: FnMut(&'a [IdentityId]) -> Fut,
    Fut: Future<Output = ProviderResult<Vec<PresenceModel>>>,
{
    let mut batch = BatchPresence::new();
    let mut succeeded = 0usize;
    let mut last_error = None;

    for chunk in identity_ids.chunks(limit) {
        match post(chunk).await {
            Ok(returned) => {
                assemble_chunk(&mut batch, chunk, returned);
                succeeded += 1;
            }
            Err(error) => {
                tracing::warn!(ids = chunk.len(), error = %error, "Presence batch chunk failed");
                for identity_id in chunk {
                    batch.insert_failed(identity_id.clone(), error.to_string());
                }
                last_error = Some(error);
            }
        }
    }

    match last_error {
        Some(error) if succeeded == 0 => Err(error),
        _ => Ok(batch),
    }
}

#[async_trait]
impl PresenceProvider for GraphPresenceProvider {
    async fn fetch_own(&self, token: &AccessToken) -> ProviderResult<RawPresence> {
        let url = self.endpoint(&["me", "presence"])?;
        let model = self.get_presence(token, url).await?;
        Ok(model.into_raw(token.owning_identity_id.clone()))
    }

    async fn fetch_one(
        &self,
        token: &AccessToken,
        identity_id: &IdentityId,
    ) -> ProviderResult<RawPresence> {
        let url = self.endpoint(&["users", identity_id.as_str(), "presence"])?;
        let model = self.get_presence(token, url).await?;
        Ok(model.into_raw(identity_id.clone()))
    }

    async fn fetch_batch(
        &self,
        token: &AccessToken,
        identity_ids: &[IdentityId],
    ) -> ProviderResult<BatchPresence> {
        let batch = fetch_chunked(identity_ids, self.batch_limit, move |chunk| {
            self.post_batch(token, chunk)
        })
        .await?;
        tracing::debug!(
            requested = identity_ids.len(),
            failed = batch.failed_count(),
            "Fetched presence batch"
        );
        Ok(batch)
    }
}
