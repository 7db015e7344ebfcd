//! Engineer status and roster view - the classified output of a fetch

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classifier::classify_presence;
use crate::entities::{Identity, RawPresence};
use crate::value_objects::DisplayStatus;

/// Classified presence of one roster identity
///
/// Fields are private so `is_online` can never disagree with
/// `display_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineerStatus {
    identity: Identity,
    raw_presence: Option<RawPresence>,
    display_status: DisplayStatus,
    is_online: bool,
    /// When the portal asked the provider
    checked_at: DateTime<Utc>,
    /// When the provider says the status was published
    provider_reported_at: Option<DateTime<Utc>>,
}

impl EngineerStatus {
    /// Build a status from an optional raw presence
    ///
    /// A missing presence (failed or absent from the batch) is offline.
    pub fn from_presence(
        identity: Identity,
        raw_presence: Option<RawPresence>,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let display_status = classify_presence(raw_presence.as_ref());
        let provider_reported_at = raw_presence.as_ref().and_then(|p| p.published_at);
        Self {
            identity,
            raw_presence,
            display_status,
            is_online: display_status.is_online(),
            checked_at,
            provider_reported_at,
        }
    }

    /// Offline status for an identity whose presence could not be fetched
    pub fn offline(identity: Identity, checked_at: DateTime<Utc>) -> Self {
        Self::from_presence(identity, None, checked_at)
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn raw_presence(&self) -> Option<&RawPresence> {
        self.raw_presence.as_ref()
    }

    pub fn display_status(&self) -> DisplayStatus {
        self.display_status
    }

    pub fn is_online(&self) -> bool {
        self.is_online
    }

    pub fn checked_at(&self) -> DateTime<Utc> {
        self.checked_at
    }

    pub fn provider_reported_at(&self) -> Option<DateTime<Utc>> {
        self.provider_reported_at
    }
}

/// Aggregated presence of a whole roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterView {
    entries: Vec<EngineerStatus>,
    total_count: usize,
    online_count: usize,
    status_counts: BTreeMap<DisplayStatus, usize>,
    generated_at: DateTime<Utc>,
}

impl RosterView {
    /// Assemble a view, deriving every count from `entries`
    pub fn new(entries: Vec<EngineerStatus>, generated_at: DateTime<Utc>) -> Self {
        let mut status_counts: BTreeMap<DisplayStatus, usize> =
            DisplayStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for entry in &entries {
            *status_counts.entry(entry.display_status()).or_default() += 1;
        }
        let online_count = entries.iter().filter(|e| e.is_online()).count();

        Self {
            total_count: entries.len(),
            online_count,
            status_counts,
            entries,
            generated_at,
        }
    }

    pub fn entries(&self) -> &[EngineerStatus] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<EngineerStatus> {
        self.entries
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn online_count(&self) -> usize {
        self.online_count
    }

    /// Number of entries with the given status
    pub fn count_of(&self, status: DisplayStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    pub fn status_counts(&self) -> &BTreeMap<DisplayStatus, usize> {
        &self.status_counts
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}
