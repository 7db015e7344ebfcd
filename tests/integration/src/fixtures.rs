//! Test fixtures and data generators
//!
//! Provides reusable roster members, scripted presence and response shapes.

use portal_core::{Activity, Availability, Identity, IdentityId, RawPresence};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Roster member `raw` with a derived email and display name
pub fn member(raw: &str) -> Identity {
    Identity::new(
        identity_id(raw),
        format!("{raw}@example.com"),
        format!("Engineer {raw}"),
    )
}

/// Roster of the given ids, in order
pub fn roster(ids: &[&str]) -> Vec<Identity> {
    ids.iter().copied().map(member).collect()
}

pub fn identity_id(raw: &str) -> IdentityId {
    IdentityId::parse(raw).unwrap_or_else(|e| panic!("invalid fixture id {raw:?}: {e}"))
}

pub fn available(raw: &str) -> RawPresence {
    RawPresence::new(identity_id(raw), Availability::Available, Activity::Available)
}

pub fn in_a_call(raw: &str) -> RawPresence {
    RawPresence::new(identity_id(raw), Availability::Busy, Activity::InACall)
}

pub fn out_of_office(raw: &str) -> RawPresence {
    RawPresence::new(identity_id(raw), Availability::Offline, Activity::OutOfOffice)
}

/// Bulk presence request
#[derive(Debug, Serialize)]
pub struct BulkPresenceRequest {
    pub identity_ids: Vec<String>,
}

impl BulkPresenceRequest {
    pub fn of(ids: &[&str]) -> Self {
        Self {
            identity_ids: ids.iter().map(|id| id.to_string()).collect(),
        }
    }
}

/// Single presence response
#[derive(Debug, Deserialize)]
pub struct PresenceResponse {
    pub identity_id: String,
    pub raw_presence: Option<serde_json::Value>,
    pub display_status: String,
    pub is_online: bool,
    pub checked_at: String,
}

/// Roster row
#[derive(Debug, Deserialize)]
pub struct EngineerStatusResponse {
    pub identity_id: String,
    pub email: String,
    pub display_name: String,
    pub raw_presence: Option<serde_json::Value>,
    pub display_status: String,
    pub is_online: bool,
}

/// Roster view response
#[derive(Debug, Deserialize)]
pub struct RosterViewResponse {
    pub entries: Vec<EngineerStatusResponse>,
    pub total_count: usize,
    pub online_count: usize,
    pub status_counts: BTreeMap<String, usize>,
    pub generated_at: String,
}

impl RosterViewResponse {
    pub fn statuses(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.display_status.as_str())
            .collect()
    }
}

/// Integration status response
#[derive(Debug, Deserialize)]
pub struct IntegrationStatusResponse {
    pub is_configured: bool,
    pub is_authenticated: bool,
    pub supported_statuses: Vec<String>,
}
