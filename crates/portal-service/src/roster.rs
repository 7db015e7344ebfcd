//! Server-owned team roster
//!
//! Loaded once at startup from a JSON array:
//!
//! ```json
//! [{"id": "fa8bf3dc-...", "email": "ana@example.com", "display_name": "Ana"}]
//! ```

use std::collections::HashMap;
use std::path::Path;

use portal_core::{Identity, IdentityId};
use serde::Deserialize;

use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Deserialize)]
struct RosterRecord {
    id: IdentityId,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl From<RosterRecord> for Identity {
    fn from(record: RosterRecord) -> Self {
        let display_name = record
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| record.id.to_string());
        Identity::new(record.id, record.email, display_name)
    }
}

/// Ordered list of team members
#[derive(Debug, Clone, Default)]
pub struct TeamRoster {
    members: Vec<Identity>,
    index: HashMap<IdentityId, usize>,
}

impl TeamRoster {
    /// Build from members, keeping their order
    ///
    /// A repeated id is kept as a repeated entry; lookups resolve to the first.
    pub fn new(members: Vec<Identity>) -> Self {
        let mut index = HashMap::with_capacity(members.len());
        for (position, member) in members.iter().enumerate() {
            index.entry(member.id.clone()).or_insert(position);
        }
        Self { members, index }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the JSON roster format
    pub fn from_json_str(raw: &str) -> ServiceResult<Self> {
        let records: Vec<RosterRecord> = serde_json::from_str(raw)
            .map_err(|e| ServiceError::validation(format!("invalid roster JSON: {e}")))?;
        Ok(Self::new(records.into_iter().map(Identity::from).collect()))
    }

    /// Read and parse a roster file
    pub async fn load(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            ServiceError::internal(format!("failed to read roster {}: {e}", path.display()))
        })?;
        let roster = Self::from_json_str(&raw)?;

        tracing::info!(path = %path.display(), members = roster.len(), "Loaded team roster");
        Ok(roster)
    }

    pub fn members(&self) -> &[Identity] {
        &self.members
    }

    pub fn find(&self, identity_id: &IdentityId) -> Option<&Identity> {
        self.index
            .get(identity_id)
            .and_then(|&position| self.members.get(position))
    }

    /// Roster entry for the id, or an anonymous identity if it is not on the roster
    pub fn resolve(&self, identity_id: &IdentityId) -> Identity {
        self.find(identity_id)
            .cloned()
            .unwrap_or_else(|| Identity::anonymous(identity_id.clone()))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
