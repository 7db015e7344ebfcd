//! Graph presence resource
//!
//! `GET /me/presence`, `GET /users/{id}/presence` and the `value` array of
//! `POST /communications/getPresencesByUserId` all share this shape.

use chrono::{DateTime, Utc};
use portal_core::{Activity, Availability, IdentityId, RawPresence};
use serde::Deserialize;

/// One presence resource as returned by Graph
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub status_message: Option<StatusMessageModel>,
}

/// `statusMessage` sub-resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessageModel {
    #[serde(default)]
    pub message: Option<ItemBodyModel>,
    #[serde(default)]
    pub published_date_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemBodyModel {
    #[serde(default)]
    pub content: Option<String>,
}

/// Collection envelope for batch results
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceListModel {
    #[serde(default)]
    pub value: Vec<PresenceModel>,
}

impl PresenceModel {
    /// Map onto the domain type, attributing it to `identity_id`
    ///
    /// Missing availability or activity become `PresenceUnknown`, which the
    /// classifier treats as offline.
    pub fn into_raw(self, identity_id: IdentityId) -> RawPresence {
        let availability = self
            .availability
            .as_deref()
            .map_or(Availability::PresenceUnknown, Availability::parse);
        let activity = self
            .activity
            .as_deref()
            .map_or(Activity::PresenceUnknown, Activity::parse);

        let mut presence = RawPresence::new(identity_id, availability, activity);

        if let Some(status) = self.status_message {
            let content = status
                .message
                .and_then(|body| body.content)
                .filter(|content| !content.trim().is_empty());
            if let Some(content) = content {
                presence = presence.with_status_message(content);
            }
            if let Some(published_at) = status.published_date_time {
                presence = presence.with_published_at(published_at);
            }
        }

        presence
    }
}
