//! Domain entity to DTO mappers

use portal_core::{EngineerStatus, RosterView};

use super::responses::{EngineerStatusResponse, PresenceResponse, RosterViewResponse};

impl From<EngineerStatus> for PresenceResponse {
    fn from(status: EngineerStatus) -> Self {
        Self {
            identity_id: status.identity().id.to_string(),
            raw_presence: status.raw_presence().cloned(),
            display_status: status.display_status(),
            is_online: status.is_online(),
            checked_at: status.checked_at(),
            provider_reported_at: status.provider_reported_at(),
        }
    }
}

impl From<&EngineerStatus> for EngineerStatusResponse {
    fn from(status: &EngineerStatus) -> Self {
        let identity = status.identity();
        Self {
            identity_id: identity.id.to_string(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            raw_presence: status.raw_presence().cloned(),
            display_status: status.display_status(),
            is_online: status.is_online(),
            checked_at: status.checked_at(),
            provider_reported_at: status.provider_reported_at(),
        }
    }
}

impl From<RosterView> for RosterViewResponse {
    fn from(view: RosterView) -> Self {
        Self {
            entries: view.entries().iter().map(EngineerStatusResponse::from).collect(),
            total_count: view.total_count(),
            online_count: view.online_count(),
            status_counts: view.status_counts().clone(),
            generated_at: view.generated_at(),
        }
    }
}
