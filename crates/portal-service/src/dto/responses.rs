//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use portal_core::{DisplayStatus, RawPresence};
use serde::Serialize;

// ============================================================================
// Presence Responses
// ============================================================================

/// Presence of a single identity
#[derive(Debug, Clone, Serialize)]
pub struct PresenceResponse {
    pub identity_id: String,
    /// `null` when the provider could not answer
    pub raw_presence: Option<RawPresence>,
    pub display_status: DisplayStatus,
    pub is_online: bool,
    /// When the portal asked the provider
    pub checked_at: DateTime<Utc>,
    /// Timestamp the provider attached to the status, if any
    pub provider_reported_at: Option<DateTime<Utc>>,
}

/// One roster row
#[derive(Debug, Clone, Serialize)]
pub struct EngineerStatusResponse {
    pub identity_id: String,
    pub email: String,
    pub display_name: String,
    pub raw_presence: Option<RawPresence>,
    pub display_status: DisplayStatus,
    pub is_online: bool,
    pub checked_at: DateTime<Utc>,
    pub provider_reported_at: Option<DateTime<Utc>>,
}

/// Classified presence of a whole roster
#[derive(Debug, Clone, Serialize)]
pub struct RosterViewResponse {
    pub entries: Vec<EngineerStatusResponse>,
    pub total_count: usize,
    pub online_count: usize,
    pub status_counts: BTreeMap<DisplayStatus, usize>,
    pub generated_at: DateTime<Utc>,
}

// ============================================================================
// Integration Responses
// ============================================================================

/// What the portal knows about its provider integration for the caller
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationStatusResponse {
    pub is_configured: bool,
    pub is_authenticated: bool,
    pub supported_statuses: Vec<DisplayStatus>,
}

impl IntegrationStatusResponse {
    pub fn new(is_configured: bool, is_authenticated: bool) -> Self {
        Self {
            is_configured,
            is_authenticated,
            supported_statuses: DisplayStatus::ALL.to_vec(),
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Status of each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub token_store: String,
    pub identity_provider: String,
    pub roster_size: usize,
}

impl ReadinessResponse {
    /// Ready when the token store answers; an unconfigured identity provider
    /// only disables the login flow
    pub fn ready(
        token_store_healthy: bool,
        identity_provider_configured: bool,
        roster_size: usize,
    ) -> Self {
        Self {
            status: if token_store_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                token_store: if token_store_healthy { "healthy" } else { "unhealthy" }.to_string(),
                identity_provider: if identity_provider_configured {
                    "configured"
                } else {
                    "not_configured"
                }
                .to_string(),
                roster_size,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integration_status_lists_all_statuses() {
        let status = IntegrationStatusResponse::new(true, false);
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(
            value,
            json!({
                "is_configured": true,
                "is_authenticated": false,
                "supported_statuses": [
                    "available", "away", "busy", "do-not-disturb", "out-of-office", "offline"
                ]
            })
        );
    }

    #[test]
    fn test_health_response() {
        let health = HealthResponse::healthy();
        assert_eq!(health.status, "healthy");
    }

    #[test]
    fn test_readiness_response() {
        let ready = ReadinessResponse::ready(true, false, 4);
        assert_eq!(ready.status, "ready");
        assert_eq!(ready.checks.identity_provider, "not_configured");
        assert_eq!(ready.checks.roster_size, 4);

        let not_ready = ReadinessResponse::ready(false, true, 0);
        assert_eq!(not_ready.status, "not_ready");
        assert_eq!(not_ready.checks.token_store, "unhealthy");
    }
}
