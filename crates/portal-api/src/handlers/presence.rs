//! Presence handlers
//!
//! Endpoints for own, single, team and bulk presence.

use axum::{
    extract::{Path, State},
    Json,
};
use portal_core::IdentityId;
use portal_service::{
    dto::{BulkPresenceRequest, PresenceResponse, RosterViewResponse},
    PresenceService,
};

use crate::extractors::{CallerIdentity, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Caller's own presence
///
/// GET /presence/me
pub async fn get_own_presence(
    State(state): State<AppState>,
    CallerIdentity(identity_id): CallerIdentity,
) -> ApiResult<Json<PresenceResponse>> {
    let service = PresenceService::new(state.service_context());
    let response = service.get_own(&identity_id).await?;
    Ok(Json(response))
}

/// Presence of one identity
///
/// GET /presence/users/:target_id
pub async fn get_user_presence(
    State(state): State<AppState>,
    CallerIdentity(identity_id): CallerIdentity,
    Path(target_id): Path<String>,
) -> ApiResult<Json<PresenceResponse>> {
    let target_id =
        IdentityId::parse(&target_id).map_err(|e| ApiError::invalid_path(e.to_string()))?;

    let service = PresenceService::new(state.service_context());
    let response = service.get_presence(&identity_id, &target_id).await?;
    Ok(Json(response))
}

/// Presence of the configured team roster
///
/// GET /presence/team
pub async fn get_team_presence(
    State(state): State<AppState>,
    CallerIdentity(identity_id): CallerIdentity,
) -> ApiResult<Json<RosterViewResponse>> {
    let service = PresenceService::new(state.service_context());
    let response = service.get_team(&identity_id).await?;
    Ok(Json(response))
}

/// Presence of a caller-supplied roster
///
/// POST /presence/bulk
pub async fn get_bulk_presence(
    State(state): State<AppState>,
    CallerIdentity(identity_id): CallerIdentity,
    ValidatedJson(request): ValidatedJson<BulkPresenceRequest>,
) -> ApiResult<Json<RosterViewResponse>> {
    let service = PresenceService::new(state.service_context());
    let response = service
        .get_bulk(&identity_id, &request.identity_ids)
        .await?;
    Ok(Json(response))
}
