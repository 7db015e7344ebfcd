//! Integration status handler

use axum::{extract::State, Json};
use portal_service::{dto::IntegrationStatusResponse, PresenceService};

use crate::extractors::CallerIdentity;
use crate::response::ApiResult;
use crate::state::AppState;

/// Whether presence integration is usable for the caller
///
/// GET /integration/status
pub async fn get_status(
    State(state): State<AppState>,
    CallerIdentity(identity_id): CallerIdentity,
) -> ApiResult<Json<IntegrationStatusResponse>> {
    let service = PresenceService::new(state.service_context());
    let response = service.integration_status(&identity_id).await?;
    Ok(Json(response))
}
