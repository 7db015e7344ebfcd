//! Authentication handlers
//!
//! Endpoints for the provider login round trip, direct token hand-over and
//! logout.

use axum::extract::{Query, State};
use portal_service::{
    dto::{AuthCallbackQuery, StoreTokenRequest},
    TokenService,
};
use tracing::warn;
use url::Url;

use crate::extractors::{CallerIdentity, ValidatedJson};
use crate::response::{ApiError, ApiResult, Found, NoContent};
use crate::state::AppState;

/// Store a provider token for the caller
///
/// POST /auth/token
pub async fn store_token(
    State(state): State<AppState>,
    CallerIdentity(identity_id): CallerIdentity,
    ValidatedJson(request): ValidatedJson<StoreTokenRequest>,
) -> ApiResult<NoContent> {
    let service = TokenService::new(state.service_context());
    service
        .store_token(
            &identity_id,
            request.access_token,
            request.expires_in,
            request.refresh_token,
        )
        .await?;
    Ok(NoContent)
}

/// Redirect the browser to the identity provider
///
/// GET /auth/login
pub async fn login(
    State(state): State<AppState>,
    CallerIdentity(identity_id): CallerIdentity,
) -> ApiResult<Found> {
    let service = TokenService::new(state.service_context());
    let url = service.begin_login(&identity_id)?;
    Ok(Found(url))
}

/// Finish the login and send the browser back to the frontend
///
/// GET /auth/callback
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<AuthCallbackQuery>,
) -> ApiResult<Found> {
    let frontend_url = &state.config().oauth.frontend_url;

    if let Some(error) = query.error {
        warn!(
            error = %error,
            description = query.error_description.as_deref().unwrap_or_default(),
            "Identity provider reported a failed sign-in"
        );
        return Ok(Found(frontend_redirect(frontend_url, "error")));
    }

    let code = query
        .code
        .ok_or_else(|| ApiError::invalid_query("code is required"))?;
    let login_state = query
        .state
        .ok_or_else(|| ApiError::invalid_query("state is required"))?;

    let service = TokenService::new(state.service_context());
    match service.complete_login(&code, &login_state).await {
        Ok(_) => Ok(Found(frontend_redirect(frontend_url, "success"))),
        Err(e) if e.status_code() == 400 => Err(e.into()),
        Err(e) => {
            warn!(error = %e, "Login callback failed");
            Ok(Found(frontend_redirect(frontend_url, "error")))
        }
    }
}

/// Forget the caller's token; succeeds whether or not one was stored
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    CallerIdentity(identity_id): CallerIdentity,
) -> ApiResult<NoContent> {
    let service = TokenService::new(state.service_context());
    service.logout(&identity_id).await?;
    Ok(NoContent)
}

fn frontend_redirect(frontend_url: &str, outcome: &str) -> String {
    match Url::parse(frontend_url) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("auth", outcome);
            url.into()
        }
        Err(_) => format!("{frontend_url}?auth={outcome}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontend_redirect() {
        assert_eq!(
            frontend_redirect("http://localhost:3000", "success"),
            "http://localhost:3000/?auth=success"
        );
        assert_eq!(
            frontend_redirect("https://portal.example.com/team?tab=1", "error"),
            "https://portal.example.com/team?tab=1&auth=error"
        );
    }
}
