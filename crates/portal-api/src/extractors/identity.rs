//! Caller identity extractor
//!
//! Every presence and auth endpoint acts on behalf of one identity. It comes
//! from the `X-Identity-Id` header, or the `identity_id` query parameter for
//! browser navigations that cannot set headers.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{request::Parts, HeaderName, HeaderValue},
};
use axum_extra::{
    headers::{self, Header},
    TypedHeader,
};
use portal_core::IdentityId;
use portal_service::dto::IdentityQuery;

use crate::response::ApiError;

/// Header carrying the caller identity
pub const IDENTITY_HEADER: &str = "x-identity-id";

static IDENTITY_HEADER_NAME: HeaderName = HeaderName::from_static(IDENTITY_HEADER);

/// Typed `X-Identity-Id` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XIdentityId(pub IdentityId);

impl Header for XIdentityId {
    fn name() -> &'static HeaderName {
        &IDENTITY_HEADER_NAME
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(headers::Error::invalid)?;
        let raw = value.to_str().map_err(|_| headers::Error::invalid())?;
        IdentityId::parse(raw)
            .map(XIdentityId)
            .map_err(|_| headers::Error::invalid())
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        if let Ok(value) = HeaderValue::from_str(self.0.as_str()) {
            values.extend(std::iter::once(value));
        }
    }
}

/// Identity the request acts for
///
/// The header wins over the query parameter. Neither present is a 400
/// `MISSING_IDENTITY`; a present but blank value is a 400 `INVALID_IDENTITY_ID`.
#[derive(Debug, Clone)]
pub struct CallerIdentity(pub IdentityId);

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match TypedHeader::<XIdentityId>::from_request_parts(parts, state).await {
            Ok(TypedHeader(XIdentityId(identity_id))) => return Ok(CallerIdentity(identity_id)),
            Err(rejection) if !rejection.is_missing() => {
                return Err(ApiError::InvalidIdentity(format!(
                    "{IDENTITY_HEADER} header is not a valid identity id"
                )));
            }
            Err(_) => {}
        }

        let Query(query) = Query::<IdentityQuery>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        match query.identity_id {
            Some(raw) => IdentityId::parse(&raw)
                .map(CallerIdentity)
                .map_err(|e| ApiError::InvalidIdentity(e.to_string())),
            None => Err(ApiError::MissingIdentity),
        }
    }
}
