//! Mapping of transport and HTTP failures onto `ProviderError`

use portal_core::ProviderError;
use reqwest::StatusCode;

pub(crate) fn map_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout(error.to_string())
    } else if error.is_decode() {
        ProviderError::Decode(error.to_string())
    } else {
        ProviderError::Transport(error.to_string())
    }
}

pub(crate) fn map_status_error(status: StatusCode, body: &[u8]) -> ProviderError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthorized(message),
        StatusCode::NOT_FOUND => ProviderError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ProviderError::Timeout(message)
        }
        _ => ProviderError::Http {
            status: status.as_u16(),
            message,
        },
    }
}

pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let body = br#"{"error":{"code":"Throttled"}}"#;
        assert!(matches!(
            map_status_error(StatusCode::UNAUTHORIZED, body),
            ProviderError::Unauthorized(_)
        ));
        assert!(matches!(
            map_status_error(StatusCode::FORBIDDEN, body),
            ProviderError::Unauthorized(_)
        ));
        assert!(matches!(
            map_status_error(StatusCode::NOT_FOUND, body),
            ProviderError::NotFound(_)
        ));
        assert!(matches!(
            map_status_error(StatusCode::TOO_MANY_REQUESTS, body),
            ProviderError::RateLimited(_)
        ));
        assert!(matches!(
            map_status_error(StatusCode::GATEWAY_TIMEOUT, body),
            ProviderError::Timeout(_)
        ));
        assert!(matches!(
            map_status_error(StatusCode::SERVICE_UNAVAILABLE, body),
            ProviderError::Http { status: 503, .. }
        ));
    }

    #[test]
    fn test_server_errors_are_transient_client_errors_are_not() {
        assert!(map_status_error(StatusCode::BAD_GATEWAY, b"").is_transient());
        assert!(map_status_error(StatusCode::TOO_MANY_REQUESTS, b"").is_transient());
        assert!(!map_status_error(StatusCode::BAD_REQUEST, b"").is_transient());
        assert!(!map_status_error(StatusCode::UNAUTHORIZED, b"").is_transient());
    }

    #[test]
    fn test_message_includes_body_preview() {
        let error = map_status_error(StatusCode::BAD_REQUEST, b"  bad \n  request  ");
        assert_eq!(
            error,
            ProviderError::Http {
                status: 400,
                message: "status 400: bad request".to_string()
            }
        );
        assert_eq!(
            map_status_error(StatusCode::BAD_REQUEST, b""),
            ProviderError::Http {
                status: 400,
                message: "status 400".to_string()
            }
        );
    }

    #[test]
    fn test_body_preview_truncates() {
        let long = "x".repeat(500);
        let preview = body_preview(long.as_bytes());
        assert_eq!(preview.len(), 163);
        assert!(preview.ends_with("..."));
    }
}
