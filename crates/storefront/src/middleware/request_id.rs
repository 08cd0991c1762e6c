//! Request ID middleware for tracing and Sentry correlation.
//!
//! Reuses an `x-request-id` set by a proxy when it looks sane, otherwise
//! generates a UUID v4. The ID is recorded on the current span, tagged in the
//! Sentry scope, and echoed back in the response.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound ID accepted verbatim.
const MAX_INBOUND_LEN: usize = 128;

/// Inbound request ID, if present and made of visible ASCII.
fn inbound_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| {
            !id.is_empty() && id.len() <= MAX_INBOUND_LEN && id.bytes().all(|b| b.is_ascii_graphic())
        })
        .map(String::from)
}

/// Ensure every request carries a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id =
        inbound_request_id(request.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_id_is_reused_when_sane() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(" cf-ray-8a1b2c "));
        assert_eq!(inbound_request_id(&headers).as_deref(), Some("cf-ray-8a1b2c"));
    }

    #[test]
    fn test_inbound_id_rejected_when_odd() {
        let mut headers = HeaderMap::new();
        assert_eq!(inbound_request_id(&headers), None);

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("two words"));
        assert_eq!(inbound_request_id(&headers), None);

        let long = "a".repeat(MAX_INBOUND_LEN + 1);
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(&long).unwrap());
        assert_eq!(inbound_request_id(&headers), None);
    }
}
