use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use std::convert::Infallible;

pub const CLIENT_ID_HEADER: &str = "x-client-id";
const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
const ANONYMOUS_CLIENT: &str = "anonymous";
const MAX_CLIENT_ID_LEN: usize = 128;

/// Identifies the submitting client for the submission guard.
///
/// Taken from `x-client-id`, then the first `x-forwarded-for` hop, and
/// falls back to a shared anonymous identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let explicit = header_str(headers, CLIENT_ID_HEADER);
        let forwarded = header_str(headers, FORWARDED_FOR_HEADER)
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        let id = explicit
            .or(forwarded)
            .map(|value| value.chars().take(MAX_CLIENT_ID_LEN).collect())
            .unwrap_or_else(|| ANONYMOUS_CLIENT.to_string());

        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_prefers_explicit_client_id() {
        let mut headers = HeaderMap::new();
        headers.insert(CLIENT_ID_HEADER, HeaderValue::from_static(" browser-123 "));
        headers.insert(FORWARDED_FOR_HEADER, HeaderValue::from_static("10.0.0.1"));
        assert_eq!(ClientId::from_headers(&headers).as_str(), "browser-123");
    }

    #[test]
    fn test_falls_back_to_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            FORWARDED_FOR_HEADER,
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(ClientId::from_headers(&headers).as_str(), "203.0.113.7");
    }

    #[test]
    fn test_anonymous_without_headers() {
        assert_eq!(ClientId::from_headers(&HeaderMap::new()).as_str(), "anonymous");
    }

    #[test]
    fn test_truncates_long_ids() {
        let mut headers = HeaderMap::new();
        let long = "x".repeat(300);
        headers.insert(CLIENT_ID_HEADER, HeaderValue::from_str(&long).unwrap());
        assert_eq!(ClientId::from_headers(&headers).as_str().len(), MAX_CLIENT_ID_LEN);
    }
}
