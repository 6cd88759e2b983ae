// ==============================================================================
// challenge.rs - WWW-Authenticate Challenge Construction
// ==============================================================================
// Description: Realm-scoped 401 challenge response for HTTP Basic auth
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-21
// Version: 1.0.0
// ==============================================================================
//
// Security: Every unauthenticated outcome is answered with the exact same
// response shape (status, headers, body), so a client cannot tell a missing
// header from a wrong password or an unknown user.
//
// ==============================================================================

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use thiserror::Error;

/// Fixed body sent with every 401 challenge response
pub const REJECTION_BODY: &str = "Please authenticate";

/// Challenge construction errors
#[derive(Error, Debug)]
pub enum ChallengeError {
    /// The realm cannot be rendered inside a quoted header value
    #[error("realm {0:?} contains characters not allowed in a quoted header value")]
    InvalidRealm(String),
}

/// Immutable protection-domain label rendered into the challenge header
///
/// Constructed once per gate instance. The realm is validated up front so
/// rendering the `WWW-Authenticate` header and the 401 response can never
/// fail afterwards.
///
/// # Example
/// ```rust
/// use auth_gate::challenge::Challenge;
///
/// let challenge = Challenge::new("Website").unwrap();
/// assert_eq!(challenge.header_value().to_str().unwrap(), "Basic realm=\"Website\"");
/// ```
#[derive(Debug, Clone)]
pub struct Challenge {
    realm: String,
    header: HeaderValue,
}

impl Challenge {
    /// Create a challenge for the given realm
    ///
    /// The realm is inserted verbatim into `Basic realm="<realm>"`, so
    /// realms containing `"`, control characters, or anything else that
    /// cannot appear in a header value are rejected here rather than
    /// producing a corrupt challenge at request time.
    ///
    /// # Errors
    ///
    /// Returns [`ChallengeError::InvalidRealm`] if the realm cannot be
    /// rendered as a quoted header value.
    pub fn new(realm: impl Into<String>) -> Result<Self, ChallengeError> {
        let realm = realm.into();

        if realm.chars().any(|c| c == '"' || c == '\\' || c.is_control()) {
            return Err(ChallengeError::InvalidRealm(realm));
        }

        let header = HeaderValue::from_str(&format!("Basic realm=\"{realm}\""))
            .map_err(|_| ChallengeError::InvalidRealm(realm.clone()))?;

        Ok(Self { realm, header })
    }

    /// Get the realm label
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Get the rendered `WWW-Authenticate` header value
    pub fn header_value(&self) -> &HeaderValue {
        &self.header
    }

    /// Build the 401 challenge response
    ///
    /// Status `401 Unauthorized` with `WWW-Authenticate: Basic realm="<realm>"`,
    /// a plaintext body, and an explicit `Content-Length` matching the body's
    /// byte length. Pure construction; the caller transmits it.
    pub fn response(&self) -> Response {
        let mut response = Response::new(Body::from(REJECTION_BODY));
        *response.status_mut() = StatusCode::UNAUTHORIZED;

        let headers = response.headers_mut();
        headers.insert(header::WWW_AUTHENTICATE, self.header.clone());
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(REJECTION_BODY.len()));

        response
    }
}

// ==============================================================================
// TESTS
// ==============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_header_value_format() {
        let challenge = Challenge::new("Website").unwrap();

        assert_eq!(challenge.realm(), "Website");
        assert_eq!(
            challenge.header_value().to_str().unwrap(),
            "Basic realm=\"Website\""
        );
    }

    #[test]
    fn test_empty_realm_is_allowed() {
        let challenge = Challenge::new("").unwrap();

        assert_eq!(
            challenge.header_value().to_str().unwrap(),
            "Basic realm=\"\""
        );
    }

    #[test]
    fn test_realm_with_quote_is_rejected() {
        assert!(Challenge::new("Web\"site").is_err());
    }

    #[test]
    fn test_realm_with_backslash_is_rejected() {
        assert!(Challenge::new("Web\\site").is_err());
    }

    #[test]
    fn test_realm_with_control_character_is_rejected() {
        assert!(Challenge::new("Web\r\nsite").is_err());
    }

    #[tokio::test]
    async fn test_challenge_response_shape() {
        let challenge = Challenge::new("Website").unwrap();
        let response = challenge.response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"Website\""
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_LENGTH).unwrap(),
            &REJECTION_BODY.len().to_string()
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], REJECTION_BODY.as_bytes());
        assert_eq!(body.len(), 19);
    }
}
