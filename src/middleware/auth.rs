// ==============================================================================
// middleware/auth.rs - HTTP Basic Authentication Middleware
// ==============================================================================
// Description: Guard requests with Basic credentials from a credential store
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-23
// Version: 1.0.0
// ==============================================================================
//
// Security: This middleware classifies the Authorization header and either
// records the authenticated principal on the request or short-circuits with
// the realm's 401 challenge. The Authorization header is stripped before the
// inner service runs, so credentials are never re-parsed downstream. Any 401
// the inner service produces has its WWW-Authenticate headers replaced with
// this realm's challenge, so the outward-facing challenge always advertises
// Basic auth for the configured realm.
//
// ==============================================================================

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::{
    challenge::Challenge,
    gate::{evaluate, AuthDecision},
    store::CredentialStore,
};

/// Basic auth middleware configuration
///
/// Bundles the credential store, the realm challenge, and the anonymous
/// policy. Cheap to clone; all clones share the same store.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use axum::{middleware, routing::get, Router};
/// use auth_gate::{challenge::Challenge, middleware::{basic_auth_guard, BasicAuth}, store::StaticCredentials};
///
/// let store: StaticCredentials = [("alice", "secret")].into_iter().collect();
/// let auth = BasicAuth::new(Arc::new(store), Challenge::new("Website").unwrap());
///
/// let app: Router = Router::new()
///     .route("/", get(|| async { "hello" }))
///     .layer(middleware::from_fn_with_state(auth, basic_auth_guard));
/// ```
#[derive(Clone)]
pub struct BasicAuth {
    inner: Arc<BasicAuthInner>,
}

struct BasicAuthInner {
    store: Arc<dyn CredentialStore>,
    challenge: Challenge,
    allow_anonymous: bool,
}

impl BasicAuth {
    /// Create a guard that challenges every unauthenticated request
    pub fn new(store: Arc<dyn CredentialStore>, challenge: Challenge) -> Self {
        Self {
            inner: Arc::new(BasicAuthInner {
                store,
                challenge,
                allow_anonymous: false,
            }),
        }
    }

    /// Let requests without an `Authorization` header through to the inner
    /// service instead of challenging immediately
    ///
    /// No principal is recorded for such requests. Requests that present
    /// malformed or invalid credentials are still challenged, and downstream
    /// 401 responses still get this realm's challenge header.
    pub fn allow_anonymous(&self) -> Self {
        Self {
            inner: Arc::new(BasicAuthInner {
                store: Arc::clone(&self.inner.store),
                challenge: self.inner.challenge.clone(),
                allow_anonymous: true,
            }),
        }
    }

    /// Get the realm challenge
    pub fn challenge(&self) -> &Challenge {
        &self.inner.challenge
    }
}

/// Authenticated principal recorded by [`basic_auth_guard`]
///
/// Handlers behind the guard extract the username with this extractor. If
/// the guard did not record a principal (an anonymous request let through by
/// policy), the request is rejected with 401 Unauthorized.
///
/// # Example
/// ```rust
/// use auth_gate::middleware::AuthUser;
///
/// async fn my_handler(AuthUser(username): AuthUser) -> String {
///     format!("Hello, {}!", username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthUser>() {
            Some(user) => Ok(user.clone()),
            None => Err((StatusCode::UNAUTHORIZED, "Request is not authenticated").into_response()),
        }
    }
}

/// Request guard enforcing HTTP Basic authentication
///
/// Apply with `axum::middleware::from_fn_with_state(auth, basic_auth_guard)`.
/// Authenticated requests reach the inner service with an [`AuthUser`]
/// extension and no `Authorization` header; every other outcome receives the
/// realm's fixed 401 challenge. The reason a request was turned away is
/// logged, never sent to the client.
pub async fn basic_auth_guard(
    State(auth): State<BasicAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    let decision = match request.headers().get(header::AUTHORIZATION) {
        Some(value) => match value.to_str() {
            Ok(raw) => evaluate(Some(raw), auth.inner.store.as_ref()),
            // Present but not visible ASCII: unparseable like any other parse failure
            Err(_) => AuthDecision::Malformed,
        },
        None => evaluate(None, auth.inner.store.as_ref()),
    };

    match decision {
        AuthDecision::Authenticated { username } => {
            debug!("Authenticated request for {}", username);

            request.extensions_mut().insert(AuthUser(username));
            request.headers_mut().remove(header::AUTHORIZATION);

            rewrite_challenge(next.run(request).await, &auth)
        }
        AuthDecision::Anonymous if auth.inner.allow_anonymous => {
            rewrite_challenge(next.run(request).await, &auth)
        }
        AuthDecision::Anonymous => auth.inner.challenge.response(),
        AuthDecision::Malformed => {
            debug!("Unparseable Authorization header");
            auth.inner.challenge.response()
        }
        AuthDecision::Rejected { username } => {
            warn!("Rejected credentials for {}", username);
            auth.inner.challenge.response()
        }
    }
}

/// Replace downstream `WWW-Authenticate` headers on 401 responses
///
/// Only 401 responses are touched; every other status passes through with
/// its headers unchanged.
fn rewrite_challenge(mut response: Response, auth: &BasicAuth) -> Response {
    if response.status() == StatusCode::UNAUTHORIZED {
        let headers = response.headers_mut();
        headers.remove(header::WWW_AUTHENTICATE);
        headers.insert(
            header::WWW_AUTHENTICATE,
            auth.inner.challenge.header_value().clone(),
        );
    }

    response
}

// ==============================================================================
// TESTS
// ==============================================================================
