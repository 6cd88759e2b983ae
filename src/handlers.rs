// ==============================================================================
// handlers.rs - Gateway Request Handlers
// ==============================================================================
// Description: HTTP request handlers for the auth gateway service
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-21
// Version: 1.0.0
// ==============================================================================

use axum::{extract::State, Json};
use chrono::Utc;

use auth_gate::middleware::{AuthUser, BasicAuth};

use crate::models::{ApiInfoResponse, HealthResponse, WhoamiResponse};

/// Root endpoint - API information
pub async fn root() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "Basic Auth Gateway",
        version: "1.0.0",
        endpoints: vec![
            "/health - Health check",
            "/api/whoami - Authenticated identity (GET, Basic auth)",
        ],
    })
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: "1.0.0",
        timestamp: Utc::now(),
    })
}

/// Authenticated identity endpoint
///
/// Only reachable through the basic auth guard, which records the principal
/// and strips the Authorization header before the request lands here.
pub async fn whoami(
    State(auth): State<BasicAuth>,
    AuthUser(username): AuthUser,
) -> Json<WhoamiResponse> {
    Json(WhoamiResponse {
        username,
        realm: auth.challenge().realm().to_string(),
    })
}
