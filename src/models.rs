// ==============================================================================
// models.rs - Gateway Response Models
// ==============================================================================
// Description: Response models for the auth gateway service
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-09
// Version: 1.0.0
// ==============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

/// API information response
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Authenticated identity response
#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub username: String,
    pub realm: String,
}
