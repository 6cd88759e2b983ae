// ==============================================================================
// middleware/mod.rs - Auth Gate Middleware Modules
// ==============================================================================
// Description: Basic auth request guard and principal extraction
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-09
// Version: 1.0.0
// ==============================================================================

pub mod auth;

pub use auth::{basic_auth_guard, AuthUser, BasicAuth};
