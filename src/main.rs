// ==============================================================================
// main.rs - Basic Auth Gateway Entry Point
// ==============================================================================
// Description: Axum web server guarding its API behind HTTP Basic auth
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-23
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use axum::{middleware::from_fn_with_state, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, Level};

use auth_gate::{
    challenge::Challenge,
    middleware::{basic_auth_guard, BasicAuth},
    store::JsonCredentials,
};

mod handlers;
mod models;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    info!("Starting Basic Auth Gateway v1.0.0");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Build the auth guard from environment configuration
    let auth = build_auth().context("Failed to load authentication configuration")?;
    info!("Guarding realm {:?}", auth.challenge().realm());

    // Build router with all endpoints
    let app = build_router(auth);

    // Bind server
    let server_port = std::env::var("GATEWAY_PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8099);

    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build the basic auth guard from environment configuration
///
/// AUTH_CREDENTIALS holds a JSON object mapping usernames to passwords.
/// AUTH_REALM names the protection domain (default "Website").
/// AUTH_ALLOW_ANONYMOUS=true lets requests without credentials through to
/// public handlers instead of challenging at the gate.
fn build_auth() -> Result<BasicAuth> {
    let realm = std::env::var("AUTH_REALM").unwrap_or_else(|_| "Website".to_string());
    let challenge = Challenge::new(realm).context("Invalid AUTH_REALM")?;

    let store = JsonCredentials::from_env("AUTH_CREDENTIALS")
        .context("Failed to load credentials from AUTH_CREDENTIALS")?;

    let allow_anonymous = std::env::var("AUTH_ALLOW_ANONYMOUS")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let auth = BasicAuth::new(Arc::new(store), challenge);

    Ok(if allow_anonymous {
        auth.allow_anonymous()
    } else {
        auth
    })
}

fn build_router(auth: BasicAuth) -> Router {
    // Every route under /api sits behind the basic auth guard
    let api_routes = Router::new()
        .route("/whoami", get(handlers::whoami))
        .layer(from_fn_with_state(auth.clone(), basic_auth_guard));

    // Configure CORS; origins come from CORS_ALLOWED_ORIGINS (comma-separated)
    let cors_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    let allowed_origins: Vec<_> = cors_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        // Allow specific origins from environment
        .allow_origin(AllowOrigin::list(allowed_origins))
        // Browsers must be allowed to send the Authorization header
        .allow_credentials(true)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    // Combine all routes
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                // Request tracing
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(auth)
}
