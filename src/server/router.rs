//! Middleware shared by every route: sessions, CORS, request tracing

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::{ServerConfig, SessionConfig};

/// Cookie sessions kept in process memory
pub fn session_layer(config: &SessionConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(config.cookie_name.clone())
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::minutes(config.inactivity_minutes),
        ))
        .with_secure(config.secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// CORS for the configured origins, or `None` when none are configured.
///
/// Credentials are allowed, so methods and headers are listed explicitly.
pub fn cors_layer(config: &ServerConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| {
            let trimmed = origin.trim();
            match HeaderValue::from_str(trimmed) {
                Ok(value) if !trimmed.is_empty() => Some(value),
                _ => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PATCH])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}

/// Wrap `router` in the session, CORS and trace layers.
pub fn with_middleware(router: Router, server: &ServerConfig, session: &SessionConfig) -> Router {
    let router = router.layer(session_layer(session));
    let router = match cors_layer(server) {
        Some(cors) => router.layer(cors),
        None => router,
    };
    router.layer(TraceLayer::new_for_http())
}
