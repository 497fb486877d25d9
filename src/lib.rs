use std::sync::Arc;

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

use services::sessions::SessionRegistry;

// Application state
pub struct AppState {
    pub config: config::Config,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        let sessions = SessionRegistry::new(config.max_sessions, config.session_idle());
        Self { config, sessions }
    }
}

/// Builds the full router for the given configuration.
pub fn app(config: config::Config) -> axum::Router {
    routes::router(Arc::new(AppState::new(config)))
}
