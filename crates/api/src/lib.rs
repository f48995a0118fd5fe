//! EcoTrace API - carbon footprint and eco score estimation service
//!
//! HTTP surface over the core scoring pipeline and the ML adapter. All
//! shared state (reference tables, classifier, postcode table) is built once
//! at startup and passed read-only into handlers.

pub mod config;
pub mod dataset;
pub mod error;
pub mod geocode;
pub mod routes;
pub mod scrape;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::ApiError;
pub use server::Server;
pub use state::AppState;
