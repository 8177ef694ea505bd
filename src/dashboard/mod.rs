//! HTTP dashboard for niche analysis
//!
//! Serves the REST API over the record store and, optionally, a pre-built
//! front end.
//!
//! ```text
//! GET    /api/health
//! POST   /api/settings/openai-key
//! GET    /api/niches[?sort=trending|growth|competition|revenue]
//! POST   /api/niches
//! GET    /api/niches/export.csv
//! GET    /api/niches/{id}
//! PATCH  /api/niches/{id}
//! DELETE /api/niches/{id}
//! GET    /api/insights/niche
//! GET    /api/insights/monetization
//! GET    /api/recommendations
//! GET    /api/metrics
//! GET    /api/trending
//! POST   /api/analyze
//! GET    /metrics
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod server;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server::{AppState, DashboardServer, ServerError, ServerInfo};
