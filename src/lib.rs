//! nichepulse - AI-assisted YouTube niche analysis dashboard
//!
//! Keeps niches, insights, recommendations and trending data in an
//! in-memory store, refreshes them through an OpenAI chat completion, and
//! serves everything over a JSON REST API.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`models`] - Core record types
//! - [`store`] - In-memory record store with optional JSON snapshots
//! - [`llm`] - OpenAI client and the structured documents it returns
//! - [`analysis`] - Validation and the analysis refresh pipeline
//! - [`report`] - Sorting and CSV export of the niche table
//! - [`dashboard`] - HTTP server and REST API
//! - [`metrics`] - Prometheus metrics
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use nichepulse::dashboard::{AppState, DashboardServer, ServerConfig};
//! use nichepulse::llm::LlmClient;
//! use nichepulse::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let state = AppState::new(Arc::new(MemoryStore::seeded()), Arc::new(LlmClient::from_env()?));
//!     DashboardServer::new(ServerConfig::default(), state)?.start().await?;
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod report;
pub mod store;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analysis::AnalysisService;
    pub use crate::config::Config;
    pub use crate::error::{ClassifiedError, Error, ErrorCategory, Result};
    pub use crate::llm::{InsightSource, LlmClient};
    pub use crate::models::{Niche, Record};
    pub use crate::store::{MemoryStore, NicheStore};
}

// Direct re-exports for convenience
pub use models::{Niche, Record};
