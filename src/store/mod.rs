//! Storage for analysis records
//!
//! Records live in id-keyed collections with auto-incrementing counters.
//! [`MemoryStore`] is the only backend; it can optionally mirror itself to a
//! JSON snapshot file so data survives restarts.

pub mod memory;
pub mod seed;
pub mod snapshot;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::{
    AnalysisBatch, AnalysisOutcome, MonetizationInsight, Niche, NicheInsight, NicheMetrics,
    NicheUpdate, Recommendation, Record, TrendingDatum,
};

pub use memory::MemoryStore;
pub use snapshot::Snapshot;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Niche names are unique
    #[error("a niche named '{name}' already exists")]
    DuplicateNiche { name: String },

    #[error("snapshot I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("snapshot is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Record counts per collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub niches: usize,
    pub niche_insights: usize,
    pub monetization_insights: usize,
    pub recommendations: usize,
    pub metrics: usize,
    pub trending: usize,
}

/// CRUD operations over the dashboard collections
#[async_trait]
pub trait NicheStore: Send + Sync {
    async fn list_niches(&self) -> Vec<Record<Niche>>;
    async fn get_niche(&self, id: u64) -> Option<Record<Niche>>;
    async fn create_niche(&self, niche: Niche) -> StoreResult<Record<Niche>>;

    /// Merge `update` into a niche; `Ok(None)` when the id is unknown
    async fn update_niche(&self, id: u64, update: NicheUpdate)
        -> StoreResult<Option<Record<Niche>>>;
    async fn delete_niche(&self, id: u64) -> bool;

    /// Insert or replace the niche with the same name, keeping its id
    async fn upsert_niche(&self, niche: Niche) -> Record<Niche>;

    async fn list_niche_insights(&self) -> Vec<Record<NicheInsight>>;
    async fn latest_niche_insight(&self) -> Option<Record<NicheInsight>>;
    async fn create_niche_insight(&self, insight: NicheInsight) -> Record<NicheInsight>;

    async fn list_monetization_insights(&self) -> Vec<Record<MonetizationInsight>>;
    async fn latest_monetization_insight(&self) -> Option<Record<MonetizationInsight>>;
    async fn create_monetization_insight(
        &self,
        insight: MonetizationInsight,
    ) -> Record<MonetizationInsight>;

    async fn list_recommendations(&self) -> Vec<Record<Recommendation>>;
    async fn create_recommendation(&self, recommendation: Recommendation)
        -> Record<Recommendation>;

    /// Metrics row with the highest id
    async fn latest_metrics(&self) -> Option<Record<NicheMetrics>>;
    async fn create_metrics(&self, metrics: NicheMetrics) -> Record<NicheMetrics>;

    async fn list_trending(&self) -> Vec<Record<TrendingDatum>>;
    async fn create_trending(&self, datum: TrendingDatum) -> Record<TrendingDatum>;

    /// Commit every collection of an analysis run under one write
    async fn apply_analysis(&self, batch: AnalysisBatch) -> AnalysisOutcome;

    async fn stats(&self) -> StoreStats;

    /// Persist state if the backend is configured to
    async fn flush(&self) -> StoreResult<()>;
}
