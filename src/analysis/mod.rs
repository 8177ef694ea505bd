//! Analysis refresh pipeline
//!
//! Asks the [`InsightSource`] for a niche analysis and a trending report,
//! validates both, and commits them to the store in one step. A failure at
//! any stage leaves the store untouched.

pub mod validate;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{ClassifiedError, Result};
use crate::llm::InsightSource;
use crate::models::AnalysisOutcome;
use crate::store::NicheStore;

pub use validate::{ValidationError, ValidationResult};

/// Runs analysis refreshes against a store
pub struct AnalysisService {
    source: Arc<dyn InsightSource>,
    store: Arc<dyn NicheStore>,
    running: Mutex<()>,
}

impl AnalysisService {
    pub fn new(source: Arc<dyn InsightSource>, store: Arc<dyn NicheStore>) -> Self {
        Self {
            source,
            store,
            running: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &Arc<dyn InsightSource> {
        &self.source
    }

    /// Run one refresh; concurrent calls queue behind the one in flight
    pub async fn refresh(&self) -> Result<AnalysisOutcome> {
        let _guard = self.running.lock().await;
        tracing::info!("Starting AI video niche analysis");

        let result = self.run().await;
        if let Err(e) = &result {
            tracing::warn!(
                category = e.category().as_str(),
                recoverable = e.is_recoverable(),
                error = %e,
                "Analysis failed"
            );
        }
        crate::metrics::record_analysis_run(match &result {
            Ok(_) => "success",
            Err(e) if e.is_quota() => "quota_exceeded",
            Err(_) => "failure",
        });

        result
    }

    async fn run(&self) -> Result<AnalysisOutcome> {
        let analysis = self.source.analyze_niches().await?;
        let report = self.source.trending_report().await?;

        let batch = validate::analysis(analysis, report)?;
        tracing::debug!(
            niches = batch.niches.len(),
            recommendations = batch.recommendations.len(),
            trending = batch.trending.len(),
            "Analysis validated"
        );

        let outcome = self.store.apply_analysis(batch).await;

        if let Err(e) = self.store.flush().await {
            tracing::warn!(error = %e, "Failed to persist store after analysis");
        }

        tracing::info!(
            niches = outcome.niches.len(),
            trending = outcome.trending.len(),
            "Analysis complete"
        );
        Ok(outcome)
    }
}
