//! In-memory store backed by id-keyed maps
//!
//! All collections sit behind one `tokio` read/write lock. Ids come from a
//! per-collection counter that only moves forward, so a deleted id is never
//! handed out again.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::seed::sample_batch;
use super::snapshot::Snapshot;
use super::{NicheStore, StoreError, StoreResult, StoreStats};
use crate::models::{
    AnalysisBatch, AnalysisOutcome, MonetizationInsight, Niche, NicheInsight, NicheMetrics,
    NicheUpdate, Recommendation, Record, TrendingDatum,
};

// ============================================================================
// Collection
// ============================================================================

/// Records of one kind, ordered by id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection<T> {
    records: BTreeMap<u64, Record<T>>,
    next_id: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Collection<T> {
    pub fn insert(&mut self, fields: T) -> Record<T> {
        let id = self.next_id;
        self.next_id += 1;
        let record = Record::new(id, fields);
        self.records.insert(id, record.clone());
        record
    }

    pub fn get(&self, id: u64) -> Option<&Record<T>> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Record<T>> {
        self.records.get_mut(&id)
    }

    pub fn remove(&mut self, id: u64) -> Option<Record<T>> {
        self.records.remove(&id)
    }

    pub fn all(&self) -> Vec<Record<T>> {
        self.records.values().cloned().collect()
    }

    /// Record with the highest id
    pub fn latest(&self) -> Option<Record<T>> {
        self.records.values().next_back().cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record<T>> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}

// ============================================================================
// Snapshot-level operations
// ============================================================================

impl Snapshot {
    fn niche_id_by_name(&self, name: &str) -> Option<u64> {
        self.niches.iter().find(|n| n.name == name).map(|n| n.id)
    }

    fn upsert_niche(&mut self, niche: Niche) -> Record<Niche> {
        if let Some(record) = self
            .niches
            .records
            .values_mut()
            .find(|n| n.name == niche.name)
        {
            record.fields = niche;
            return record.clone();
        }
        self.niches.insert(niche)
    }

    fn apply(&mut self, batch: AnalysisBatch) -> AnalysisOutcome {
        let niches = batch
            .niches
            .into_iter()
            .map(|n| self.upsert_niche(n))
            .collect();
        let niche_insight = self.niche_insights.insert(batch.niche_insight);
        let monetization_insight = self.monetization_insights.insert(batch.monetization_insight);
        let recommendations = batch
            .recommendations
            .into_iter()
            .map(|r| self.recommendations.insert(r))
            .collect();
        let metrics = self.metrics.insert(batch.metrics);
        let trending = batch
            .trending
            .into_iter()
            .map(|t| self.trending.insert(t))
            .collect();

        AnalysisOutcome {
            niches,
            niche_insight,
            monetization_insight,
            recommendations,
            metrics,
            trending,
        }
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// Thread-safe in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<Snapshot>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the sample data
    pub fn seeded() -> Self {
        let mut snapshot = Snapshot::default();
        snapshot.apply(sample_batch());
        Self::from_snapshot(snapshot)
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
            snapshot_path: None,
        }
    }

    /// Mirror the store to `path` on every [`NicheStore::flush`]
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Open a store from configuration
    ///
    /// An existing snapshot file wins over seeding. Without one the store
    /// starts with sample data when `seed` is set, empty otherwise.
    pub async fn open(snapshot_path: Option<&Path>, seed: bool) -> StoreResult<Self> {
        let loaded = match snapshot_path {
            Some(path) => Snapshot::load_from_file(path).await?,
            None => None,
        };

        let store = match loaded {
            Some(snapshot) => {
                tracing::info!(
                    niches = snapshot.niches.len(),
                    "Loaded store snapshot"
                );
                Self::from_snapshot(snapshot)
            }
            None if seed => Self::seeded(),
            None => Self::new(),
        };

        Ok(match snapshot_path {
            Some(path) => store.with_snapshot_path(path),
            None => store,
        })
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }
}

#[async_trait]
impl NicheStore for MemoryStore {
    async fn list_niches(&self) -> Vec<Record<Niche>> {
        self.state.read().await.niches.all()
    }

    async fn get_niche(&self, id: u64) -> Option<Record<Niche>> {
        self.state.read().await.niches.get(id).cloned()
    }

    async fn create_niche(&self, niche: Niche) -> StoreResult<Record<Niche>> {
        let mut state = self.state.write().await;
        if state.niche_id_by_name(&niche.name).is_some() {
            return Err(StoreError::DuplicateNiche { name: niche.name });
        }
        Ok(state.niches.insert(niche))
    }

    async fn update_niche(
        &self,
        id: u64,
        update: NicheUpdate,
    ) -> StoreResult<Option<Record<Niche>>> {
        let mut state = self.state.write().await;

        if let Some(name) = update.name.as_deref() {
            if state.niche_id_by_name(name).is_some_and(|other| other != id) {
                return Err(StoreError::DuplicateNiche {
                    name: name.to_string(),
                });
            }
        }

        Ok(state.niches.get_mut(id).map(|record| {
            record.apply(update);
            record.clone()
        }))
    }

    async fn delete_niche(&self, id: u64) -> bool {
        self.state.write().await.niches.remove(id).is_some()
    }

    async fn upsert_niche(&self, niche: Niche) -> Record<Niche> {
        self.state.write().await.upsert_niche(niche)
    }

    async fn list_niche_insights(&self) -> Vec<Record<NicheInsight>> {
        self.state.read().await.niche_insights.all()
    }

    async fn latest_niche_insight(&self) -> Option<Record<NicheInsight>> {
        self.state.read().await.niche_insights.latest()
    }

    async fn create_niche_insight(&self, insight: NicheInsight) -> Record<NicheInsight> {
        self.state.write().await.niche_insights.insert(insight)
    }

    async fn list_monetization_insights(&self) -> Vec<Record<MonetizationInsight>> {
        self.state.read().await.monetization_insights.all()
    }

    async fn latest_monetization_insight(&self) -> Option<Record<MonetizationInsight>> {
        self.state.read().await.monetization_insights.latest()
    }

    async fn create_monetization_insight(
        &self,
        insight: MonetizationInsight,
    ) -> Record<MonetizationInsight> {
        self.state.write().await.monetization_insights.insert(insight)
    }

    async fn list_recommendations(&self) -> Vec<Record<Recommendation>> {
        self.state.read().await.recommendations.all()
    }

    async fn create_recommendation(
        &self,
        recommendation: Recommendation,
    ) -> Record<Recommendation> {
        self.state.write().await.recommendations.insert(recommendation)
    }

    async fn latest_metrics(&self) -> Option<Record<NicheMetrics>> {
        self.state.read().await.metrics.latest()
    }

    async fn create_metrics(&self, metrics: NicheMetrics) -> Record<NicheMetrics> {
        self.state.write().await.metrics.insert(metrics)
    }

    async fn list_trending(&self) -> Vec<Record<TrendingDatum>> {
        self.state.read().await.trending.all()
    }

    async fn create_trending(&self, datum: TrendingDatum) -> Record<TrendingDatum> {
        self.state.write().await.trending.insert(datum)
    }

    async fn apply_analysis(&self, batch: AnalysisBatch) -> AnalysisOutcome {
        self.state.write().await.apply(batch)
    }

    async fn stats(&self) -> StoreStats {
        self.state.read().await.stats()
    }

    async fn flush(&self) -> StoreResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let snapshot = self.snapshot().await;
        snapshot.save_to_file(path).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn niche(name: &str) -> Niche {
        Niche {
            name: name.to_string(),
            growth_rate: 10.0,
            competition: "Low".to_string(),
            revenue_potential: 8.5,
            trend: "up".to_string(),
        }
    }

    #[tokio::test]
    async fn test_seeded_store_contents() {
        let store = MemoryStore::seeded();
        let stats = store.stats().await;

        assert_eq!(stats.niches, 10);
        assert_eq!(stats.niche_insights, 1);
        assert_eq!(stats.monetization_insights, 1);
        assert_eq!(stats.recommendations, 2);
        assert_eq!(stats.metrics, 1);
        assert_eq!(stats.trending, 10);

        let first = store.get_niche(1).await.unwrap();
        assert_eq!(first.name, "Gaming Commentary");
    }

    #[tokio::test]
    async fn test_ids_increment_and_never_reuse() {
        let store = MemoryStore::new();
        let a = store.create_niche(niche("A")).await.unwrap();
        let b = store.create_niche(niche("B")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        assert!(store.delete_niche(b.id).await);
        let c = store.create_niche(niche("C")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn test_list_in_id_order() {
        let store = MemoryStore::new();
        for name in ["Z", "A", "M"] {
            store.create_niche(niche(name)).await.unwrap();
        }
        let names: Vec<_> = store
            .list_niches()
            .await
            .into_iter()
            .map(|n| n.fields.name)
            .collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let store = MemoryStore::new();
        store.create_niche(niche("AI Art")).await.unwrap();
        let err = store.create_niche(niche("AI Art")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateNiche { .. }));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        let created = store.create_niche(niche("AI Art")).await.unwrap();

        let updated = store
            .update_niche(
                created.id,
                NicheUpdate {
                    revenue_potential: Some(12.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.revenue_potential, 12.0);
        assert_eq!(updated.name, "AI Art");
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = MemoryStore::new();
        let result = store.update_niche(42, NicheUpdate::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_rejected() {
        let store = MemoryStore::new();
        store.create_niche(niche("A")).await.unwrap();
        let b = store.create_niche(niche("B")).await.unwrap();

        let result = store
            .update_niche(
                b.id,
                NicheUpdate {
                    name: Some("A".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(result.is_err());

        // Renaming to its own name is fine
        let same = store
            .update_niche(
                b.id,
                NicheUpdate {
                    name: Some("B".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(same.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let store = MemoryStore::new();
        assert!(!store.delete_niche(1).await);
    }

    #[tokio::test]
    async fn test_upsert_keeps_id() {
        let store = MemoryStore::new();
        let original = store.create_niche(niche("AI Art")).await.unwrap();

        let mut changed = niche("AI Art");
        changed.growth_rate = 55.0;
        let upserted = store.upsert_niche(changed).await;

        assert_eq!(upserted.id, original.id);
        assert_eq!(upserted.growth_rate, 55.0);
        assert_eq!(store.list_niches().await.len(), 1);
    }

    #[tokio::test]
    async fn test_latest_is_highest_id() {
        let store = MemoryStore::seeded();
        let mut metrics = store.latest_metrics().await.unwrap().into_fields();
        metrics.top_growing_niche = "AI Coding Assistants".to_string();
        store.create_metrics(metrics).await;

        let latest = store.latest_metrics().await.unwrap();
        assert_eq!(latest.id, 2);
        assert_eq!(latest.top_growing_niche, "AI Coding Assistants");
    }

    #[tokio::test]
    async fn test_empty_store_has_no_latest() {
        let store = MemoryStore::new();
        assert!(store.latest_metrics().await.is_none());
        assert!(store.latest_niche_insight().await.is_none());
        assert!(store.latest_monetization_insight().await.is_none());
    }

    #[tokio::test]
    async fn test_apply_analysis_appends_and_upserts() {
        let store = MemoryStore::seeded();
        let mut batch = sample_batch();
        batch.niches.truncate(1);
        batch.niches.push(niche("Prompt Engineering"));

        let outcome = store.apply_analysis(batch).await;

        assert_eq!(outcome.niches[0].id, 1);
        assert_eq!(outcome.niches[1].id, 11);
        assert_eq!(outcome.niche_insight.id, 2);
        assert_eq!(outcome.metrics.id, 2);
        assert_eq!(outcome.trending.first().map(|t| t.id), Some(11));

        let stats = store.stats().await;
        assert_eq!(stats.niches, 11);
        assert_eq!(stats.recommendations, 4);
        assert_eq!(stats.trending, 20);
    }

    #[tokio::test]
    async fn test_flush_without_path_is_noop() {
        let store = MemoryStore::seeded();
        assert!(store.snapshot_path().is_none());
        assert!(store.flush().await.is_ok());
    }

    #[test]
    fn test_collection_counter() {
        let mut collection: Collection<Recommendation> = Collection::default();
        assert!(collection.is_empty());
        assert_eq!(collection.next_id(), 1);

        collection.insert(Recommendation {
            title: "t".to_string(),
            description: "d".to_string(),
        });
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.next_id(), 2);
    }
}
