//! JSON snapshot of the whole store

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::memory::Collection;
use super::{StoreError, StoreResult, StoreStats};
use crate::models::{
    MonetizationInsight, Niche, NicheInsight, NicheMetrics, Recommendation, TrendingDatum,
};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Every collection with its id counter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    pub niches: Collection<Niche>,
    pub niche_insights: Collection<NicheInsight>,
    pub monetization_insights: Collection<MonetizationInsight>,
    pub recommendations: Collection<Recommendation>,
    pub metrics: Collection<NicheMetrics>,
    pub trending: Collection<TrendingDatum>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            niches: Collection::default(),
            niche_insights: Collection::default(),
            monetization_insights: Collection::default(),
            recommendations: Collection::default(),
            metrics: Collection::default(),
            trending: Collection::default(),
        }
    }
}

impl Snapshot {
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            niches: self.niches.len(),
            niche_insights: self.niche_insights.len(),
            monetization_insights: self.monetization_insights.len(),
            recommendations: self.recommendations.len(),
            metrics: self.metrics.len(),
            trending: self.trending.len(),
        }
    }

    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot written by this version of the store
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }

    /// Write to `path`, replacing any previous snapshot atomically
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let json = self.to_json()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }

        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| io_error(path, e))?;

        tracing::debug!(path = %path.display(), "Snapshot saved");
        Ok(())
    }

    /// Read a snapshot; `Ok(None)` when the file does not exist yet
    pub async fn load_from_file(path: impl AsRef<Path>) -> StoreResult<Option<Self>> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(json) => Self::from_json(&json).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(path, e)),
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = Snapshot::load_from_file(dir.path().join("absent.json"))
            .await
            .unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/store.json");

        Snapshot::default().save_to_file(&path).await.unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
        let loaded = Snapshot::load_from_file(&path).await.unwrap().unwrap();
        assert_eq!(loaded.version, SNAPSHOT_VERSION);
        assert_eq!(loaded.stats(), StoreStats::default());
    }

    #[test]
    fn test_other_version_is_rejected() {
        let mut value = serde_json::to_value(Snapshot::default()).unwrap();
        value["version"] = serde_json::json!(SNAPSHOT_VERSION + 1);

        let err = Snapshot::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedVersion { found, expected }
                if found == SNAPSHOT_VERSION + 1 && expected == SNAPSHOT_VERSION
        ));
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            Snapshot::from_json("not json"),
            Err(StoreError::Serialization(_))
        ));
    }
}
