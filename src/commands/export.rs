use anyhow::{Context, Result};
use std::path::PathBuf;

use nichepulse::config::Config;
use nichepulse::report::{self, SortKey};
use nichepulse::store::NicheStore;

/// Write the niche table as CSV to a file or stdout
pub async fn export(
    mut config: Config,
    sort: Option<&str>,
    output: Option<PathBuf>,
    snapshot: Option<PathBuf>,
) -> Result<()> {
    let key = sort.map(str::parse::<SortKey>).transpose()?;
    if snapshot.is_some() {
        config.store.snapshot_path = snapshot;
    }

    let store = super::open_store(&config).await?;
    let mut niches = store.list_niches().await;
    if let Some(key) = key {
        report::sort_niches(&mut niches, key);
    }
    let csv = report::niches_to_csv(&niches);

    match output {
        Some(path) => {
            tokio::fs::write(&path, csv)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} niches to {}", niches.len(), path.display());
        }
        None => println!("{csv}"),
    }
    Ok(())
}
