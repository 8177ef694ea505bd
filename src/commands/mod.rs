pub mod analyze;
pub mod export;
pub mod serve;

use anyhow::{Context, Result};

use nichepulse::config::Config;
use nichepulse::store::MemoryStore;

// Re-export command functions for convenience
pub use analyze::analyze;
pub use export::export;
pub use serve::serve;

/// Open the store described by the config
pub(crate) async fn open_store(config: &Config) -> Result<MemoryStore> {
    MemoryStore::open(
        config.store.snapshot_path.as_deref(),
        config.store.seed_sample_data,
    )
    .await
    .context("Failed to open store")
}

/// Print the effective configuration with the API key masked
pub fn show_config(config: &Config) -> Result<()> {
    let rendered =
        toml::to_string_pretty(&config.redacted()).context("Failed to render configuration")?;
    println!("{rendered}");
    Ok(())
}
