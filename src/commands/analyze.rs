use anyhow::{Context, Result};
use std::sync::Arc;

use nichepulse::analysis::AnalysisService;
use nichepulse::config::Config;
use nichepulse::llm::LlmClient;

/// Run one refresh against the configured store and print the outcome
pub async fn analyze(config: Config, pretty: bool) -> Result<()> {
    let store = Arc::new(super::open_store(&config).await?);
    let client = LlmClient::with_config(config.openai.clone())
        .context("Failed to create OpenAI client")?;

    let service = AnalysisService::new(Arc::new(client), store);
    let outcome = service.refresh().await.context("Analysis failed")?;

    let json = if pretty {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string(&outcome)?
    };
    println!("{json}");

    if config.store.snapshot_path.is_none() {
        tracing::warn!("No snapshot path configured; results were not saved");
    }
    Ok(())
}
