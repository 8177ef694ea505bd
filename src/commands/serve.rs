use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use nichepulse::config::Config;
use nichepulse::dashboard::{AppState, DashboardServer};
use nichepulse::llm::LlmClient;

/// Run the dashboard server until Ctrl+C
pub async fn serve(mut config: Config, bind: Option<String>, static_dir: Option<PathBuf>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind_address = bind
            .parse()
            .with_context(|| format!("Invalid bind address: {bind}"))?;
    }
    if let Some(dir) = static_dir {
        config.server.static_dir = Some(dir);
    }

    if let Err(e) = nichepulse::metrics::init_metrics() {
        tracing::warn!("Metrics initialization failed: {}", e);
    }

    let store = super::open_store(&config).await?;
    let client = LlmClient::with_config(config.openai.clone())
        .context("Failed to create OpenAI client")?;

    if config.openai.api_key.is_none() {
        tracing::warn!("No OpenAI API key configured; set one via POST /api/settings/openai-key");
    }

    let state = AppState::new(Arc::new(store), Arc::new(client));
    let server =
        DashboardServer::new(config.server.clone(), state).context("Failed to create dashboard server")?;

    println!("{}", server.info().display());
    println!();
    println!("API Endpoints:");
    println!("  GET    /api/health                 - Health check");
    println!("  GET    /metrics                    - Prometheus metrics endpoint");
    println!("  POST   /api/settings/openai-key    - Set the OpenAI API key");
    println!("  GET    /api/niches                 - List niches (?sort=)");
    println!("  POST   /api/niches                 - Create a niche");
    println!("  GET    /api/niches/export.csv      - Download niches as CSV");
    println!("  GET    /api/niches/{{id}}            - Get a niche");
    println!("  PATCH  /api/niches/{{id}}            - Update a niche");
    println!("  DELETE /api/niches/{{id}}            - Delete a niche");
    println!("  GET    /api/insights/niche         - Latest competition insight");
    println!("  GET    /api/insights/monetization  - Latest monetization insight");
    println!("  GET    /api/recommendations        - Strategic recommendations");
    println!("  GET    /api/metrics                - Latest headline metrics");
    println!("  GET    /api/trending               - Trending categories");
    println!("  POST   /api/analyze                - Run a new AI analysis");
    println!();
    println!("Dashboard listening on http://{}", config.server.bind_address);
    println!("Press Ctrl+C to stop.\n");

    server
        .start_with_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                }
                Err(e) => {
                    tracing::error!("Failed to wait for Ctrl+C: {}", e);
                }
            }
        })
        .await?;

    println!("Dashboard stopped.");
    Ok(())
}
