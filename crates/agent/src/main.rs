//! geosync-agent - headless background location sync
//!
//! Reads configuration (a `.env` file is honoured), starts tracking and
//! runs until Ctrl-C. All output goes to the log on stderr.

mod context;

use anyhow::{bail, Context, Result};
use geosync_infra::observability::init_tracing;
use tracing::{info, warn};

use crate::context::AgentContext;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = geosync_infra::config::load().context("failed to load configuration")?;
    init_tracing(&config.logging).context("failed to initialise logging")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "could not load .env file"),
    }

    let ctx = AgentContext::new(config)?;
    info!(
        task_id = %ctx.controller.task_id(),
        endpoint = %ctx.config.api.base_url,
        "geosync agent starting"
    );

    if !ctx.controller.start().await {
        bail!("location tracking could not be started");
    }

    let status = ctx.controller.status().await;
    info!(
        active = status.active,
        last_save = ?status.last_save.map(|record| record.timestamp),
        "tracking started"
    );

    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
    info!("shutdown requested");

    if !ctx.controller.stop().await {
        warn!("location updates did not stop cleanly");
    }

    info!("geosync agent stopped");
    Ok(())
}
