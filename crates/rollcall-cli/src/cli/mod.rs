//! CLI argument parsing and barrier dispatch.

pub mod args;

use anyhow::{anyhow, bail, Context, Result};
use args::Cli;
use clap::Parser;
use rollcall::{BarrierConfig, PeerId};
use tracing::info;

use crate::logging;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level());

    // Load configuration
    let mut config = match &cli.config {
        Some(path) if !path.exists() => bail!("config file {} not found", path.display()),
        Some(path) => BarrierConfig::load(path)?,
        None => BarrierConfig::default(),
    };
    cli.apply(&mut config);

    let me = local_identity(cli.hostname.clone())?;
    let report = rollcall::run(&config, &cli.hostfile, &me).await?;

    info!(
        peers = report.peers,
        elapsed_ms = report.elapsed.as_millis(),
        "coordinator finished"
    );
    Ok(())
}

/// Identity from the command line, or the system hostname.
fn local_identity(given: Option<String>) -> Result<PeerId> {
    let name = match given {
        Some(name) => name,
        None => hostname::get()
            .context("could not determine system hostname")?
            .into_string()
            .map_err(|_| anyhow!("system hostname is not valid UTF-8"))?,
    };
    PeerId::new(name).context("invalid local identity")
}
