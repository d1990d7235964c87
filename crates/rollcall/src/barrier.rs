//! Process-level entry point: load, bind, wait, gossip.

use rollcall_core::PeerId;
use std::path::Path;
use tracing::info;

use crate::config::BarrierConfig;
use crate::gossip::{BarrierReport, GossipEngine};
use crate::roster::load_roster;
use crate::transport::UdpTransport;

/// Run one barrier round over UDP.
///
/// Reads the roster from `hostfile`, binds the socket, waits the configured
/// startup delay, then gossips until every peer is ready. Startup failures
/// (bad config, unreadable roster, `local` missing from it, bind failure)
/// are returned before any datagram is sent.
pub async fn run(config: &BarrierConfig, hostfile: &Path, local: &PeerId) -> crate::Result<BarrierReport> {
    config.validate()?;
    info!(local = %local, "starting rollcall");

    let roster = load_roster(hostfile, local).await?;
    let transport = UdpTransport::bind(config.bind_addr(), config.port).await?;

    let delay = config.startup_delay();
    if !delay.is_zero() {
        info!(delay_ms = delay.as_millis(), "waiting before first sweep");
        tokio::time::sleep(delay).await;
    }

    GossipEngine::new(roster, transport, config).run().await
}
