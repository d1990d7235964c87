//! Error types for the rollcall barrier.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use rollcall_core::{CoreError, PeerId};
use thiserror::Error;

/// Errors that can occur while running a barrier round.
///
/// Only startup errors and [`BarrierError::Timeout`] ever escape
/// [`crate::run`]; send and resolve failures are logged by the gossip loops
/// and retried on the next sweep.
#[derive(Error, Debug)]
pub enum BarrierError {
    /// Socket could not be bound.
    #[error("failed to bind UDP socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Roster file could not be read.
    #[error("failed to read roster {}: {source}", .path.display())]
    RosterRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Roster contents or local identity are invalid.
    #[error("roster error: {0}")]
    Roster(#[from] CoreError),

    /// Configuration is invalid or unreadable.
    #[error("config error: {0}")]
    Config(String),

    /// Peer identity did not resolve to a usable address.
    #[error("failed to resolve peer {peer}: {reason}")]
    Resolve { peer: PeerId, reason: String },

    /// Datagram could not be sent.
    #[error("failed to send to {peer}: {source}")]
    Send {
        peer: PeerId,
        #[source]
        source: std::io::Error,
    },

    /// Datagram could not be received.
    #[error("receive failed: {0}")]
    Recv(#[source] std::io::Error),

    /// Overall deadline expired before every peer was ready.
    #[error("barrier not satisfied after {waited:?}; still waiting for {}", format_pending(.pending))]
    Timeout {
        waited: Duration,
        pending: Vec<PeerId>,
    },

    /// A gossip task panicked or was aborted.
    #[error("gossip task failed: {0}")]
    Task(String),
}

fn format_pending(pending: &[PeerId]) -> String {
    pending
        .iter()
        .map(PeerId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
