//! Datagram transports the gossip engine runs over.
//!
//! - **udp**: the production transport, one socket shared by both loops.
//! - **memory**: an in-process network for tests and simulations.

mod memory;
mod udp;

pub use memory::{MemoryNetwork, MemoryTransport};
pub use udp::UdpTransport;

use async_trait::async_trait;
use rollcall_core::PeerId;

/// Unreliable datagram messaging addressed by peer identity.
///
/// Implementations must allow `send_to` and `recv` to run concurrently from
/// different tasks through a shared reference.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Send one datagram to `peer`.
    ///
    /// Success means the datagram was handed off, not that it arrived.
    async fn send_to(&self, peer: &PeerId, payload: &[u8]) -> crate::Result<()>;

    /// Wait for the next datagram and copy it into `buf`.
    ///
    /// Returns the number of bytes written. Datagrams larger than `buf` are
    /// truncated to `buf.len()`.
    async fn recv(&self, buf: &mut [u8]) -> crate::Result<usize>;
}
