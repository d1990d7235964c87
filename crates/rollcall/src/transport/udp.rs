use async_trait::async_trait;
use rollcall_core::PeerId;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{debug, info};

use super::Transport;
use crate::error::BarrierError;

/// UDP transport. Peers are resolved by hostname on every send.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    peer_port: u16,
}

impl UdpTransport {
    /// Bind a socket on `addr` and address peers on `peer_port`.
    pub async fn bind(addr: SocketAddr, peer_port: u16) -> crate::Result<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| BarrierError::Bind { addr, source })?;
        info!(addr = %addr, "UDP socket bound");
        Ok(Self { socket, peer_port })
    }

    /// Address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> crate::Result<SocketAddr> {
        self.socket.local_addr().map_err(BarrierError::Recv)
    }

    async fn resolve(&self, peer: &PeerId) -> crate::Result<SocketAddr> {
        debug!(peer = %peer, "resolving peer");
        let want_v4 = self.socket.local_addr().map_or(true, |a| a.is_ipv4());
        let mut addrs = tokio::net::lookup_host((peer.as_str(), self.peer_port))
            .await
            .map_err(|e| BarrierError::Resolve {
                peer: peer.clone(),
                reason: e.to_string(),
            })?;

        addrs
            .find(|a| a.is_ipv4() == want_v4)
            .ok_or_else(|| BarrierError::Resolve {
                peer: peer.clone(),
                reason: format!(
                    "no {} address found",
                    if want_v4 { "IPv4" } else { "IPv6" }
                ),
            })
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn send_to(&self, peer: &PeerId, payload: &[u8]) -> crate::Result<()> {
        let addr = self.resolve(peer).await?;
        self.socket
            .send_to(payload, addr)
            .await
            .map_err(|source| BarrierError::Send {
                peer: peer.clone(),
                source,
            })?;
        Ok(())
    }

    async fn recv(&self, buf: &mut [u8]) -> crate::Result<usize> {
        let (len, from) = self.socket.recv_from(buf).await.map_err(BarrierError::Recv)?;
        debug!(from = %from, len, "datagram received");
        Ok(len)
    }
}
