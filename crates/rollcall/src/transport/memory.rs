use async_trait::async_trait;
use parking_lot::Mutex;
use rollcall_core::PeerId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::trace;

use super::Transport;
use crate::error::BarrierError;

/// In-process datagram network.
///
/// Every endpoint gets an unbounded inbox keyed by its identity. Sending to
/// an identity with no endpoint fails like an unresolvable hostname would.
#[derive(Debug, Clone, Default)]
pub struct MemoryNetwork {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    inboxes: Mutex<HashMap<PeerId, mpsc::UnboundedSender<Vec<u8>>>>,
    drop_every: Option<usize>,
    sent: AtomicUsize,
    dropped: AtomicUsize,
}

impl MemoryNetwork {
    /// A network that delivers every datagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// A network that silently drops every `n`th datagram sent (`n >= 2`).
    pub fn lossy(n: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                drop_every: Some(n.max(2)),
                ..Inner::default()
            }),
        }
    }

    /// Attach an endpoint for `id`, replacing any previous one.
    pub fn endpoint(&self, id: PeerId) -> MemoryTransport {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.inboxes.lock().insert(id, tx);
        MemoryTransport {
            network: Arc::clone(&self.inner),
            inbox: tokio::sync::Mutex::new(rx),
        }
    }

    /// Datagrams handed to the network so far, including dropped ones.
    pub fn sent(&self) -> usize {
        self.inner.sent.load(Ordering::Relaxed)
    }

    /// Datagrams discarded by the loss model.
    pub fn dropped(&self) -> usize {
        self.inner.dropped.load(Ordering::Relaxed)
    }
}

/// One endpoint on a [`MemoryNetwork`].
#[derive(Debug)]
pub struct MemoryTransport {
    network: Arc<Inner>,
    inbox: tokio::sync::Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send_to(&self, peer: &PeerId, payload: &[u8]) -> crate::Result<()> {
        let inbox = self
            .network
            .inboxes
            .lock()
            .get(peer)
            .cloned()
            .ok_or_else(|| BarrierError::Resolve {
                peer: peer.clone(),
                reason: "no such endpoint".into(),
            })?;

        let seq = self.network.sent.fetch_add(1, Ordering::Relaxed) + 1;
        if self.network.drop_every.is_some_and(|n| seq % n == 0) {
            self.network.dropped.fetch_add(1, Ordering::Relaxed);
            trace!(peer = %peer, seq, "datagram dropped");
            return Ok(());
        }

        // A closed inbox behaves like a host that stopped listening.
        let _ = inbox.send(payload.to_vec());
        Ok(())
    }

    async fn recv(&self, buf: &mut [u8]) -> crate::Result<usize> {
        let datagram = self.inbox.lock().await.recv().await.ok_or_else(|| {
            BarrierError::Recv(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "endpoint detached from network",
            ))
        })?;
        let len = datagram.len().min(buf.len());
        buf[..len].copy_from_slice(&datagram[..len]);
        Ok(len)
    }
}
