//! Peer roster.

use std::collections::HashSet;

use super::peer::PeerId;
use crate::error::{CoreError, Result};

/// Ordered, immutable list of barrier participants, including ourselves.
///
/// The position of each peer is its index into the readiness table. Indices
/// are internal to the process and never sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    peers: Vec<PeerId>,
    local: usize,
}

impl Roster {
    /// Build a roster from an ordered peer list and the local identity.
    ///
    /// Fails if the list is empty, contains duplicates, or does not contain
    /// `local`.
    pub fn new(peers: Vec<PeerId>, local: &PeerId) -> Result<Self> {
        if peers.is_empty() {
            return Err(CoreError::EmptyRoster);
        }

        let mut seen = HashSet::with_capacity(peers.len());
        for peer in &peers {
            if !seen.insert(peer) {
                return Err(CoreError::DuplicatePeer(peer.to_string()));
            }
        }

        let local = peers
            .iter()
            .position(|p| p == local)
            .ok_or_else(|| CoreError::SelfNotInRoster(local.to_string()))?;

        Ok(Self { peers, local })
    }

    /// Parse a newline-delimited host list.
    ///
    /// One identity per line, order preserved. Trailing `\r` is stripped,
    /// blank lines and lines starting with `#` are skipped.
    pub fn parse(text: &str, local: &PeerId) -> Result<Self> {
        let peers = text
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
            .map(PeerId::new)
            .collect::<Result<Vec<_>>>()?;

        Self::new(peers, local)
    }

    /// All peers in roster order.
    pub fn peers(&self) -> &[PeerId] {
        &self.peers
    }

    /// Number of participants, including ourselves.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Always false; a roster holds at least the local peer.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Index of the local peer.
    pub const fn local_index(&self) -> usize {
        self.local
    }

    /// The local peer's identity.
    pub fn local(&self) -> &PeerId {
        &self.peers[self.local]
    }

    /// Resolve an identity to its roster index.
    pub fn index_of(&self, id: &PeerId) -> Option<usize> {
        self.peers.iter().position(|p| p == id)
    }

    /// Peer at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&PeerId> {
        self.peers.get(index)
    }

    /// Every peer except ourselves, with its index.
    pub fn remotes(&self) -> impl Iterator<Item = (usize, &PeerId)> + '_ {
        self.peers
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != self.local)
    }
}
