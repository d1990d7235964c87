//! Readiness state: which peers have been confirmed at the barrier.

use parking_lot::Mutex;
use rollcall_core::{PeerId, Roster};

use crate::config::AckPolicy;

/// Per-peer readiness table shared by the broadcast and receive loops.
///
/// Slots only ever go from not-ready to ready. All updates happen under a
/// single lock; reads used for loop termination are snapshots that may be
/// one update stale.
#[derive(Debug)]
pub struct ReadinessState {
    roster: Roster,
    slots: Mutex<Slots>,
}

#[derive(Debug)]
struct Slots {
    ready: Vec<bool>,
    acked: Vec<bool>,
    remaining: usize,
    unacked: usize,
}

impl ReadinessState {
    /// Create the table with only the local slot ready.
    pub fn new(roster: Roster) -> Self {
        let len = roster.len();
        let mut ready = vec![false; len];
        ready[roster.local_index()] = true;
        let mut acked = vec![false; len];
        acked[roster.local_index()] = true;

        Self {
            roster,
            slots: Mutex::new(Slots {
                ready,
                acked,
                remaining: len - 1,
                unacked: len - 1,
            }),
        }
    }

    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Resolve a sender identity. Unknown identities yield `None`.
    pub fn index_of(&self, id: &PeerId) -> Option<usize> {
        self.roster.index_of(id)
    }

    /// Mark a peer ready.
    ///
    /// Idempotent. Returns `true` only for the call that flipped the last
    /// outstanding slot, so callers can signal completion exactly once.
    pub fn mark_ready(&self, index: usize) -> bool {
        let mut slots = self.slots.lock();
        match slots.ready.get_mut(index) {
            Some(slot) if !*slot => {
                *slot = true;
                slots.remaining -= 1;
                slots.remaining == 0
            }
            _ => false,
        }
    }

    /// Record that a peer acknowledged our `READY`.
    ///
    /// Returns `true` only for the call that recorded the last outstanding
    /// acknowledgement.
    pub fn mark_acked(&self, index: usize) -> bool {
        let mut slots = self.slots.lock();
        match slots.acked.get_mut(index) {
            Some(slot) if !*slot => {
                *slot = true;
                slots.unacked -= 1;
                slots.unacked == 0
            }
            _ => false,
        }
    }

    pub fn is_ready(&self, index: usize) -> bool {
        self.slots.lock().ready.get(index).copied().unwrap_or(false)
    }

    /// Whether every slot is ready.
    pub fn is_complete(&self) -> bool {
        self.slots.lock().remaining == 0
    }

    /// Whether every remote peer has acknowledged our `READY`.
    pub fn is_acknowledged(&self) -> bool {
        self.slots.lock().unacked == 0
    }

    /// Peers that still need our `READY` on the next sweep.
    ///
    /// Under [`AckPolicy::CountsAsReady`] these are the peers not yet ready.
    /// Under [`AckPolicy::ReadyOnly`] they are the peers that have not yet
    /// acknowledged us, since their readiness no longer implies they heard us.
    pub fn broadcast_targets(&self, policy: AckPolicy) -> Vec<PeerId> {
        let slots = self.slots.lock();
        let done = match policy {
            AckPolicy::CountsAsReady => &slots.ready,
            AckPolicy::ReadyOnly => &slots.acked,
        };
        self.roster
            .remotes()
            .filter(|(i, _)| !done[*i])
            .map(|(_, peer)| peer.clone())
            .collect()
    }

    /// Peers not yet ready, in roster order.
    pub fn pending(&self) -> Vec<PeerId> {
        let slots = self.slots.lock();
        self.roster
            .peers()
            .iter()
            .zip(&slots.ready)
            .filter(|(_, ready)| !**ready)
            .map(|(peer, _)| peer.clone())
            .collect()
    }

    /// Copy of every slot, in roster order.
    pub fn snapshot(&self) -> Vec<(PeerId, bool)> {
        let slots = self.slots.lock();
        self.roster
            .peers()
            .iter()
            .cloned()
            .zip(slots.ready.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(hosts: &str, me: &str) -> ReadinessState {
        let roster = Roster::parse(hosts, &PeerId::new(me).unwrap()).unwrap();
        ReadinessState::new(roster)
    }

    fn flags(state: &ReadinessState) -> Vec<bool> {
        state.snapshot().into_iter().map(|(_, ready)| ready).collect()
    }

    #[test]
    fn test_self_pre_ready() {
        let state = state("a\nb\nc", "b");
        assert_eq!(flags(&state), vec![false, true, false]);
        assert!(!state.is_complete());
        assert_eq!(state.pending().len(), 2);
    }

    #[test]
    fn test_single_peer_roster_is_complete() {
        let state = state("solo", "solo");
        assert!(state.is_complete());
        assert!(state.broadcast_targets(AckPolicy::CountsAsReady).is_empty());
    }

    #[test]
    fn test_mark_ready_reports_completion_once() {
        let state = state("a\nb\nc", "b");
        assert!(!state.mark_ready(0));
        assert!(state.mark_ready(2));
        assert!(state.is_complete());

        // Redundant marks never report completion again.
        assert!(!state.mark_ready(0));
        assert!(!state.mark_ready(2));
        assert!(!state.mark_ready(1));
        assert_eq!(flags(&state), vec![true, true, true]);
    }

    #[test]
    fn test_mark_ready_out_of_range_is_ignored() {
        let state = state("a\nb", "a");
        assert!(!state.mark_ready(7));
        assert_eq!(flags(&state), vec![true, false]);
    }

    #[test]
    fn test_broadcast_targets_by_policy() {
        let state = state("a\nb\nc", "a");
        let names = |peers: Vec<PeerId>| {
            peers
                .iter()
                .map(|p| p.as_str().to_owned())
                .collect::<Vec<_>>()
        };

        assert_eq!(names(state.broadcast_targets(AckPolicy::CountsAsReady)), ["b", "c"]);

        // b said READY to us, c acknowledged our READY.
        state.mark_ready(1);
        assert!(!state.mark_acked(2));

        assert_eq!(names(state.broadcast_targets(AckPolicy::CountsAsReady)), ["c"]);
        assert_eq!(names(state.broadcast_targets(AckPolicy::ReadyOnly)), ["b"]);
    }

    #[test]
    fn test_mark_acked_reports_last_acknowledgement_once() {
        let state = state("a\nb\nc", "b");
        assert!(!state.is_acknowledged());
        assert!(!state.mark_acked(0));
        assert!(!state.mark_acked(0));
        assert!(!state.mark_acked(9));
        assert!(state.mark_acked(2));
        assert!(state.is_acknowledged());

        // Acknowledgement says nothing about readiness.
        assert!(!state.is_complete());
        assert!(!state.mark_acked(2));
    }

    #[test]
    fn test_single_peer_roster_is_acknowledged() {
        assert!(state("solo", "solo").is_acknowledged());
    }

    #[test]
    fn test_concurrent_marks_complete_exactly_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let hosts: String = (0..64).map(|i| format!("h{i}\n")).collect();
        let state = Arc::new(state(&hosts, "h0"));
        let completions = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = Arc::clone(&state);
                let completions = Arc::clone(&completions);
                std::thread::spawn(move || {
                    for i in 0..64 {
                        if state.mark_ready(i) {
                            completions.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(state.is_complete());
        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }
}
