//! Gossip engine: the READY/ACK exchange that drives the barrier.
//!
//! Two tasks share one transport and one [`ReadinessState`]:
//!
//! - **broadcast**: every retry interval, send `READY <self>` to each peer that
//!   still needs it, until none does.
//! - **receive**: decode one datagram per iteration, mark its sender ready,
//!   answer `READY` with `ACK`, and fire the completion signal when the last
//!   slot flips.
//!
//! Both tasks select on cancellation tokens, so neither is left blocked on a
//! sleep or a socket read once the round is over.

mod broadcast;
mod receive;

use rollcall_core::{PeerId, Roster};
use std::future::pending;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{AckPolicy, BarrierConfig};
use crate::error::BarrierError;
use crate::signal::{CompletionSignal, StatusLine};
use crate::state::ReadinessState;
use crate::transport::Transport;

/// Summary of a satisfied barrier round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarrierReport {
    /// Participants, including ourselves
    pub peers: usize,
    /// Time from engine start to completion, excluding linger
    pub elapsed: Duration,
}

/// Context shared by the broadcast and receive tasks.
struct Shared<T> {
    state: Arc<ReadinessState>,
    transport: T,
    policy: AckPolicy,
    retry_interval: Duration,
    /// Cancelled once every slot is ready.
    satisfied: CancellationToken,
    /// Cancelled once every remote peer has acknowledged our `READY`.
    acknowledged: CancellationToken,
    /// Cancelled when both loops must exit.
    stop: CancellationToken,
    signal: Box<dyn CompletionSignal>,
}

impl<T> Shared<T> {
    fn local(&self) -> &PeerId {
        self.state.roster().local()
    }

    fn complete(&self) {
        info!(peers = self.state.roster().len(), "all peers are ready");
        self.signal.signal();
        self.satisfied.cancel();
    }
}

/// Runs one barrier round over a [`Transport`].
pub struct GossipEngine<T> {
    state: Arc<ReadinessState>,
    transport: T,
    policy: AckPolicy,
    retry_interval: Duration,
    max_wait: Option<Duration>,
    linger: Duration,
    signal: Box<dyn CompletionSignal>,
}

impl<T: Transport> GossipEngine<T> {
    /// Create an engine with the local slot already marked ready.
    pub fn new(roster: Roster, transport: T, config: &BarrierConfig) -> Self {
        Self {
            state: Arc::new(ReadinessState::new(roster)),
            transport,
            policy: config.ack_policy,
            retry_interval: config.retry_interval(),
            max_wait: config.max_wait(),
            linger: config.linger(),
            signal: Box::new(StatusLine::new(config.signal_line.clone())),
        }
    }

    /// Replace the default stderr status line.
    #[must_use]
    pub fn with_signal(mut self, signal: impl CompletionSignal + 'static) -> Self {
        self.signal = Box::new(signal);
        self
    }

    /// Handle to the readiness table, valid before and after [`Self::run`].
    pub fn state(&self) -> Arc<ReadinessState> {
        Arc::clone(&self.state)
    }

    /// Run both loops until the barrier is satisfied or the deadline expires.
    pub async fn run(self) -> crate::Result<BarrierReport> {
        let started = Instant::now();
        let peers = self.state.roster().len();
        let max_wait = self.max_wait;
        let linger = self.linger;

        let shared = Arc::new(Shared {
            state: self.state,
            transport: self.transport,
            policy: self.policy,
            retry_interval: self.retry_interval,
            satisfied: CancellationToken::new(),
            acknowledged: CancellationToken::new(),
            stop: CancellationToken::new(),
            signal: self.signal,
        });

        info!(
            local = %shared.local(),
            peers,
            interval_ms = shared.retry_interval.as_millis(),
            "starting barrier"
        );

        if shared.state.is_complete() {
            shared.complete();
            return Ok(BarrierReport {
                peers,
                elapsed: started.elapsed(),
            });
        }

        let broadcast = tokio::spawn(broadcast::run(Arc::clone(&shared)));
        let receive = tokio::spawn(receive::run(Arc::clone(&shared)));

        let outcome = supervise(&*shared, started, max_wait, linger).await;
        shared.stop.cancel();

        broadcast
            .await
            .map_err(|e| BarrierError::Task(e.to_string()))?;
        receive
            .await
            .map_err(|e| BarrierError::Task(e.to_string()))?;

        let elapsed = outcome?;
        info!(elapsed_ms = elapsed.as_millis(), "barrier satisfied");
        Ok(BarrierReport { peers, elapsed })
    }
}

/// Wait for completion or the deadline, whichever comes first, then keep
/// the loops running through the linger period.
///
/// Under [`AckPolicy::ReadyOnly`] the loops also keep running until every
/// peer has acknowledged us: a peer that has not may still be waiting for
/// our `READY`, and nothing else would reach it once we stop. The deadline
/// bounds that wait, but once satisfied the round is reported as a success.
async fn supervise<T>(
    shared: &Shared<T>,
    started: Instant,
    max_wait: Option<Duration>,
    linger: Duration,
) -> crate::Result<Duration> {
    let deadline = async {
        match max_wait {
            Some(wait) => tokio::time::sleep(wait).await,
            None => pending().await,
        }
    };
    tokio::pin!(deadline);

    let elapsed = tokio::select! {
        biased;
        () = shared.satisfied.cancelled() => started.elapsed(),
        () = &mut deadline => {
            // The last slot can flip on another worker just before the
            // satisfied token is cancelled.
            if shared.state.is_complete() {
                return Ok(started.elapsed());
            }
            let missing = shared.state.pending();
            debug_assert!(!missing.is_empty());
            return Err(BarrierError::Timeout {
                waited: started.elapsed(),
                pending: missing,
            });
        }
    };

    let lingered = async {
        if !linger.is_zero() {
            debug!(linger_ms = linger.as_millis(), "lingering to acknowledge late peers");
            tokio::time::sleep(linger).await;
        }
    };
    let acknowledged = async {
        if matches!(shared.policy, AckPolicy::ReadyOnly) {
            shared.acknowledged.cancelled().await;
        }
    };

    tokio::select! {
        biased;
        ((), ()) = async { tokio::join!(lingered, acknowledged) } => {}
        () = &mut deadline => {
            let unacked = shared.state.broadcast_targets(AckPolicy::ReadyOnly);
            warn!(unacked = unacked.len(), "deadline reached before every peer acknowledged us");
        }
    }
    Ok(elapsed)
}
