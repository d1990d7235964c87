//! Outbound loop: keep announcing `READY` until nobody needs it.

use rollcall_core::Message;
use std::sync::Arc;
use tracing::{debug, warn};

use super::Shared;
use crate::transport::Transport;

/// Sweep `READY` to every peer that still needs it, once per retry interval.
///
/// Under the default ACK policy the target set is empty exactly when the
/// barrier is complete, so the loop ends with the round. Under
/// `ReadyOnly` it keeps going through the linger period until every peer
/// has acknowledged us.
pub(super) async fn run<T: Transport>(shared: Arc<Shared<T>>) {
    debug!("broadcast loop started");

    let payload = Message::Ready(shared.local().clone()).encode();
    let mut sweeps: u64 = 0;
    let mut satisfied = false;

    loop {
        let targets = shared.state.broadcast_targets(shared.policy);
        if targets.is_empty() && shared.state.is_complete() {
            break;
        }

        sweeps += 1;
        debug!(sweep = sweeps, targets = targets.len(), "sending READY");
        let sweep = async {
            for peer in &targets {
                if let Err(e) = shared.transport.send_to(peer, &payload).await {
                    warn!(peer = %peer, sweep = sweeps, error = %e, "failed to send READY, retrying next sweep");
                }
            }
        };

        // A slow name lookup must not hold the loop past the deadline.
        tokio::select! {
            () = shared.stop.cancelled() => break,
            () = sweep => {}
        }

        tokio::select! {
            () = shared.stop.cancelled() => break,
            () = shared.satisfied.cancelled(), if !satisfied => satisfied = true,
            () = tokio::time::sleep(shared.retry_interval) => {}
        }
    }

    debug!(sweeps, "broadcast loop finished");
}
