//! Inbound loop: decode one datagram at a time and update readiness.

use rollcall_core::{Message, MAX_DATAGRAM_LEN};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use super::Shared;
use crate::config::AckPolicy;
use crate::transport::Transport;

pub(super) async fn run<T: Transport>(shared: Arc<Shared<T>>) {
    debug!("receive loop started");

    // One spare byte so a datagram over the limit shows up as oversized
    // instead of being silently truncated into something that parses.
    let mut buf = vec![0u8; MAX_DATAGRAM_LEN + 1];

    loop {
        let received = tokio::select! {
            biased;
            () = shared.stop.cancelled() => break,
            res = shared.transport.recv(&mut buf) => res,
        };

        match received {
            Ok(len) => tokio::select! {
                () = shared.stop.cancelled() => break,
                () = handle_datagram(&*shared, &buf[..len]) => {}
            },
            Err(e) => {
                warn!(error = %e, "receive failed");
                tokio::select! {
                    () = shared.stop.cancelled() => break,
                    () = tokio::time::sleep(shared.retry_interval) => {}
                }
            }
        }
    }

    debug!("receive loop finished");
}

/// Apply one datagram to the readiness state.
///
/// Malformed datagrams and unknown senders are dropped. A `READY` is always
/// answered with an `ACK`, even if the sender was already marked ready, since
/// the sender keeps retrying until it hears from us.
pub(super) async fn handle_datagram<T: Transport>(shared: &Shared<T>, payload: &[u8]) {
    let message = match Message::decode(payload) {
        Ok(message) => message,
        Err(e) => {
            debug!(error = %e, len = payload.len(), "dropping malformed datagram");
            return;
        }
    };
    debug!(message = %message, "received message");

    let sender = message.sender();
    let Some(index) = shared.state.index_of(sender) else {
        debug!(sender = %sender, "dropping message from unknown peer");
        return;
    };
    if index == shared.state.roster().local_index() {
        trace!("ignoring message from ourselves");
        return;
    }

    match &message {
        Message::Ready(_) => {
            // Completion must not wait on the ACK send, which may block on a
            // name lookup past the deadline.
            if shared.state.mark_ready(index) {
                shared.complete();
            }
            debug!(peer = %sender, "marked peer ready");

            let ack = Message::Ack(shared.local().clone()).encode();
            if let Err(e) = shared.transport.send_to(sender, &ack).await {
                warn!(peer = %sender, error = %e, "failed to send ACK");
            }
        }
        Message::Ack(_) => {
            debug!(peer = %sender, "received ACK");
            if shared.state.mark_acked(index) {
                debug!("every peer has acknowledged us");
                shared.acknowledged.cancel();
            }
            let completed = match shared.policy {
                AckPolicy::CountsAsReady => shared.state.mark_ready(index),
                AckPolicy::ReadyOnly => false,
            };
            if completed {
                shared.complete();
            }
        }
    }
}
