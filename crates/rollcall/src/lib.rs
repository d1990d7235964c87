//! rollcall: a coordinator-free readiness barrier over UDP.
//!
//! A fixed set of peers (for example the containers of a multi-node job)
//! each run one barrier round. Every peer keeps announcing `READY <self>` to
//! the peers it has not heard from, answers every `READY` with `ACK <self>`,
//! and is released once it has heard from the whole roster.
//!
//! # Architecture
//!
//! - [`roster`]: loads the newline-delimited host file
//! - [`state`]: the lock-protected, monotonic readiness table
//! - [`gossip`]: the broadcast and receive loops and their supervisor
//! - [`transport`]: UDP and in-memory datagram transports
//! - [`signal`]: the `READY` line orchestration tooling waits for
//!
//! # Example
//!
//! ```rust,no_run
//! use rollcall::{BarrierConfig, PeerId};
//! use std::path::Path;
//!
//! # async fn example() -> rollcall::Result<()> {
//! let config = BarrierConfig::default();
//! let me = PeerId::new("worker-1")?;
//! let report = rollcall::run(&config, Path::new("/etc/job/hosts"), &me).await?;
//! println!("{} peers ready in {:?}", report.peers, report.elapsed);
//! # Ok(())
//! # }
//! ```

pub mod barrier;
pub mod config;
pub mod error;
pub mod gossip;
pub mod roster;
pub mod signal;
pub mod state;
pub mod transport;

// Re-exports for convenience.
pub use barrier::run;
pub use config::{AckPolicy, BarrierConfig};
pub use error::BarrierError;
pub use gossip::{BarrierReport, GossipEngine};
pub use rollcall_core::{CoreError, Message, PeerId, Roster};
pub use signal::{CompletionSignal, StatusLine};
pub use state::ReadinessState;

/// Result type for rollcall operations.
pub type Result<T> = std::result::Result<T, BarrierError>;
