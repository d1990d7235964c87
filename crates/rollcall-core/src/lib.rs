//! Core types for the rollcall readiness barrier.
//!
//! This crate provides the pieces every participant agrees on:
//!
//! - **Types**: [`PeerId`], the ordered [`Roster`] of participants, and the
//!   [`Message`] exchanged between them
//! - **Errors**: roster and wire decoding failures via [`CoreError`]
//!
//! # Example
//!
//! ```rust
//! use rollcall_core::{Message, PeerId, Roster};
//!
//! let roster = Roster::parse("node-a\nnode-b\n", &PeerId::new("node-b")?)?;
//! assert_eq!(roster.local_index(), 1);
//!
//! let wire = Message::Ready(roster.local().clone()).encode();
//! assert_eq!(wire, b"READY node-b");
//! # Ok::<(), rollcall_core::CoreError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/rollcall-core/0.1.0")]

mod error;
pub mod types;

pub use error::{CoreError, Result};
pub use types::*;
