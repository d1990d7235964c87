//! Barrier participants and the messages they exchange.

mod message;
mod peer;
mod roster;

pub use message::{Message, MAX_DATAGRAM_LEN};
pub use peer::PeerId;
pub use roster::Roster;
