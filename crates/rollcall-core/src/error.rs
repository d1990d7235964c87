use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors produced while building rosters or decoding wire messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Peer identity was empty
    #[error("peer identity is empty")]
    EmptyIdentity,

    /// Peer identity contains characters that cannot travel on the wire
    #[error("invalid peer identity {0:?}: must not contain whitespace")]
    InvalidIdentity(String),

    /// Peer identity would not fit in a single datagram
    #[error("peer identity is {len} bytes, longer than the {max} byte limit")]
    IdentityTooLong {
        /// Identity length in bytes
        len: usize,
        /// Longest identity that still fits in a `READY` datagram
        max: usize,
    },

    /// Same identity listed twice in a roster
    #[error("duplicate peer in roster: {0}")]
    DuplicatePeer(String),

    /// Roster has no entries
    #[error("roster is empty")]
    EmptyRoster,

    /// Local identity is not part of the roster
    #[error("local identity {0} is not listed in the roster")]
    SelfNotInRoster(String),

    /// Datagram is larger than the receive buffer
    #[error("datagram of {len} bytes exceeds the {max} byte limit")]
    Oversized {
        /// Received length (may be clamped to `max + 1`)
        len: usize,
        /// Maximum accepted length
        max: usize,
    },

    /// Datagram is not valid UTF-8
    #[error("datagram is not valid UTF-8")]
    NotUtf8,

    /// Message tag is neither `READY` nor `ACK`
    #[error("unknown message tag: {0:?}")]
    UnknownTag(String),

    /// Message carries no sender
    #[error("message has no sender identity")]
    MissingSender,
}
