//! Wire messages.
//!
//! Each datagram carries exactly one ASCII message of the form `<TAG> <sender>`:
//!
//! - `READY <hostname>` announces that the sender has reached the barrier
//! - `ACK <hostname>` acknowledges a `READY` previously received from us
//!
//! There is no length prefix, checksum or version field.

use std::fmt;

use super::peer::PeerId;
use crate::error::{CoreError, Result};

/// Size of the receive buffer. Longer datagrams are rejected.
pub const MAX_DATAGRAM_LEN: usize = 1024;

const READY_TAG: &str = "READY";
const ACK_TAG: &str = "ACK";

/// A barrier protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Sender has reached the barrier
    Ready(PeerId),
    /// Sender has seen our `Ready`
    Ack(PeerId),
}

impl Message {
    /// Identity carried in the message.
    pub const fn sender(&self) -> &PeerId {
        match self {
            Self::Ready(sender) | Self::Ack(sender) => sender,
        }
    }

    /// Message tag as it appears on the wire.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Ready(_) => READY_TAG,
            Self::Ack(_) => ACK_TAG,
        }
    }

    /// Encode into a datagram payload.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Decode a datagram payload.
    ///
    /// A single trailing `\n` or `\r\n` is tolerated so that messages typed
    /// with tools like `nc -u` are accepted.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        if payload.len() > MAX_DATAGRAM_LEN {
            return Err(CoreError::Oversized {
                len: payload.len(),
                max: MAX_DATAGRAM_LEN,
            });
        }

        let text = std::str::from_utf8(payload).map_err(|_| CoreError::NotUtf8)?;
        let text = text
            .strip_suffix("\r\n")
            .or_else(|| text.strip_suffix('\n'))
            .unwrap_or(text);

        let (tag, sender) = text.split_once(' ').unwrap_or((text, ""));
        if sender.is_empty() {
            return match tag {
                READY_TAG | ACK_TAG => Err(CoreError::MissingSender),
                other => Err(CoreError::UnknownTag(other.to_owned())),
            };
        }

        let sender = PeerId::new(sender)?;
        match tag {
            READY_TAG => Ok(Self::Ready(sender)),
            ACK_TAG => Ok(Self::Ack(sender)),
            other => Err(CoreError::UnknownTag(other.to_owned())),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tag(), self.sender())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(id: &str) -> PeerId {
        PeerId::new(id).unwrap()
    }

    #[test]
    fn test_encode() {
        assert_eq!(Message::Ready(peer("node-b")).encode(), b"READY node-b");
        assert_eq!(Message::Ack(peer("node-b")).encode(), b"ACK node-b");
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            Message::decode(b"READY node-a").unwrap(),
            Message::Ready(peer("node-a"))
        );
        assert_eq!(
            Message::decode(b"ACK node-c").unwrap(),
            Message::Ack(peer("node-c"))
        );
    }

    #[test]
    fn test_decode_tolerates_one_trailing_newline() {
        assert_eq!(
            Message::decode(b"READY node-a\n").unwrap(),
            Message::Ready(peer("node-a"))
        );
        assert_eq!(
            Message::decode(b"ACK node-a\r\n").unwrap(),
            Message::Ack(peer("node-a"))
        );
        assert!(Message::decode(b"ACK node-a\n\n").is_err());
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert_eq!(Message::decode(b""), Err(CoreError::UnknownTag(String::new())));
        assert_eq!(Message::decode(b"READY"), Err(CoreError::MissingSender));
        assert_eq!(Message::decode(b"ACK "), Err(CoreError::MissingSender));
        assert_eq!(
            Message::decode(b"HELLO node-a"),
            Err(CoreError::UnknownTag("HELLO".into()))
        );
        // Tags are case sensitive.
        assert!(matches!(
            Message::decode(b"ready node-a"),
            Err(CoreError::UnknownTag(_))
        ));
        // Only one field after the tag.
        assert!(matches!(
            Message::decode(b"READY node-a extra"),
            Err(CoreError::InvalidIdentity(_))
        ));
        assert_eq!(Message::decode(&[0xff, 0xfe]), Err(CoreError::NotUtf8));
    }

    #[test]
    fn test_decode_rejects_oversized() {
        let mut payload = b"READY ".to_vec();
        payload.resize(MAX_DATAGRAM_LEN + 1, b'x');
        assert!(matches!(
            Message::decode(&payload),
            Err(CoreError::Oversized { .. })
        ));
    }

    #[test]
    fn test_sender_and_tag() {
        let msg = Message::Ack(peer("node-z"));
        assert_eq!(msg.sender().as_str(), "node-z");
        assert_eq!(msg.tag(), "ACK");
        assert_eq!(msg.to_string(), "ACK node-z");
    }
}
