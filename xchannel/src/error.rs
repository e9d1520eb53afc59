//! Error types for channel operations.
//!
//! A failure raised by a user-supplied handler is not represented here:
//! handler panics unwind out of the trigger call that invoked them.

use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The channel is not open.
    ChannelClosed,

    /// The underlying transport failed.
    Transport,

    /// The payload exceeds the configured maximum message size.
    MessageTooLarge,

    /// The receiving queue has no room left.
    QueueFull,
}

/// Errors returned by [`Channel`](crate::Channel) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An operation requiring an open channel was invoked after close.
    #[error("channel is closed")]
    ChannelClosed,

    /// Transmission failed; carries a description of the failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The payload is larger than the channel accepts.
    #[error("message size {size} exceeds maximum {max} bytes")]
    MessageTooLarge {
        /// Size of the rejected payload.
        size: usize,
        /// Configured limit.
        max: usize,
    },

    /// The peer's receive queue is full.
    #[error("receive queue is full ({capacity} messages)")]
    QueueFull {
        /// Configured queue capacity.
        capacity: usize,
    },
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ChannelClosed => ErrorKind::ChannelClosed,
            Error::Transport(_) => ErrorKind::Transport,
            Error::MessageTooLarge { .. } => ErrorKind::MessageTooLarge,
            Error::QueueFull { .. } => ErrorKind::QueueFull,
        }
    }

    /// Creates a transport error from any displayable message.
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::ChannelClosed.kind(), ErrorKind::ChannelClosed);
        assert_eq!(Error::transport("reset").kind(), ErrorKind::Transport);
        assert_eq!(
            Error::MessageTooLarge { size: 10, max: 4 }.kind(),
            ErrorKind::MessageTooLarge
        );
        assert_eq!(Error::QueueFull { capacity: 1 }.kind(), ErrorKind::QueueFull);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(Error::ChannelClosed.to_string(), "channel is closed");
        assert_eq!(
            Error::transport("connection reset").to_string(),
            "transport error: connection reset"
        );
        assert_eq!(
            Error::MessageTooLarge { size: 70000, max: 65536 }.to_string(),
            "message size 70000 exceeds maximum 65536 bytes"
        );
    }
}
