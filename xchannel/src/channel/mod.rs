//! The channel contract.
//!
//! A concrete channel implements [`Channel`]: the lifecycle queries, the
//! send/receive surface, and access to its [`ChannelCallbacks`]. Every
//! implementation automatically gets the subscription methods of
//! [`ChannelEvents`].
//!
//! Implementations must fire `trigger_closed` at most once and must not
//! fire `open`, `message`, `available` or `sent` after it.

mod callbacks;
mod loopback;

pub use callbacks::{ChannelCallbacks, ErrorCallback, EventCallback, MessageCallback};
pub use loopback::{ChannelStats, LoopbackChannel};

use crate::error::Result;
use crate::payload::Payload;

/// Channel lifecycle state.
///
/// `Closed` is terminal. Errors are events, not states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Channel is being established.
    Connecting,

    /// Channel is open and operational.
    Open,

    /// Channel is shutting down but not yet closed.
    ///
    /// For implementations with a close handshake; both `is_open` and
    /// `is_closed` report false here. `LoopbackChannel` closes in one step
    /// and never enters it.
    Closing,

    /// Channel is closed.
    Closed,
}

/// A bidirectional message channel.
pub trait Channel: Send + Sync {
    /// Closes the channel. Safe to call repeatedly and from any state.
    fn close(&self);

    /// Sends a payload.
    ///
    /// Fails with [`Error::ChannelClosed`](crate::Error::ChannelClosed) if
    /// the channel is not open, or with a transport error if transmission
    /// fails.
    fn send(&self, payload: &Payload) -> Result<()>;

    /// Returns the next received payload, or `None` if nothing is queued.
    /// Never blocks.
    fn receive(&self) -> Option<Payload>;

    /// Returns true while the channel is open.
    fn is_open(&self) -> bool;

    /// Returns true once the channel has closed.
    fn is_closed(&self) -> bool;

    /// The notification slots of this channel.
    fn callbacks(&self) -> &ChannelCallbacks;
}

/// Event subscription for any [`Channel`].
///
/// Blanket-implemented, so implementations cannot override it.
pub trait ChannelEvents {
    /// Subscribes to `open`.
    fn on_open(&self, callback: impl Fn() + Send + Sync + 'static);

    /// Subscribes to `closed`.
    fn on_closed(&self, callback: impl Fn() + Send + Sync + 'static);

    /// Subscribes to `error`.
    fn on_error(&self, callback: impl Fn(&str) + Send + Sync + 'static);

    /// Subscribes to `message`.
    fn on_message(&self, callback: impl Fn(&Payload) + Send + Sync + 'static);

    /// Subscribes separate handlers for binary and text payloads.
    fn on_message_split(
        &self,
        binary: impl Fn(&[u8]) + Send + Sync + 'static,
        text: impl Fn(&str) + Send + Sync + 'static,
    );

    /// Subscribes to `available`.
    fn on_available(&self, callback: impl Fn() + Send + Sync + 'static);

    /// Subscribes to `sent`.
    fn on_sent(&self, callback: impl Fn() + Send + Sync + 'static);
}

impl<C: Channel + ?Sized> ChannelEvents for C {
    fn on_open(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.callbacks().on_open(callback);
    }

    fn on_closed(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.callbacks().on_closed(callback);
    }

    fn on_error(&self, callback: impl Fn(&str) + Send + Sync + 'static) {
        self.callbacks().on_error(callback);
    }

    fn on_message(&self, callback: impl Fn(&Payload) + Send + Sync + 'static) {
        self.callbacks().on_message(callback);
    }

    fn on_message_split(
        &self,
        binary: impl Fn(&[u8]) + Send + Sync + 'static,
        text: impl Fn(&str) + Send + Sync + 'static,
    ) {
        self.callbacks().on_message_split(binary, text);
    }

    fn on_available(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.callbacks().on_available(callback);
    }

    fn on_sent(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.callbacks().on_sent(callback);
    }
}
