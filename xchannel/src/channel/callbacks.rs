//! Event slots shared by every channel implementation.

use std::sync::Arc;

use crate::callback::SyncCallback;
use crate::payload::Payload;

/// Handler for events that carry no arguments.
pub type EventCallback = dyn Fn() + Send + Sync;

/// Handler for `error` events.
pub type ErrorCallback = dyn Fn(&str) + Send + Sync;

/// Handler for `message` events.
pub type MessageCallback = dyn Fn(&Payload) + Send + Sync;

/// The six notification slots owned by a channel.
///
/// Application code subscribes through the `on_*` methods (usually via
/// [`ChannelEvents`](super::ChannelEvents)). Channel implementations fire
/// notifications through the `trigger_*` methods; handlers run
/// synchronously on the calling thread.
#[derive(Debug, Default)]
pub struct ChannelCallbacks {
    open: SyncCallback<EventCallback>,
    closed: SyncCallback<EventCallback>,
    error: SyncCallback<ErrorCallback>,
    message: SyncCallback<MessageCallback>,
    available: SyncCallback<EventCallback>,
    sent: SyncCallback<EventCallback>,
}

impl ChannelCallbacks {
    /// Creates a set of empty slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired when the channel opens.
    pub fn on_open(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.open.set(Arc::new(callback));
    }

    /// Fired once when the channel closes.
    pub fn on_closed(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.closed.set(Arc::new(callback));
    }

    /// Fired with a description when the channel observes an error.
    pub fn on_error(&self, callback: impl Fn(&str) + Send + Sync + 'static) {
        self.error.set(Arc::new(callback));
    }

    /// Fired for every received payload.
    pub fn on_message(&self, callback: impl Fn(&Payload) + Send + Sync + 'static) {
        self.message.set(Arc::new(callback));
    }

    /// Installs one dispatcher into the message slot that routes `Binary`
    /// payloads to `binary` and `Text` payloads to `text`.
    pub fn on_message_split(
        &self,
        binary: impl Fn(&[u8]) + Send + Sync + 'static,
        text: impl Fn(&str) + Send + Sync + 'static,
    ) {
        self.on_message(move |payload: &Payload| match payload {
            Payload::Binary(data) => binary(data.as_slice()),
            Payload::Text(data) => text(data.as_str()),
        });
    }

    /// Fired when received data can be obtained through `receive`.
    pub fn on_available(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.available.set(Arc::new(callback));
    }

    /// Fired when queued outbound data has been sent.
    pub fn on_sent(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.sent.set(Arc::new(callback));
    }

    /// Returns true if a message handler is installed.
    pub fn has_message_callback(&self) -> bool {
        self.message.is_set()
    }

    /// Removes every installed handler.
    ///
    /// Handlers often capture their own channel; resetting breaks that
    /// cycle when the channel is torn down.
    pub fn reset(&self) {
        self.open.clear();
        self.closed.clear();
        self.error.clear();
        self.message.clear();
        self.available.clear();
        self.sent.clear();
    }

    /// Fires `open`.
    pub fn trigger_open(&self) {
        log::trace!("trigger open");
        self.open.invoke(|cb| cb());
    }

    /// Fires `closed`. Implementations call this at most once.
    pub fn trigger_closed(&self) {
        log::trace!("trigger closed");
        self.closed.invoke(|cb| cb());
    }

    /// Fires `error` with `message`.
    pub fn trigger_error(&self, message: &str) {
        log::trace!("trigger error: {}", message);
        self.error.invoke(|cb| cb(message));
    }

    /// Fires `message` with a borrowed payload.
    pub fn trigger_message(&self, payload: &Payload) {
        log::trace!("trigger message: {} bytes", payload.len());
        self.message.invoke(|cb| cb(payload));
    }

    /// Fires `available`. The count is for the implementation's own
    /// bookkeeping and is not passed to the handler; consumers query the
    /// channel for it instead.
    pub fn trigger_available(&self, count: usize) {
        log::trace!("trigger available: {}", count);
        self.available.invoke(|cb| cb());
    }

    /// Fires `sent`.
    pub fn trigger_sent(&self) {
        log::trace!("trigger sent");
        self.sent.invoke(|cb| cb());
    }
}
