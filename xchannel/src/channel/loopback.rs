//! In-memory channel implementation.
//!
//! A [`LoopbackChannel`] either loops sends back to itself or, when created
//! with [`LoopbackChannel::pair`], delivers them to a connected peer.
//! Received payloads go to the `message` handler when one is installed,
//! otherwise they are queued for [`Channel::receive`] and announced through
//! `available`.
//!
//! Each endpoint serializes its lifecycle triggers with a re-entrant lock
//! that stays held while `open`, `closed`, `message`, `available` and
//! `sent` handlers run, so none of them can fire after `closed`. An
//! endpoint only ever holds its own lock while reaching into its peer.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::{Mutex, ReentrantMutex, RwLock};

use super::{Channel, ChannelCallbacks, ChannelState};
use crate::config::ChannelConfig;
use crate::error::{Error, Result};
use crate::payload::Payload;

/// Traffic counters for one endpoint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStats {
    /// Payloads sent.
    pub messages_sent: u64,

    /// Payloads received.
    pub messages_received: u64,

    /// Bytes sent (payload only).
    pub bytes_sent: u64,

    /// Bytes received (payload only).
    pub bytes_received: u64,
}

/// An in-memory channel endpoint.
#[derive(Debug)]
pub struct LoopbackChannel {
    /// Endpoint settings.
    config: ChannelConfig,

    /// Lifecycle state.
    state: RwLock<ChannelState>,

    /// Orders lifecycle triggers against `close`.
    lifecycle: ReentrantMutex<()>,

    /// Payloads waiting for `receive`.
    queue: Mutex<VecDeque<Payload>>,

    /// Connected endpoint. Unset means sends loop back to this endpoint.
    peer: OnceLock<Weak<LoopbackChannel>>,

    /// Traffic counters.
    stats: Mutex<ChannelStats>,

    callbacks: ChannelCallbacks,
}

impl LoopbackChannel {
    /// Creates an endpoint whose sends are delivered back to itself.
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            state: RwLock::new(ChannelState::Connecting),
            lifecycle: ReentrantMutex::new(()),
            queue: Mutex::new(VecDeque::new()),
            peer: OnceLock::new(),
            stats: Mutex::new(ChannelStats::default()),
            callbacks: ChannelCallbacks::new(),
        }
    }

    /// Creates two connected endpoints sharing the same settings.
    pub fn pair(config: ChannelConfig) -> (Arc<Self>, Arc<Self>) {
        let local = Arc::new(Self::new(config.clone()));
        let remote = Arc::new(Self::new(config));

        let _ = local.peer.set(Arc::downgrade(&remote));
        let _ = remote.peer.set(Arc::downgrade(&local));

        (local, remote)
    }

    /// Returns the configured label.
    pub fn label(&self) -> &str {
        &self.config.label
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ChannelState {
        *self.state.read()
    }

    /// Number of payloads waiting to be received.
    pub fn available_amount(&self) -> usize {
        self.queue.lock().len()
    }

    /// Returns a snapshot of the traffic counters.
    pub fn stats(&self) -> ChannelStats {
        *self.stats.lock()
    }

    /// Opens the endpoint and, for a pair, its peer.
    ///
    /// Fires `open` once. Returns false if the endpoint was not connecting.
    /// A panic raised by the `open` handler is re-raised after the peer has
    /// been opened.
    pub fn open(&self) -> bool {
        let lifecycle = self.lifecycle.lock();
        if !self.transition(ChannelState::Connecting, ChannelState::Open) {
            return false;
        }

        log::debug!("channel '{}' open", self.config.label);
        let fault = catch_fault(|| self.callbacks.trigger_open());
        drop(lifecycle);

        if let Some(peer) = self.connected_peer() {
            peer.open();
        }
        if let Some(fault) = fault {
            panic::resume_unwind(fault);
        }
        true
    }

    fn transition(&self, from: ChannelState, to: ChannelState) -> bool {
        let mut state = self.state.write();
        if *state != from {
            return false;
        }
        *state = to;
        true
    }

    fn connected_peer(&self) -> Option<Arc<LoopbackChannel>> {
        self.peer.get().and_then(Weak::upgrade)
    }

    /// Hands a payload to this endpoint's receive side.
    fn deliver(&self, payload: &Payload) -> Result<()> {
        let _lifecycle = self.lifecycle.lock();
        if !self.is_open() {
            return Err(Error::ChannelClosed);
        }

        if self.callbacks.has_message_callback() {
            self.record_received(payload);
            self.callbacks.trigger_message(payload);
            return Ok(());
        }

        let count = {
            let mut queue = self.queue.lock();
            if queue.len() >= self.config.max_queued_messages {
                return Err(Error::QueueFull {
                    capacity: self.config.max_queued_messages,
                });
            }
            queue.push_back(payload.clone());
            queue.len()
        };
        self.record_received(payload);
        self.callbacks.trigger_available(count);
        Ok(())
    }

    fn record_received(&self, payload: &Payload) {
        let mut stats = self.stats.lock();
        stats.messages_received += 1;
        stats.bytes_received += payload.len() as u64;
    }
}

/// Runs a trigger, capturing a handler panic so teardown can finish first.
fn catch_fault(trigger: impl FnOnce()) -> Option<Box<dyn Any + Send>> {
    panic::catch_unwind(AssertUnwindSafe(trigger)).err()
}

impl Channel for LoopbackChannel {
    /// Closes this endpoint and its peer. Clears the receive queue, fires
    /// `closed` once, then drops every installed handler.
    ///
    /// A panic raised by the `closed` handler is re-raised only after the
    /// handlers are reset and the peer is closed.
    fn close(&self) {
        let lifecycle = self.lifecycle.lock();
        {
            let mut state = self.state.write();
            if *state == ChannelState::Closed {
                return;
            }
            *state = ChannelState::Closed;
        }

        self.queue.lock().clear();
        log::debug!("channel '{}' closed", self.config.label);
        let fault = catch_fault(|| self.callbacks.trigger_closed());
        self.callbacks.reset();
        drop(lifecycle);

        if let Some(peer) = self.connected_peer() {
            peer.close();
        }
        if let Some(fault) = fault {
            panic::resume_unwind(fault);
        }
    }

    fn send(&self, payload: &Payload) -> Result<()> {
        if !self.is_open() {
            return Err(Error::ChannelClosed);
        }

        let size = payload.len();
        if size > self.config.max_message_size {
            return Err(Error::MessageTooLarge {
                size,
                max: self.config.max_message_size,
            });
        }

        match self.peer.get() {
            None => self.deliver(payload)?,
            Some(peer) => match peer.upgrade() {
                Some(peer) => peer.deliver(payload)?,
                None => {
                    let message = format!("peer of channel '{}' is gone", self.config.label);
                    log::warn!("{}", message);
                    self.callbacks.trigger_error(&message);
                    return Err(Error::transport(message));
                }
            },
        }

        {
            let mut stats = self.stats.lock();
            stats.messages_sent += 1;
            stats.bytes_sent += size as u64;
        }
        // A handler may have closed the channel during delivery.
        let _lifecycle = self.lifecycle.lock();
        if self.is_open() {
            self.callbacks.trigger_sent();
        }
        Ok(())
    }

    fn receive(&self) -> Option<Payload> {
        self.queue.lock().pop_front()
    }

    fn is_open(&self) -> bool {
        self.state() == ChannelState::Open
    }

    fn is_closed(&self) -> bool {
        self.state() == ChannelState::Closed
    }

    fn callbacks(&self) -> &ChannelCallbacks {
        &self.callbacks
    }
}
