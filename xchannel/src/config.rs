//! Channel configuration.

use crate::{DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_MAX_QUEUED_MESSAGES};

/// Settings for a concrete channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Human readable channel name, used in log lines.
    pub label: String,

    /// Largest payload, in bytes, that `send` accepts.
    pub max_message_size: usize,

    /// Number of payloads the receive queue holds before `send` fails.
    pub max_queued_messages: usize,
}

impl ChannelConfig {
    /// Creates the default settings.
    pub fn new() -> Self {
        Self {
            label: String::from("loopback"),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            max_queued_messages: DEFAULT_MAX_QUEUED_MESSAGES,
        }
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the largest accepted payload size.
    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Sets the receive queue capacity.
    pub fn with_max_queued_messages(mut self, count: usize) -> Self {
        self.max_queued_messages = count;
        self
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new()
    }
}
