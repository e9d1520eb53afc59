//! # XChannel - Bidirectional Message Channels
//!
//! XChannel defines the contract shared by peer-to-peer message channel
//! endpoints (for example a data channel over a transport session):
//!
//! - **Payloads**: every message is either binary data or UTF-8 text
//! - **Lifecycle**: `Connecting → Open → Closed`, with `Closed` terminal
//! - **Events**: `open`, `closed`, `error`, `message`, `available`, `sent`
//! - **Thread-safe callbacks**: handlers can be replaced while they run and
//!   may re-register handlers from inside their own invocation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Application Layer                     │
//! │          on_open / on_message / send / receive           │
//! ├─────────────────────────────────────────────────────────┤
//! │                    Channel Contract                      │
//! │  ┌─────────────┐ ┌─────────────────┐ ┌───────────────┐  │
//! │  │   Channel   │ │ ChannelCallbacks│ │ ChannelEvents │  │
//! │  └─────────────┘ └─────────────────┘ └───────────────┘  │
//! ├─────────────────────────────────────────────────────────┤
//! │                    Callback Slots                        │
//! │  ┌─────────────────────────────────────────────────┐    │
//! │  │       SyncCallback (re-entrant, replaceable)     │    │
//! │  └─────────────────────────────────────────────────┘    │
//! ├─────────────────────────────────────────────────────────┤
//! │                 Concrete Implementations                 │
//! │  ┌─────────────────────────────────────────────────┐    │
//! │  │        LoopbackChannel (in-memory, paired)       │    │
//! │  └─────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use xchannel::{Channel, ChannelConfig, ChannelEvents, LoopbackChannel, Payload};
//!
//! let (local, remote) = LoopbackChannel::pair(ChannelConfig::default());
//! remote.on_message_split(
//!     |data: &[u8]| println!("{} bytes", data.len()),
//!     |text: &str| println!("text: {text}"),
//! );
//!
//! local.open();
//! local.send(&Payload::from("Hello, World!"))?;
//! local.close();
//! assert!(remote.is_closed());
//! # Ok::<(), xchannel::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod callback;
pub mod channel;
pub mod config;
pub mod error;
pub mod payload;

// Re-export commonly used types
pub use callback::SyncCallback;
pub use channel::{
    Channel, ChannelCallbacks, ChannelEvents, ChannelState, ChannelStats, LoopbackChannel,
};
pub use config::ChannelConfig;
pub use error::{Error, ErrorKind, Result};
pub use payload::Payload;

/// Default maximum payload size in bytes
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 65536;

/// Default number of payloads a receive queue holds
pub const DEFAULT_MAX_QUEUED_MESSAGES: usize = 1024;
