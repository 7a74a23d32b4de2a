//! # Actor Runtime
//!
//! Provides the runtime infrastructure for the queue consumer.
//!
//! This crate defines:
//! - **Actor trait**: Base trait for all actors with lifecycle hooks
//! - **Context**: Self-stop and host observations from inside a hook
//! - **Channel management**: Bounded mailboxes and peer addresses
//! - **Logging macros**: `actor_debug!` and friends over `tracing`
//!
//! ## Architecture
//!
//! The actor runtime follows these principles:
//! - **Zero shared state**: Each actor owns its data
//! - **Message passing**: Actors communicate via typed messages
//! - **Sequential processing**: Messages are handled one at a time
//! - **Failure isolation**: Handler errors are reported, not propagated
//!
//! ## Example
//!
//! ```ignore
//! use actor_runtime::{Actor, ChannelManager, MailboxConfig};
//!
//! let (mut manager, handles) = ChannelManager::new(&MailboxConfig::default());
//! let consumer = Consumer::new(manager.queue_recipient(), manager.delegate_recipient());
//! let task = tokio::spawn(consumer.run(handles.consumer_rx, handles.event_tx));
//!
//! manager.send(ConsumerMessage::DataValue(1))?;
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod actor;
pub mod channels;
pub mod logging;

pub use actor::{Actor, Context};
pub use channels::{
    reply_channel, ActorHandles, ChannelManager, ConsumerMail, Envelope, MailboxConfig, Recipient,
    Tell,
};

#[doc(hidden)]
pub use tracing as __tracing;
