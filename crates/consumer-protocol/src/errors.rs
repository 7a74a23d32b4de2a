//! Error Handling Guidelines
//!
//! All error messages should follow this format:
//!
//! 1. **What failed**: Describe the operation that failed
//! 2. **Why it failed**: Provide the root cause if known
//! 3. **What to do**: Suggest an action when possible
//!
//! Examples:
//! - ✅ "Channel closed: delegate mailbox dropped while forwarding value 7"
//! - ✅ "Configuration error: mailbox.consumer must be greater than zero"
//! - ❌ "send failed" (lacks context)
//! - ❌ "Error" (too vague)

use thiserror::Error;

/// Unified error type for actor operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActorError {
    /// Actor received a message it cannot accept in its current state
    #[error("Unexpected message in state {state}: {message}")]
    UnexpectedMessage { state: String, message: String },

    /// Peer mailbox has been dropped
    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    /// Peer mailbox is at capacity
    #[error("Mailbox full: {0}")]
    MailboxFull(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
