use serde::{Deserialize, Serialize};
use std::fmt;

/// # Consumer State Machine
///
/// ```text
///        ┌───────────────────────────────────────────┐
///        │                  Active                   │◄──┐ DataValue(n > current)
///        └──┬──────────────────┬──────────────────┬──┘   │ RegistrationOk / Unexpected
///           │                  │                  │      │ GetCurrent / Ping / End
///   DataValue(n <= current)  UnregistrationOk   mailbox ─┘
///           │                  │               closed
///           ▼                  ▼                  ▼
///     Terminated(        Terminated(        Terminated(
///      StaleValue)        Unregistered)      MailboxClosed)
/// ```
///
/// A consumer whose start hook fails goes straight to
/// `Terminated(InitFailed)`.
///
/// ## State Invariants
///
/// - **Active**: cursor may advance, replies and forwards flow
/// - **Terminated**: terminal, no further message is handled
///
/// `End` is a self-loop on `Active`: it emits the unregistration request but
/// the transition only happens when the queue answers with
/// `UnregistrationOk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumerState {
    Active,
    Terminated(StopReason),
}

impl ConsumerState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }
}

impl fmt::Display for ConsumerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Terminated(reason) => write!(f, "Terminated ({})", reason),
        }
    }
}

/// Why a consumer terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// A `DataValue` at or below the cursor arrived
    StaleValue { value: i64, current: i64 },
    /// The unregistration handshake completed
    Unregistered,
    /// The host dropped every sender to the mailbox
    MailboxClosed,
    /// The start hook failed before any message was handled
    InitFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleValue { value, current } => {
                write!(f, "stale value {} at cursor {}", value, current)
            }
            Self::Unregistered => write!(f, "unregistered"),
            Self::MailboxClosed => write!(f, "mailbox closed"),
            Self::InitFailed => write!(f, "init failed"),
        }
    }
}

/// Outcome of offering a value to a [`SequenceCursor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// Value was strictly greater and is now the cursor
    Advanced(i64),
    /// Value was at or below the cursor; cursor unchanged
    Stale { value: i64, current: i64 },
}

/// Monotonic sequence cursor
///
/// Only strictly greater values advance it. Equality counts as stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceCursor {
    current: i64,
}

impl SequenceCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> i64 {
        self.current
    }

    pub fn offer(&mut self, value: i64) -> Offer {
        if value <= self.current {
            return Offer::Stale {
                value,
                current: self.current,
            };
        }
        self.current = value;
        Offer::Advanced(value)
    }
}
