use serde::{Deserialize, Serialize};
use std::fmt;

/// Messages delivered to the consumer
///
/// Sent by the queue (data values, registration acks, control messages) or
/// by any requester (`GetCurrent`, `Ping`). Serialized adjacently tagged:
/// `{"kind": "DataValue", "value": 7}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum ConsumerMessage {
    /// Next sequence value from the queue
    DataValue(i64),

    /// Queue accepted the consumer's registration
    RegistrationOk,

    /// Queue saw a registration it did not expect
    UnexpectedRegistration,

    /// Ask for the current sequence cursor (answered with `Reply::Current`)
    GetCurrent,

    /// Begin the unregistration handshake
    End,

    /// Queue confirmed the unregistration
    UnregistrationOk,

    /// Liveness check (answered with `Reply::Pong`)
    Ping,

    /// Any kind this build does not know about
    #[serde(other)]
    Unrecognized,
}

impl ConsumerMessage {
    /// Variant name, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DataValue(_) => "DataValue",
            Self::RegistrationOk => "RegistrationOk",
            Self::UnexpectedRegistration => "UnexpectedRegistration",
            Self::GetCurrent => "GetCurrent",
            Self::End => "End",
            Self::UnregistrationOk => "UnregistrationOk",
            Self::Ping => "Ping",
            Self::Unrecognized => "Unrecognized",
        }
    }
}

/// Requests from the consumer to the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum QueueRequest {
    /// Sent from the start hook when `register_on_start` is enabled
    RegisterConsumer,

    /// Sent on `End`; the queue answers with `UnregistrationOk`
    UnregisterConsumer,
}

/// What the delegate observes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum DelegateEvent {
    /// An accepted sequence value
    Value(i64),
    RegistrationOk,
    UnexpectedRegistration,
}

/// Replies sent back to the sender of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Reply {
    /// Answer to `GetCurrent`
    Current(i64),
    /// Answer to `Ping`
    Pong,
}

/// Why an actor's run loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopCause {
    /// The actor asked to stop from inside a handler
    SelfStopped,
    /// Every sender to the actor's mailbox was dropped
    MailboxClosed,
    /// The start hook returned an error
    InitFailed,
}

impl fmt::Display for StopCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfStopped => write!(f, "self-stopped"),
            Self::MailboxClosed => write!(f, "mailbox closed"),
            Self::InitFailed => write!(f, "init failed"),
        }
    }
}

/// Events from the actor runtime to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemEvent {
    /// Start hook completed, message processing begins
    Started { actor: String },

    /// Stop hook completed
    Stopped { actor: String, cause: StopCause },

    /// Non-fatal diagnostic raised by an actor
    Warning { message: String },

    /// A handler or hook returned an error
    Error { message: String },
}
