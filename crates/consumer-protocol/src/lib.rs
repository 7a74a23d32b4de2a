//! # Consumer Protocol
//!
//! Type-safe message definitions for the queue consumer.
//!
//! This crate defines every message exchanged between the consumer and its
//! two peers, plus the consumer's state model. It has no runtime
//! dependencies (no channels, no executor), making it fully testable on its
//! own.
//!
//! ## Architecture
//!
//! - **ConsumerMessage**: Queue (or any requester) → Consumer
//! - **QueueRequest**: Consumer → Queue
//! - **DelegateEvent**: Consumer → Delegate
//! - **Reply**: Consumer → original sender of `GetCurrent` / `Ping`
//! - **SystemEvent**: Actor runtime → host (lifecycle observations)
//! - **ConsumerState**: two-state lifecycle (pure logic, no side effects)
//!
//! ## Message Flow
//!
//! ```text
//! Queue → ConsumerMessage → Consumer → DelegateEvent → Delegate
//!   ↑                          │
//!   └────── QueueRequest ──────┘
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod errors;
pub mod messages;
pub mod state;

pub use errors::ActorError;
pub use messages::{ConsumerMessage, DelegateEvent, QueueRequest, Reply, StopCause, SystemEvent};
pub use state::{ConsumerState, Offer, SequenceCursor, StopReason};
