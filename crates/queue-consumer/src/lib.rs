//! # Queue Consumer
//!
//! A single message-driven consumer that takes sequence values from a queue,
//! accepts only strictly increasing ones, forwards them to a delegate, and
//! unregisters from the queue through an explicit handshake.
//!
//! ## Actors
//!
//! - **Consumer**: cursor, registration flag and the message reactions
//!
//! The queue and the delegate are peers reached through
//! [`actor_runtime::Tell`]; this crate does not implement them.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod config;
pub mod consumer_actor;

pub use config::ConsumerConfig;
pub use consumer_actor::Consumer;
