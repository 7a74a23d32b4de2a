//! Consumer configuration
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! register_on_start = false
//!
//! [mailbox]
//! consumer = 256
//! queue = 128
//! delegate = 256
//! events = 1024
//! ```

use actor_runtime::MailboxConfig;
use consumer_protocol::ActorError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumerConfig {
    /// Send `RegisterConsumer` to the queue from the start hook
    ///
    /// Off by default: registration is expected to happen before the
    /// consumer is wired in.
    pub register_on_start: bool,

    /// Channel capacities used by `ChannelManager`
    pub mailbox: MailboxConfig,
}

impl ConsumerConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ActorError> {
        let config: Self = toml::from_str(input)
            .map_err(|e| ActorError::Config(format!("invalid consumer config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ActorError> {
        self.mailbox.validate()
    }
}
