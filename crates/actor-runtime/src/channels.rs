use consumer_protocol::{ActorError, ConsumerMessage, DelegateEvent, QueueRequest, Reply, SystemEvent};
use futures::sink::SinkExt;
use futures_channel::mpsc;
use serde::{Deserialize, Serialize};

/// Delivery to a peer
///
/// The consumer only ever needs to push a message at a peer; it never owns
/// the peer and never waits for an answer. Anything that can accept a message
/// of type `M` can stand in for a queue, a delegate or a requester.
#[allow(async_fn_in_trait)]
pub trait Tell<M>: Send {
    /// Deliver `message`, waiting for room if the peer is behind
    ///
    /// A peer that is slow holds the caller back; nothing is dropped. Fails
    /// only when the peer's mailbox is gone.
    async fn tell(&mut self, message: M) -> Result<(), ActorError>;
}

/// Address of an actor mailbox
///
/// Clone is cheap (sender handle clone). Each clone gets its own guaranteed
/// slot in the channel, so keep one `Recipient` per peer rather than cloning
/// per message.
#[derive(Debug)]
pub struct Recipient<M> {
    name: &'static str,
    tx: mpsc::Sender<M>,
}

impl<M> Clone for Recipient<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            tx: self.tx.clone(),
        }
    }
}

impl<M> Recipient<M> {
    pub fn new(name: &'static str, tx: mpsc::Sender<M>) -> Self {
        Self { name, tx }
    }

    /// Deliver without waiting, for callers outside an actor
    ///
    /// Reports `MailboxFull` instead of holding the caller back.
    pub fn try_tell(&mut self, message: M) -> Result<(), ActorError> {
        self.tx.try_send(message).map_err(|e| {
            if e.is_full() {
                ActorError::MailboxFull(format!(
                    "{} is not keeping up; message dropped",
                    self.name
                ))
            } else {
                ActorError::ChannelClosed(format!("{} mailbox dropped", self.name))
            }
        })
    }
}

impl<M: Send> Tell<M> for Recipient<M> {
    async fn tell(&mut self, message: M) -> Result<(), ActorError> {
        self.tx
            .send(message)
            .await
            .map_err(|_| ActorError::ChannelClosed(format!("{} mailbox dropped", self.name)))
    }
}

/// A message together with the address to answer
///
/// `reply_to` is `None` when the sender does not expect an answer.
#[derive(Debug)]
pub struct Envelope<M, R> {
    pub message: M,
    pub reply_to: Option<Recipient<R>>,
}

impl<M, R> Envelope<M, R> {
    pub fn new(message: M) -> Self {
        Self {
            message,
            reply_to: None,
        }
    }

    pub fn with_reply(message: M, reply_to: Recipient<R>) -> Self {
        Self {
            message,
            reply_to: Some(reply_to),
        }
    }
}

/// Mail delivered to the consumer
pub type ConsumerMail = Envelope<ConsumerMessage, Reply>;

/// Mailbox capacities
///
/// All channels are bounded so a stalled peer cannot exhaust memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailboxConfig {
    /// Consumer inbox (data values and control messages)
    pub consumer: usize,
    /// Queue inbox (unregistration requests, low frequency)
    pub queue: usize,
    /// Delegate inbox (one event per accepted value)
    pub delegate: usize,
    /// Lifecycle events for the host
    pub events: usize,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            consumer: 256,
            queue: 128,
            delegate: 256,
            events: 1024,
        }
    }
}

impl MailboxConfig {
    pub fn validate(&self) -> Result<(), ActorError> {
        let fields = [
            ("consumer", self.consumer),
            ("queue", self.queue),
            ("delegate", self.delegate),
            ("events", self.events),
        ];
        for (field, capacity) in fields {
            if capacity == 0 {
                return Err(ActorError::Config(format!(
                    "mailbox.{} must be greater than zero",
                    field
                )));
            }
        }
        Ok(())
    }
}

/// Receiving ends, handed to whoever runs each participant
pub struct ActorHandles {
    pub consumer_rx: mpsc::Receiver<ConsumerMail>,
    pub queue_rx: mpsc::Receiver<QueueRequest>,
    pub delegate_rx: mpsc::Receiver<DelegateEvent>,
    pub event_tx: mpsc::Sender<SystemEvent>,
}

/// Channel manager for the consumer and its peers
///
/// Owns the sending side of every mailbox and the receiving side of the
/// lifecycle event channel.
pub struct ChannelManager {
    consumer: Recipient<ConsumerMail>,
    queue_tx: mpsc::Sender<QueueRequest>,
    delegate_tx: mpsc::Sender<DelegateEvent>,
    event_rx: mpsc::Receiver<SystemEvent>,
}

impl ChannelManager {
    /// Create a new channel manager and actor handles
    ///
    /// Returns (ChannelManager for the host, ActorHandles for spawning)
    pub fn new(config: &MailboxConfig) -> (Self, ActorHandles) {
        let (consumer_tx, consumer_rx) = mpsc::channel(config.consumer);
        let (queue_tx, queue_rx) = mpsc::channel(config.queue);
        let (delegate_tx, delegate_rx) = mpsc::channel(config.delegate);
        let (event_tx, event_rx) = mpsc::channel(config.events);

        let handles = ActorHandles {
            consumer_rx,
            queue_rx,
            delegate_rx,
            event_tx,
        };

        let manager = Self {
            consumer: Recipient::new("consumer", consumer_tx),
            queue_tx,
            delegate_tx,
            event_rx,
        };

        (manager, handles)
    }

    /// Send a message to the consumer without expecting an answer
    pub fn send(&mut self, message: ConsumerMessage) -> Result<(), ActorError> {
        self.consumer.try_tell(Envelope::new(message))
    }

    /// Send a message to the consumer, naming where the answer goes
    pub fn send_with_reply(
        &mut self,
        message: ConsumerMessage,
        reply_to: Recipient<Reply>,
    ) -> Result<(), ActorError> {
        self.consumer.try_tell(Envelope::with_reply(message, reply_to))
    }

    pub fn consumer_recipient(&self) -> Recipient<ConsumerMail> {
        self.consumer.clone()
    }

    pub fn queue_recipient(&self) -> Recipient<QueueRequest> {
        Recipient::new("queue", self.queue_tx.clone())
    }

    pub fn delegate_recipient(&self) -> Recipient<DelegateEvent> {
        Recipient::new("delegate", self.delegate_tx.clone())
    }

    /// Take ownership of event receiver
    ///
    /// Events sent after this call only reach the returned receiver.
    pub fn take_event_receiver(&mut self) -> mpsc::Receiver<SystemEvent> {
        let (_new_tx, new_rx) = mpsc::channel(1);
        std::mem::replace(&mut self.event_rx, new_rx)
    }
}

/// Create a reply mailbox for requests such as `GetCurrent` and `Ping`
pub fn reply_channel(capacity: usize) -> (Recipient<Reply>, mpsc::Receiver<Reply>) {
    let (tx, rx) = mpsc::channel(capacity);
    (Recipient::new("requester", tx), rx)
}
