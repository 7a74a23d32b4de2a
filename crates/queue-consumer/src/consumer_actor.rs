use crate::config::ConsumerConfig;
use actor_runtime::{
    actor_debug, actor_info, Actor, ConsumerMail, Context, Envelope, Recipient, Tell,
};
use consumer_protocol::{
    ActorError, ConsumerMessage, ConsumerState, DelegateEvent, Offer, QueueRequest, Reply,
    SequenceCursor, StopCause, StopReason,
};

/// Consumer tracks one sequence cursor against one queue and one delegate
///
/// Responsibilities:
/// - Accept strictly increasing `DataValue`s and forward them to the delegate
/// - Stop on the first stale or duplicate value
/// - Relay registration acks to the delegate
/// - Answer `GetCurrent` and `Ping` to whoever asked
/// - Run the `End` → `UnregisterConsumer` → `UnregistrationOk` handshake
///
/// Peers are fixed at construction. Any [`Tell`] implementation can stand in
/// for them; by default they are mailbox [`Recipient`]s.
pub struct Consumer<Q = Recipient<QueueRequest>, D = Recipient<DelegateEvent>> {
    queue: Q,
    delegate: D,
    cursor: SequenceCursor,
    /// Cleared only by `UnregistrationOk`
    stopped_before_unregistration: bool,
    state: ConsumerState,
    config: ConsumerConfig,
}

impl<Q, D> Consumer<Q, D>
where
    Q: Tell<QueueRequest>,
    D: Tell<DelegateEvent>,
{
    pub fn new(queue: Q, delegate: D) -> Self {
        Self::with_config(queue, delegate, ConsumerConfig::default())
    }

    pub fn with_config(queue: Q, delegate: D, config: ConsumerConfig) -> Self {
        Self {
            queue,
            delegate,
            cursor: SequenceCursor::new(),
            stopped_before_unregistration: true,
            state: ConsumerState::Active,
            config,
        }
    }

    /// Highest value accepted so far (0 before the first)
    pub fn current(&self) -> i64 {
        self.cursor.current()
    }

    /// `false` only once the queue has confirmed unregistration
    pub fn stopped_before_unregistration(&self) -> bool {
        self.stopped_before_unregistration
    }

    pub fn state(&self) -> ConsumerState {
        self.state
    }

    async fn handle_data_value(&mut self, value: i64, ctx: &mut Context) -> Result<(), ActorError> {
        match self.cursor.offer(value) {
            Offer::Advanced(value) => {
                actor_debug!("Consumer: accepted {}", value);
                self.delegate.tell(DelegateEvent::Value(value)).await
            }
            Offer::Stale { value, current } => {
                actor_info!(
                    "Consumer: stale value {} at cursor {}, stopping",
                    value,
                    current
                );
                self.terminate(ctx, StopReason::StaleValue { value, current });
                Ok(())
            }
        }
    }

    async fn handle_end(&mut self) -> Result<(), ActorError> {
        actor_info!("Consumer: requesting unregistration");
        self.queue.tell(QueueRequest::UnregisterConsumer).await
    }

    fn handle_unregistration_ok(&mut self, ctx: &mut Context) {
        actor_info!("Consumer: unregistered at cursor {}", self.cursor.current());
        self.stopped_before_unregistration = false;
        self.terminate(ctx, StopReason::Unregistered);
    }

    async fn reply(reply_to: Option<Recipient<Reply>>, reply: Reply) -> Result<(), ActorError> {
        match reply_to {
            Some(mut sender) => sender.tell(reply).await,
            None => {
                actor_debug!("Consumer: no sender to answer with {:?}", reply);
                Ok(())
            }
        }
    }

    fn terminate(&mut self, ctx: &mut Context, reason: StopReason) {
        self.state = ConsumerState::Terminated(reason);
        ctx.stop();
    }
}

impl<Q, D> Actor for Consumer<Q, D>
where
    Q: Tell<QueueRequest> + 'static,
    D: Tell<DelegateEvent> + 'static,
{
    type Message = ConsumerMail;

    fn name(&self) -> &'static str {
        "Consumer"
    }

    async fn init(&mut self, _ctx: &mut Context) -> Result<(), ActorError> {
        if self.config.register_on_start {
            actor_info!("Consumer: registering with queue");
            self.queue.tell(QueueRequest::RegisterConsumer).await?;
        }
        Ok(())
    }

    async fn handle(&mut self, mail: Self::Message, ctx: &mut Context) -> Result<(), ActorError> {
        let Envelope { message, reply_to } = mail;

        if self.state.is_terminated() {
            return Err(ActorError::UnexpectedMessage {
                state: self.state.to_string(),
                message: message.kind().to_string(),
            });
        }

        match message {
            ConsumerMessage::DataValue(value) => self.handle_data_value(value, ctx).await,
            ConsumerMessage::RegistrationOk => {
                self.delegate.tell(DelegateEvent::RegistrationOk).await
            }
            ConsumerMessage::UnexpectedRegistration => {
                self.delegate
                    .tell(DelegateEvent::UnexpectedRegistration)
                    .await
            }
            ConsumerMessage::GetCurrent => {
                Self::reply(reply_to, Reply::Current(self.cursor.current())).await
            }
            ConsumerMessage::End => self.handle_end().await,
            ConsumerMessage::UnregistrationOk => {
                self.handle_unregistration_ok(ctx);
                Ok(())
            }
            ConsumerMessage::Ping => Self::reply(reply_to, Reply::Pong).await,
            ConsumerMessage::Unrecognized => {
                actor_debug!("Consumer: ignoring unrecognized message");
                Ok(())
            }
        }
    }

    async fn shutdown(&mut self, ctx: &mut Context, cause: StopCause) {
        if self.state.is_active() {
            debug_assert_ne!(cause, StopCause::SelfStopped);
            let reason = match cause {
                StopCause::InitFailed => StopReason::InitFailed,
                _ => StopReason::MailboxClosed,
            };
            self.state = ConsumerState::Terminated(reason);
        }

        if self.stopped_before_unregistration {
            ctx.warn("Stopped before unregistration");
        }
    }
}
