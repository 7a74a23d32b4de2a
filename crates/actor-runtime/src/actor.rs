use crate::{actor_debug, actor_error, actor_warn};
use consumer_protocol::{ActorError, StopCause, SystemEvent};
use futures::stream::StreamExt;
use futures_channel::mpsc;

/// Per-run handle given to every lifecycle hook
///
/// Lets an actor stop itself and raise observations for the host without
/// holding its own copy of the event channel.
pub struct Context {
    name: &'static str,
    event_tx: mpsc::Sender<SystemEvent>,
    stop_requested: bool,
}

impl Context {
    pub fn new(name: &'static str, event_tx: mpsc::Sender<SystemEvent>) -> Self {
        Self {
            name,
            event_tx,
            stop_requested: false,
        }
    }

    /// Ask the run loop to stop after the current hook returns
    ///
    /// Messages still queued in the mailbox are not handled.
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn is_stopping(&self) -> bool {
        self.stop_requested
    }

    /// Log a warning and report it to the host as `SystemEvent::Warning`
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        actor_warn!(actor = self.name, "{}", message);
        self.emit(SystemEvent::Warning { message });
    }

    /// Best-effort delivery of a lifecycle event
    ///
    /// A host that dropped or stopped draining its event receiver loses
    /// events; the actor keeps running.
    pub fn emit(&mut self, event: SystemEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            actor_debug!(actor = self.name, "event dropped: {}", e);
        }
    }
}

/// Actor trait for implementing message-driven components
///
/// Actors are independent, stateful components that communicate through
/// message passing. Each actor has its own mailbox and processes messages
/// sequentially; no two hooks of the same actor ever run concurrently.
///
/// # Lifecycle
///
/// 1. **init()** - Called once before message processing starts
/// 2. **handle()** - Called for each received message
/// 3. **shutdown()** - Called once when the actor is stopping, whatever the cause
///
/// # Example
///
/// ```ignore
/// struct Echo {
///     seen: u32,
/// }
///
/// impl Actor for Echo {
///     type Message = String;
///
///     fn name(&self) -> &'static str {
///         "Echo"
///     }
///
///     async fn handle(&mut self, msg: String, ctx: &mut Context) -> Result<(), ActorError> {
///         self.seen += 1;
///         if msg == "bye" {
///             ctx.stop();
///         }
///         Ok(())
///     }
/// }
///
/// let echo = tokio::spawn(Echo { seen: 0 }.run(rx, event_tx)).await?;
/// ```
#[allow(async_fn_in_trait)]
pub trait Actor: Send + 'static {
    /// Message type this actor processes
    type Message: Send + 'static;

    /// Actor name (used for logging and lifecycle events)
    fn name(&self) -> &'static str;

    /// Start hook
    ///
    /// Called once before the first message. An error skips message
    /// processing entirely; `shutdown()` still runs.
    async fn init(&mut self, _ctx: &mut Context) -> Result<(), ActorError> {
        Ok(())
    }

    /// Handle a single message
    ///
    /// An error is reported to the host and processing continues with the
    /// next message. Call `ctx.stop()` to end the run.
    async fn handle(&mut self, msg: Self::Message, ctx: &mut Context) -> Result<(), ActorError>;

    /// Stop hook
    async fn shutdown(&mut self, _ctx: &mut Context, _cause: StopCause) {}

    /// Main actor run loop (provided by runtime)
    ///
    /// Consumes the actor, runs it to completion and hands it back so the
    /// host can inspect its final state.
    ///
    /// # Arguments
    ///
    /// * `rx` - Mailbox to receive messages from
    /// * `event_tx` - Channel for lifecycle events to the host
    async fn run(
        mut self,
        mut rx: mpsc::Receiver<Self::Message>,
        event_tx: mpsc::Sender<SystemEvent>,
    ) -> Self
    where
        Self: Sized,
    {
        let name = self.name();
        let mut ctx = Context::new(name, event_tx);

        if let Err(e) = self.init(&mut ctx).await {
            let message = format!("{} init failed: {}", name, e);
            actor_error!(actor = name, "{}", message);
            ctx.emit(SystemEvent::Error { message });
            rx.close();
            self.shutdown(&mut ctx, StopCause::InitFailed).await;
            ctx.emit(SystemEvent::Stopped {
                actor: name.to_string(),
                cause: StopCause::InitFailed,
            });
            return self;
        }

        actor_debug!(actor = name, "{} started", name);
        ctx.emit(SystemEvent::Started {
            actor: name.to_string(),
        });

        let cause = loop {
            if ctx.is_stopping() {
                break StopCause::SelfStopped;
            }
            let Some(msg) = rx.next().await else {
                break StopCause::MailboxClosed;
            };
            if let Err(e) = self.handle(msg, &mut ctx).await {
                let message = format!("{} error: {}", name, e);
                actor_warn!(actor = name, "{}", message);
                ctx.emit(SystemEvent::Error { message });
            }
        };

        // No sender can enqueue once we stop draining.
        rx.close();
        self.shutdown(&mut ctx, cause).await;

        actor_debug!(actor = name, "{} stopped ({})", name, cause);
        ctx.emit(SystemEvent::Stopped {
            actor: name.to_string(),
            cause,
        });

        self
    }
}
