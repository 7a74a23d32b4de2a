use actor_runtime::{
    reply_channel, Actor, ChannelManager, ConsumerMail, Envelope, Recipient, Tell,
};
use anyhow::Context as _;
use clap::Parser;
use consumer_protocol::{ConsumerMessage, DelegateEvent, QueueRequest, SystemEvent};
use futures::stream::StreamExt;
use futures_channel::mpsc;
use queue_consumer::{Consumer, ConsumerConfig};
use std::path::PathBuf;
use tokio::task::JoinError;
use tracing_subscriber::EnvFilter;

/// Run a consumer against a scripted queue and a logging delegate
#[derive(Debug, Parser)]
#[command(name = "consumer-demo", version)]
struct Args {
    /// TOML file with consumer settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sequence values the queue emits, in order
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "1,2,3")]
    values: Vec<i64>,

    /// Register with the queue from the start hook
    #[arg(long)]
    register: bool,

    /// Close the mailbox instead of running the unregistration handshake
    #[arg(long)]
    skip_end: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<ConsumerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            ConsumerConfig::from_toml_str(&raw)?
        }
        None => ConsumerConfig::default(),
    };
    if args.register {
        config.register_on_start = true;
    }
    Ok(config)
}

/// Queue stand-in: acknowledges registration and unregistration
async fn scripted_queue(
    mut requests: mpsc::Receiver<QueueRequest>,
    mut consumer: Recipient<ConsumerMail>,
) {
    while let Some(request) = requests.next().await {
        tracing::info!(?request, "queue received request");
        let answer = match request {
            QueueRequest::RegisterConsumer => ConsumerMessage::RegistrationOk,
            QueueRequest::UnregisterConsumer => ConsumerMessage::UnregistrationOk,
        };
        if let Err(e) = consumer.tell(Envelope::new(answer)).await {
            tracing::warn!("queue could not answer: {}", e);
        }
        if request == QueueRequest::UnregisterConsumer {
            break;
        }
    }
}

/// Outcome of the scripted queue task, which the host may have aborted
fn queue_outcome(result: Result<(), JoinError>) -> anyhow::Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_cancelled() => Ok(()),
        Err(e) => Err(e).context("scripted queue panicked"),
    }
}

async fn log_delegate(mut events: mpsc::Receiver<DelegateEvent>) {
    while let Some(event) = events.next().await {
        tracing::info!(?event, "delegate received");
    }
}

async fn log_system_events(mut events: mpsc::Receiver<SystemEvent>) {
    while let Some(event) = events.next().await {
        match event {
            SystemEvent::Warning { message } => tracing::warn!("{}", message),
            SystemEvent::Error { message } => tracing::error!("{}", message),
            other => tracing::debug!(?other, "lifecycle"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(&args)?;

    let (mut manager, handles) = ChannelManager::new(&config.mailbox);
    let events = tokio::spawn(log_system_events(manager.take_event_receiver()));
    let delegate = tokio::spawn(log_delegate(handles.delegate_rx));
    let queue = tokio::spawn(scripted_queue(
        handles.queue_rx,
        manager.consumer_recipient(),
    ));

    let consumer = Consumer::with_config(
        manager.queue_recipient(),
        manager.delegate_recipient(),
        config,
    );
    let consumer_task = tokio::spawn(consumer.run(handles.consumer_rx, handles.event_tx));

    for value in &args.values {
        manager.send(ConsumerMessage::DataValue(*value))?;
    }

    let (reply_to, mut replies) = reply_channel(2);
    manager.send_with_reply(ConsumerMessage::GetCurrent, reply_to.clone())?;
    manager.send_with_reply(ConsumerMessage::Ping, reply_to)?;

    if args.skip_end {
        // The queue holds a consumer address; stop it so the mailbox can close.
        queue.abort();
    } else {
        manager.send(ConsumerMessage::End)?;
    }
    drop(manager);

    // A stale value stops the consumer before it reaches the requests.
    while let Some(reply) = replies.next().await {
        tracing::info!(?reply, "requester received");
    }

    let consumer = consumer_task.await.context("consumer task panicked")?;
    tracing::info!(
        current = consumer.current(),
        stopped_before_unregistration = consumer.stopped_before_unregistration(),
        state = %consumer.state(),
        "consumer finished"
    );
    // Releases the last queue and delegate senders
    drop(consumer);

    queue_outcome(queue.await)?;
    delegate.await.context("delegate task panicked")?;
    events.await.context("event logger panicked")?;
    Ok(())
}
