//! Integration tests for the consumer running on its own task
//!
//! The queue is played by a scripted task that answers registration and
//! unregistration requests; the delegate is a plain mailbox the test drains.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use actor_runtime::{reply_channel, Actor, ChannelManager, MailboxConfig, Recipient, Tell};
use consumer_protocol::{
    ConsumerMessage, ConsumerState, DelegateEvent, QueueRequest, Reply, StopCause, StopReason,
    SystemEvent,
};
use futures::stream::StreamExt;
use futures_channel::mpsc;
use queue_consumer::{Consumer, ConsumerConfig};
use std::time::Duration;

/// Answer queue requests the way a well-behaved queue would
fn spawn_scripted_queue(
    mut queue_rx: mpsc::Receiver<QueueRequest>,
    mut consumer: Recipient<actor_runtime::ConsumerMail>,
) -> tokio::task::JoinHandle<Vec<QueueRequest>> {
    tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(request) = queue_rx.next().await {
            seen.push(request);
            match request {
                QueueRequest::RegisterConsumer => {
                    let _ = consumer
                        .tell(actor_runtime::Envelope::new(ConsumerMessage::RegistrationOk))
                        .await;
                }
                QueueRequest::UnregisterConsumer => {
                    let _ = consumer
                        .tell(actor_runtime::Envelope::new(
                            ConsumerMessage::UnregistrationOk,
                        ))
                        .await;
                    break;
                }
            }
        }
        seen
    })
}

fn drain<T>(rx: &mut mpsc::Receiver<T>) -> Vec<T> {
    let mut out = Vec::new();
    while let Ok(Some(item)) = rx.try_next() {
        out.push(item);
    }
    out
}

#[tokio::test]
async fn test_full_session_with_unregistration_handshake() {
    let (mut manager, handles) = ChannelManager::new(&MailboxConfig::default());
    let mut events = manager.take_event_receiver();
    let mut delegate_rx = handles.delegate_rx;

    let consumer = Consumer::new(manager.queue_recipient(), manager.delegate_recipient());
    let queue = spawn_scripted_queue(handles.queue_rx, manager.consumer_recipient());
    let task = tokio::spawn(consumer.run(handles.consumer_rx, handles.event_tx));

    let (reply_to, mut reply_rx) = reply_channel(4);
    manager.send(ConsumerMessage::RegistrationOk).unwrap();
    for value in [1, 2, 3] {
        manager.send(ConsumerMessage::DataValue(value)).unwrap();
    }
    manager
        .send_with_reply(ConsumerMessage::GetCurrent, reply_to)
        .unwrap();
    manager.send(ConsumerMessage::End).unwrap();

    let consumer = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("consumer should stop after UnregistrationOk")
        .unwrap();

    assert!(!consumer.stopped_before_unregistration());
    assert_eq!(consumer.current(), 3);
    assert_eq!(
        consumer.state(),
        ConsumerState::Terminated(StopReason::Unregistered)
    );

    assert_eq!(reply_rx.next().await, Some(Reply::Current(3)));
    assert_eq!(
        drain(&mut delegate_rx),
        vec![
            DelegateEvent::RegistrationOk,
            DelegateEvent::Value(1),
            DelegateEvent::Value(2),
            DelegateEvent::Value(3),
        ]
    );
    assert_eq!(
        queue.await.unwrap(),
        vec![QueueRequest::UnregisterConsumer]
    );

    let events: Vec<_> = events.by_ref().collect().await;
    assert_eq!(
        events,
        vec![
            SystemEvent::Started {
                actor: "Consumer".into()
            },
            SystemEvent::Stopped {
                actor: "Consumer".into(),
                cause: StopCause::SelfStopped,
            },
        ]
    );
}

#[tokio::test]
async fn test_stale_value_stops_consumer_and_warns() {
    let (mut manager, handles) = ChannelManager::new(&MailboxConfig::default());
    let mut events = manager.take_event_receiver();
    let mut delegate_rx = handles.delegate_rx;

    let consumer = Consumer::new(manager.queue_recipient(), manager.delegate_recipient());
    let task = tokio::spawn(consumer.run(handles.consumer_rx, handles.event_tx));

    for value in [5, 5, 6] {
        manager.send(ConsumerMessage::DataValue(value)).unwrap();
    }

    let consumer = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("consumer should stop on the duplicate")
        .unwrap();

    assert_eq!(consumer.current(), 5);
    assert!(consumer.stopped_before_unregistration());
    assert_eq!(
        consumer.state(),
        ConsumerState::Terminated(StopReason::StaleValue {
            value: 5,
            current: 5
        })
    );
    assert_eq!(drain(&mut delegate_rx), vec![DelegateEvent::Value(5)]);

    let events: Vec<_> = events.by_ref().collect().await;
    assert!(events.contains(&SystemEvent::Warning {
        message: "Stopped before unregistration".into()
    }));

    // Mailbox is closed once the consumer has stopped
    assert!(manager.send(ConsumerMessage::DataValue(7)).is_err());
}

#[tokio::test]
async fn test_unanswered_end_keeps_consumer_alive() {
    let (mut manager, handles) = ChannelManager::new(&MailboxConfig::default());
    let mut events = manager.take_event_receiver();
    let mut queue_rx = handles.queue_rx;

    let consumer = Consumer::new(manager.queue_recipient(), manager.delegate_recipient());
    let task = tokio::spawn(consumer.run(handles.consumer_rx, handles.event_tx));

    manager.send(ConsumerMessage::End).unwrap();
    assert_eq!(queue_rx.next().await, Some(QueueRequest::UnregisterConsumer));

    // The queue never answers; there is no handshake timeout
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!task.is_finished());

    let (reply_to, mut reply_rx) = reply_channel(4);
    manager
        .send_with_reply(ConsumerMessage::Ping, reply_to)
        .unwrap();
    assert_eq!(reply_rx.next().await, Some(Reply::Pong));

    // Host tears the consumer down by closing its mailbox
    drop(manager);
    let consumer = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("consumer should stop once its mailbox closes")
        .unwrap();

    assert!(consumer.stopped_before_unregistration());
    assert_eq!(
        consumer.state(),
        ConsumerState::Terminated(StopReason::MailboxClosed)
    );

    let events: Vec<_> = events.by_ref().collect().await;
    assert!(events.iter().any(|e| matches!(e, SystemEvent::Warning { .. })));
    assert!(events.contains(&SystemEvent::Stopped {
        actor: "Consumer".into(),
        cause: StopCause::MailboxClosed,
    }));
}

#[tokio::test]
async fn test_register_on_start_round_trip() {
    let config = ConsumerConfig {
        register_on_start: true,
        ..ConsumerConfig::default()
    };
    let (mut manager, handles) = ChannelManager::new(&config.mailbox);
    let mut delegate_rx = handles.delegate_rx;

    let consumer =
        Consumer::with_config(manager.queue_recipient(), manager.delegate_recipient(), config);
    let queue = spawn_scripted_queue(handles.queue_rx, manager.consumer_recipient());
    let task = tokio::spawn(consumer.run(handles.consumer_rx, handles.event_tx));

    assert_eq!(delegate_rx.next().await, Some(DelegateEvent::RegistrationOk));

    manager.send(ConsumerMessage::DataValue(10)).unwrap();
    assert_eq!(delegate_rx.next().await, Some(DelegateEvent::Value(10)));

    manager.send(ConsumerMessage::End).unwrap();
    let consumer = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("consumer should finish the handshake")
        .unwrap();

    assert!(!consumer.stopped_before_unregistration());
    assert_eq!(
        queue.await.unwrap(),
        vec![
            QueueRequest::RegisterConsumer,
            QueueRequest::UnregisterConsumer
        ]
    );
}

#[tokio::test]
async fn test_unknown_wire_kind_is_ignored() {
    let (mut manager, handles) = ChannelManager::new(&MailboxConfig::default());
    let mut delegate_rx = handles.delegate_rx;

    let consumer = Consumer::new(manager.queue_recipient(), manager.delegate_recipient());
    let task = tokio::spawn(consumer.run(handles.consumer_rx, handles.event_tx));

    let decoded: ConsumerMessage = serde_json::from_str(r#"{"kind":"Rebalance"}"#).unwrap();
    manager.send(decoded).unwrap();
    manager.send(ConsumerMessage::DataValue(1)).unwrap();
    assert_eq!(delegate_rx.next().await, Some(DelegateEvent::Value(1)));

    drop(manager);
    let consumer = task.await.unwrap();
    assert_eq!(consumer.current(), 1);
}

#[tokio::test]
async fn test_slow_delegate_gets_every_value_of_a_burst() {
    let config = MailboxConfig {
        delegate: 4,
        ..MailboxConfig::default()
    };
    let (mut manager, handles) = ChannelManager::new(&config);
    let mut events = manager.take_event_receiver();
    let mut delegate_rx = handles.delegate_rx;

    let delegate = tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(event) = delegate_rx.next().await {
            tokio::time::sleep(Duration::from_millis(5)).await;
            seen.push(event);
        }
        seen
    });

    let consumer = Consumer::new(manager.queue_recipient(), manager.delegate_recipient());
    let task = tokio::spawn(consumer.run(handles.consumer_rx, handles.event_tx));

    for value in 1..=10 {
        manager.send(ConsumerMessage::DataValue(value)).unwrap();
    }
    drop(manager);

    let consumer = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("consumer should finish once the delegate catches up")
        .unwrap();
    assert_eq!(consumer.current(), 10);
    // Releases the last delegate sender
    drop(consumer);

    let seen = delegate.await.unwrap();
    assert_eq!(
        seen,
        (1..=10).map(DelegateEvent::Value).collect::<Vec<_>>()
    );

    let events: Vec<_> = events.by_ref().collect().await;
    assert!(!events
        .iter()
        .any(|e| matches!(e, SystemEvent::Error { .. })));
}

#[tokio::test]
async fn test_handshake_completes_behind_a_busy_queue() {
    let config = ConsumerConfig {
        register_on_start: true,
        mailbox: MailboxConfig {
            queue: 1,
            ..MailboxConfig::default()
        },
    };
    let (mut manager, handles) = ChannelManager::new(&config.mailbox);
    let mut queue_rx = handles.queue_rx;

    // Another producer already filled the queue's buffer
    let mut other = manager.queue_recipient();
    other.tell(QueueRequest::RegisterConsumer).await.unwrap();

    let consumer =
        Consumer::with_config(manager.queue_recipient(), manager.delegate_recipient(), config);
    let mut answers = manager.consumer_recipient();
    let task = tokio::spawn(consumer.run(handles.consumer_rx, handles.event_tx));

    for value in [1, 2] {
        manager.send(ConsumerMessage::DataValue(value)).unwrap();
    }
    manager.send(ConsumerMessage::End).unwrap();

    // The queue is slow to pick up its mail; End waits behind the registration
    tokio::time::sleep(Duration::from_millis(50)).await;
    let mut requests = Vec::new();
    for _ in 0..3 {
        requests.push(queue_rx.next().await.unwrap());
    }
    assert_eq!(
        requests,
        vec![
            QueueRequest::RegisterConsumer,
            QueueRequest::RegisterConsumer,
            QueueRequest::UnregisterConsumer
        ]
    );
    answers
        .tell(actor_runtime::Envelope::new(ConsumerMessage::UnregistrationOk))
        .await
        .unwrap();

    let consumer = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("consumer should stop after UnregistrationOk")
        .unwrap();
    assert!(!consumer.stopped_before_unregistration());
    assert_eq!(consumer.current(), 2);
    assert_eq!(
        consumer.state(),
        ConsumerState::Terminated(StopReason::Unregistered)
    );
}
