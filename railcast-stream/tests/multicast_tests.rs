// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{stream, StreamExt};
use railcast_core::{RailcastError, ReplayPolicy, StreamItem, Subject, SubjectStream};
use railcast_stream::{ConnectionState, MulticastExt, SharedSource};
use railcast_test_utils::{
    assert_no_element_emitted, assert_stream_ended, test_channel, unwrap_stream,
    ErrorInjectingStream,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test]
async fn publish_forwards_every_item_to_the_transform() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<i32>();
    let mut output = source.publish(|shared| shared.subscribe().map(|item| item.map(|x| x * 2)));

    // Act
    tx.send(1)?;
    tx.send(2)?;

    // Assert
    assert_eq!(unwrap_stream(&mut output, 500).await, StreamItem::Value(2));
    assert_eq!(unwrap_stream(&mut output, 500).await, StreamItem::Value(4));

    drop(tx);
    assert_stream_ended(&mut output, 500).await;
    Ok(())
}

#[tokio::test]
async fn transform_subscriptions_share_one_collection() -> anyhow::Result<()> {
    // Arrange
    let pulls = Arc::new(AtomicUsize::new(0));
    let counter = pulls.clone();
    let source = stream::iter(1..=4).map(move |x| {
        counter.fetch_add(1, Ordering::SeqCst);
        StreamItem::Value(x)
    });

    // Act
    let sums: Vec<i32> = source
        .publish(|shared| {
            shared
                .subscribe()
                .zip(shared.subscribe())
                .map(|(a, b)| a.and_then(|a| b.map(|b| a + b)))
        })
        .map(StreamItem::unwrap)
        .collect()
        .await;

    // Assert
    assert_eq!(sums, vec![2, 4, 6, 8]);
    assert_eq!(pulls.load(Ordering::SeqCst), 4);
    Ok(())
}

#[tokio::test]
async fn nothing_is_collected_before_the_first_poll() -> anyhow::Result<()> {
    // Arrange
    let transforms = Arc::new(AtomicUsize::new(0));
    let counter = transforms.clone();
    let (tx, source) = test_channel::<i32>();

    // Act
    let output = source.publish(move |shared| {
        counter.fetch_add(1, Ordering::SeqCst);
        shared.subscribe()
    });
    tx.send(1)?;
    sleep(Duration::from_millis(20)).await;

    // Assert
    assert_eq!(output.connection_state(), ConnectionState::NotConnected);
    assert_eq!(transforms.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn replay_late_subscriber_sees_capped_history_then_live_items() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<i32>();
    let stash: Arc<Mutex<Option<SharedSource<i32>>>> = Arc::new(Mutex::new(None));
    let keep = stash.clone();
    let mut early = source.replay(ReplayPolicy::max_size(2), move |shared| {
        *keep.lock().unwrap() = Some(shared.clone());
        shared.subscribe()
    });

    // Act - consumer A is attached from the start
    for value in 1..=3 {
        tx.send(value)?;
        assert_eq!(unwrap_stream(&mut early, 500).await, StreamItem::Value(value));
    }

    // Consumer B attaches once 3 has been offered
    let shared = stash.lock().unwrap().clone().expect("transform ran");
    let late = shared.subscribe();
    tx.send(4)?;
    tx.send(5)?;
    drop(tx);

    // Assert
    let a: Vec<i32> = early.map(StreamItem::unwrap).collect().await;
    let b: Vec<i32> = late.map(StreamItem::unwrap).collect().await;
    assert_eq!(a, vec![4, 5]);
    assert_eq!(b, vec![2, 3, 4, 5]);
    Ok(())
}

#[tokio::test]
async fn upstream_error_reaches_every_subscription() -> anyhow::Result<()> {
    // Arrange
    let source = ErrorInjectingStream::new(stream::iter(1..=5), 2);
    let sibling: Arc<Mutex<Option<SubjectStream<i32>>>> = Arc::new(Mutex::new(None));
    let keep = sibling.clone();

    // Act
    let mut output = source.publish(move |shared| {
        *keep.lock().unwrap() = Some(shared.subscribe());
        shared.subscribe()
    });

    // Assert
    assert_eq!(unwrap_stream(&mut output, 500).await, StreamItem::Value(1));
    assert_eq!(unwrap_stream(&mut output, 500).await, StreamItem::Value(2));
    assert!(unwrap_stream(&mut output, 500).await.is_error());
    assert_stream_ended(&mut output, 500).await;

    let mut sibling = sibling.lock().unwrap().take().expect("transform ran");
    assert_eq!(unwrap_stream(&mut sibling, 500).await, StreamItem::Value(1));
    assert_eq!(unwrap_stream(&mut sibling, 500).await, StreamItem::Value(2));
    assert!(unwrap_stream(&mut sibling, 500).await.is_error());
    Ok(())
}

#[tokio::test]
async fn original_error_is_preserved() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = railcast_test_utils::test_channel_with_errors::<i32>();
    let mut output = source.replay(ReplayPolicy::unbounded(), |shared| shared.subscribe());

    // Act
    tx.send(StreamItem::Error(RailcastError::user_error(
        std::io::Error::other("disk on fire"),
    )))?;

    // Assert
    match unwrap_stream(&mut output, 500).await {
        StreamItem::Error(RailcastError::UserError(inner)) => {
            assert_eq!(inner.to_string(), "disk on fire");
        }
        other => panic!("unexpected item: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn transform_failure_ends_the_output() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<i32>();
    let mut output = source.publish(|shared| {
        shared.subscribe().map(|item| {
            item.and_then(|x| {
                if x == 2 {
                    StreamItem::Error(RailcastError::transform_failure(
                        None,
                        std::io::Error::other("two is not allowed"),
                    ))
                } else {
                    StreamItem::Value(x)
                }
            })
        })
    });

    // Act
    tx.send(1)?;
    tx.send(2)?;
    tx.send(3)?;

    // Assert
    assert_eq!(unwrap_stream(&mut output, 500).await, StreamItem::Value(1));
    assert!(matches!(
        unwrap_stream(&mut output, 500).await,
        StreamItem::Error(RailcastError::TransformFailure { rail: None, .. })
    ));
    assert_stream_ended(&mut output, 500).await;
    Ok(())
}

#[tokio::test]
async fn dropping_the_output_stops_the_upstream() -> anyhow::Result<()> {
    // Arrange
    let pulls = Arc::new(AtomicUsize::new(0));
    let counter = pulls.clone();
    let source = stream::unfold(0, move |n| {
        let counter = counter.clone();
        async move {
            sleep(Duration::from_millis(2)).await;
            counter.fetch_add(1, Ordering::SeqCst);
            Some((StreamItem::Value(n), n + 1))
        }
    });
    let mut output = source.replay(ReplayPolicy::max_size(1), |shared| shared.subscribe());

    // Act
    unwrap_stream(&mut output, 500).await;
    unwrap_stream(&mut output, 500).await;
    assert_eq!(output.connection_state(), ConnectionState::Connected);
    drop(output);
    sleep(Duration::from_millis(20)).await;
    let after_drop = pulls.load(Ordering::SeqCst);
    sleep(Duration::from_millis(30)).await;

    // Assert
    assert_eq!(pulls.load(Ordering::SeqCst), after_drop);
    Ok(())
}

#[tokio::test]
async fn publish_stops_once_every_subscription_detached() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<i32>();
    let stash: Arc<Mutex<Option<SharedSource<i32>>>> = Arc::new(Mutex::new(None));
    let keep = stash.clone();
    let mut output = source.publish(move |shared| {
        *keep.lock().unwrap() = Some(shared.clone());
        // Hand out two items, release the subscription, then stay open
        stream::unfold((shared.subscribe(), 0), |(mut sub, taken)| async move {
            if taken == 2 {
                None
            } else {
                sub.next().await.map(|item| (item, (sub, taken + 1)))
            }
        })
        .chain(stream::pending())
    });

    // Act
    tx.send(1)?;
    tx.send(2)?;
    assert_eq!(unwrap_stream(&mut output, 500).await, StreamItem::Value(1));
    assert_eq!(unwrap_stream(&mut output, 500).await, StreamItem::Value(2));
    // The next poll ends the inner stream and releases the subscription
    assert_no_element_emitted(&mut output, 20).await;
    tx.send(3)?;
    sleep(Duration::from_millis(50)).await;

    // Assert
    let shared = stash.lock().unwrap().clone().expect("transform ran");
    assert!(shared.is_terminated());
    let mut late = shared.subscribe();
    assert!(matches!(
        unwrap_stream(&mut late, 500).await,
        StreamItem::Error(RailcastError::Cancelled { .. })
    ));
    assert_eq!(output.connection_state(), ConnectionState::Terminated);
    Ok(())
}

#[tokio::test]
async fn multicast_uses_the_supplied_subject() -> anyhow::Result<()> {
    // Arrange
    let source = stream::iter((1..=5).map(StreamItem::Value));

    // Act
    let replayed: Vec<i32> = source
        .multicast(
            || Subject::replay(ReplayPolicy::max_size(3)),
            |shared| {
                // Subscribe only after the upstream has finished
                stream::once(async move {
                    while !shared.is_terminated() {
                        tokio::task::yield_now().await;
                    }
                    shared.subscribe()
                })
                .flatten()
            },
        )
        .map(StreamItem::unwrap)
        .collect()
        .await;

    // Assert
    assert_eq!(replayed, vec![3, 4, 5]);
    Ok(())
}
