// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{stream, StreamExt};
use railcast_core::{ErrorKind, RailcastError, StreamItem};
use railcast_stream::{ParallelConfig, ParallelExt, TokioDispatcher};
use railcast_test_utils::{assert_stream_ended, unwrap_stream, ErrorInjectingStream};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn upstream_error_is_delivered_to_every_rail() {
    // Arrange
    let source = ErrorInjectingStream::new(stream::iter(0..10), 4);
    let rails = source
        .parallel(ParallelConfig::new(2), |_| TokioDispatcher::current())
        .unwrap()
        .into_rails();

    // Act
    let collected = futures::future::join_all(
        rails
            .into_iter()
            .map(|rail| rail.into_stream().collect::<Vec<_>>()),
    )
    .await;

    // Assert
    assert_eq!(
        collected[0][..2],
        [StreamItem::Value(0), StreamItem::Value(2)]
    );
    assert_eq!(
        collected[1][..2],
        [StreamItem::Value(1), StreamItem::Value(3)]
    );
    for rail in &collected {
        assert_eq!(rail.len(), 3);
        assert_eq!(
            rail[2].clone().err().map(|e| e.kind()),
            Some(ErrorKind::Upstream)
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn map_error_ends_the_merged_stream() {
    // Arrange
    let mut merged = stream::iter((0..100).map(StreamItem::Value))
        .parallel(ParallelConfig::new(2), |_| TokioDispatcher::current())
        .unwrap()
        .map(|x: i32| async move {
            if x == 7 {
                Err(std::io::Error::other("seven"))
            } else {
                Ok(x)
            }
        })
        .sequential();

    // Act
    let mut values = Vec::new();
    let error = loop {
        match unwrap_stream(&mut merged, 500).await {
            StreamItem::Value(value) => values.push(value),
            StreamItem::Error(error) => break error,
        }
    };

    // Assert - 7 sits at position 7, so on rail 1
    assert!(matches!(
        error,
        RailcastError::TransformFailure { rail: Some(1), .. }
    ));
    assert!(values.iter().all(|&v| v != 7));
    assert_stream_ended(&mut merged, 500).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropped_rail_fails_the_remaining_rails() {
    // Arrange
    let mut rails = stream::iter((0..10).map(StreamItem::Value))
        .parallel(ParallelConfig::new(2), |_| TokioDispatcher::current())
        .unwrap()
        .into_rails();
    drop(rails.pop());
    let mut survivor = rails.remove(0).into_stream();

    // Act
    let first = unwrap_stream(&mut survivor, 500).await;
    let second = unwrap_stream(&mut survivor, 500).await;

    // Assert
    assert_eq!(first, StreamItem::Value(0));
    match second {
        StreamItem::Error(error) => {
            assert!(matches!(error, RailcastError::DeadRail { rail: 1 }));
            assert_eq!(error.kind(), ErrorKind::PolicyViolation);
        }
        StreamItem::Value(value) => panic!("item {value} delivered past a dead rail"),
    }
    assert_stream_ended(&mut survivor, 500).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn transform_stream_error_ends_only_after_prior_outputs() {
    // Arrange
    let merged = stream::iter((0..4).map(StreamItem::Value))
        .parallel(ParallelConfig::new(1), |_| TokioDispatcher::current())
        .unwrap()
        .transform(|x: i32| {
            if x == 2 {
                stream::iter(vec![
                    StreamItem::Value(x),
                    StreamItem::Error(RailcastError::stream_error("half way")),
                ])
            } else {
                stream::iter(vec![StreamItem::Value(x)])
            }
        })
        .sequential();

    // Act
    let items: Vec<StreamItem<i32>> = merged.collect().await;

    // Assert
    assert_eq!(items.len(), 4);
    assert_eq!(
        items[..3],
        [StreamItem::Value(0), StreamItem::Value(1), StreamItem::Value(2)]
    );
    assert!(items[3].is_error());
}
