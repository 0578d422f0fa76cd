// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::future::join_all;
use futures::{stream, StreamExt};
use railcast_core::StreamItem;
use railcast_stream::{FnDispatcher, ParallelConfig, ParallelExt, RailSet, TokioDispatcher};
use railcast_test_utils::{collect_values, test_channel};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn numbers(range: std::ops::Range<usize>) -> impl futures::Stream<Item = StreamItem<usize>> {
    stream::iter(range.map(StreamItem::Value))
}

async fn collect_rails<T: Send + 'static>(set: RailSet<T>) -> Vec<Vec<T>> {
    join_all(
        set.into_rails()
            .into_iter()
            .map(|rail| collect_values(rail.into_stream())),
    )
    .await
    .into_iter()
    .map(|rail| rail.expect("rail failed"))
    .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn item_i_lands_on_rail_i_mod_n() {
    for parallelism in [1usize, 2, 8] {
        // Arrange
        let set = numbers(0..1000)
            .parallel(ParallelConfig::new(parallelism), |_| TokioDispatcher::current())
            .unwrap();
        assert_eq!(set.parallelism(), parallelism);

        // Act
        let rails = collect_rails(set).await;

        // Assert
        for (index, rail) in rails.iter().enumerate() {
            let expected: Vec<usize> = (0..1000).filter(|i| i % parallelism == index).collect();
            assert_eq!(rail, &expected, "rail {index} of {parallelism}");
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn two_rails_split_odd_and_even_positions() {
    // Arrange
    let source = stream::iter((1..=10).map(StreamItem::Value));

    // Act
    let merged: Vec<i32> = source
        .parallel(ParallelConfig::new(2), |_| TokioDispatcher::current())
        .unwrap()
        .sequential()
        .map(StreamItem::unwrap)
        .collect()
        .await;

    // Assert - a permutation whose per-rail subsequences keep their order
    let mut sorted = merged.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (1..=10).collect::<Vec<_>>());

    let odd: Vec<i32> = merged.iter().copied().filter(|x| x % 2 == 1).collect();
    let even: Vec<i32> = merged.iter().copied().filter(|x| x % 2 == 0).collect();
    assert_eq!(odd, vec![1, 3, 5, 7, 9]);
    assert_eq!(even, vec![2, 4, 6, 8, 10]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn map_filter_and_transform_apply_per_rail() {
    // Arrange
    let set = numbers(0..100)
        .parallel(ParallelConfig::new(4).with_prefetch(2), |_| {
            TokioDispatcher::current()
        })
        .unwrap()
        .map(|x| async move { Ok::<_, std::io::Error>(x * 2) })
        .filter(|x| x % 3 != 0)
        .transform(|x| stream::iter(vec![StreamItem::Value(x), StreamItem::Value(x + 1)]));

    // Act
    let mut merged: Vec<usize> = set.sequential().map(StreamItem::unwrap).collect().await;

    // Assert
    merged.sort_unstable();
    let mut expected: Vec<usize> = (0..100)
        .map(|x| x * 2)
        .filter(|x| x % 3 != 0)
        .flat_map(|x| [x, x + 1])
        .collect();
    expected.sort_unstable();
    assert_eq!(merged, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn each_rail_runs_on_its_own_dispatcher() {
    // Arrange
    let dispatched: Arc<Vec<AtomicUsize>> = Arc::new((0..3).map(|_| AtomicUsize::new(0)).collect());
    let handle = tokio::runtime::Handle::current();

    let set = numbers(0..30)
        .parallel(ParallelConfig::new(3), |index| {
            let dispatched = dispatched.clone();
            let handle = handle.clone();
            FnDispatcher::new(move |task| {
                dispatched[index].fetch_add(1, Ordering::SeqCst);
                handle.spawn(task);
            })
        })
        .unwrap();

    // Act
    let rails = collect_rails(set).await;

    // Assert - rail 0 also hosts the distributor
    assert_eq!(rails.iter().map(Vec::len).sum::<usize>(), 30);
    assert_eq!(dispatched[0].load(Ordering::SeqCst), 2);
    assert_eq!(dispatched[1].load(Ordering::SeqCst), 1);
    assert_eq!(dispatched[2].load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn zero_parallelism_is_rejected() {
    let result = numbers(0..3).parallel(0usize, |_| TokioDispatcher::current());

    assert!(result.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn nothing_is_consumed_until_a_rail_is_polled() {
    // Arrange
    let pulled = Arc::new(AtomicUsize::new(0));
    let counter = pulled.clone();
    let source = stream::iter(0..10).map(move |x| {
        counter.fetch_add(1, Ordering::SeqCst);
        StreamItem::Value(x)
    });

    // Act
    let set = source
        .parallel(ParallelConfig::new(2), |_| TokioDispatcher::current())
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Assert
    assert_eq!(pulled.load(Ordering::SeqCst), 0);
    drop(set);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropping_the_merged_stream_stops_the_upstream() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel::<usize>();
    let mut merged = source
        .parallel(ParallelConfig::new(2).with_prefetch(1), |_| {
            TokioDispatcher::current()
        })?
        .sequential();

    tx.send(0)?;
    assert_eq!(merged.next().await, Some(StreamItem::Value(0)));

    // Act
    drop(merged);
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Assert - the distributor dropped the source, closing the channel
    assert!(tx.send(1).is_err());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn delayed_rails_are_merged_without_starving_any_rail() {
    // Arrange - every item costs the same time on every rail
    let parallelism = 4;
    let merged = numbers(0..64)
        .parallel(ParallelConfig::new(parallelism), |_| {
            TokioDispatcher::current()
        })
        .unwrap()
        .map(|x| async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok::<_, std::io::Error>(x)
        })
        .sequential();

    // Act
    let order: Vec<usize> = merged.map(StreamItem::unwrap).collect().await;

    // Assert - no rail ever gets more than one round ahead of another
    let mut emitted = vec![0usize; parallelism];
    for value in &order {
        emitted[value % parallelism] += 1;
        let most = emitted.iter().max().copied().unwrap_or_default();
        let least = emitted.iter().min().copied().unwrap_or_default();
        assert!(most - least <= 2, "unfair merge order: {order:?}");
    }

    let mut sorted = order.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..64).collect::<Vec<_>>());
}
