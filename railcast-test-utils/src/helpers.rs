// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::{Stream, StreamExt};
use railcast_core::{RailcastError, StreamItem};
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Waits for the next item, panicking if the stream ends or nothing arrives in time.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> StreamItem<T>
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(item)) => item,
        Ok(None) => panic!("Expected an item but the stream ended"),
        Err(_) => panic!("Timed out after {timeout_ms}ms waiting for an item"),
    }
}

/// Extracts the value of an item, panicking on errors or a missing item.
pub fn unwrap_value<T>(item: Option<StreamItem<T>>) -> T {
    match item {
        Some(StreamItem::Value(value)) => value,
        Some(StreamItem::Error(error)) => panic!("Expected a value, got error: {error}"),
        None => panic!("Expected a value, got nothing"),
    }
}

/// Asserts that the stream ends within `timeout_ms`.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(_)) => panic!("Expected the stream to end, but it emitted an item"),
        Err(_) => panic!("Timed out after {timeout_ms}ms waiting for the stream to end"),
    }
}

/// Asserts that nothing is emitted for `timeout_ms`.
pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!("Unexpected emission, expected no output.");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}

/// Drains the stream, returning every value or the first error.
///
/// # Errors
///
/// Returns the first `StreamItem::Error` the stream produced.
pub async fn collect_values<S, T>(stream: S) -> Result<Vec<T>, RailcastError>
where
    S: Stream<Item = StreamItem<T>>,
{
    let mut values = Vec::new();
    let mut stream = Box::pin(stream);
    while let Some(item) = stream.next().await {
        let value: Result<T, RailcastError> = item.into();
        values.push(value?);
    }
    Ok(values)
}
