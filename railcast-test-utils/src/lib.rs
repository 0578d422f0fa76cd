// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for railcast.
//!
//! Production code builds pipelines out of consuming stream operators; tests need to push
//! values in imperatively. The channels here bridge the two: keep the sender, hand the
//! stream to the operator under test.
//!
//! - [`test_channel`] / [`test_channel_with_errors`]: push-driven sources
//! - [`CountingSource`]: a re-creatable source that counts how often it was collected
//! - [`ManualClock`]: a [`Clock`](railcast_core::Clock) advanced explicitly
//! - [`ErrorInjectingStream`]: injects a failure at a fixed position
//! - [`helpers`]: timeout-guarded assertions

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod counting_source;
pub mod error_injection;
pub mod helpers;
pub mod manual_clock;

use futures::{Stream, StreamExt};
use railcast_core::StreamItem;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub use counting_source::CountingSource;
pub use error_injection::ErrorInjectingStream;
pub use helpers::{
    assert_no_element_emitted, assert_stream_ended, collect_values, unwrap_stream, unwrap_value,
};
pub use manual_clock::ManualClock;

/// Creates a test channel that automatically wraps values in `StreamItem::Value`.
///
/// ```rust
/// use railcast_test_utils::test_channel;
/// use futures::StreamExt;
///
/// # async fn example() {
/// let (tx, mut stream) = test_channel();
/// tx.send(42).unwrap();
///
/// let item = stream.next().await.unwrap().unwrap();
/// assert_eq!(item, 42);
/// # }
/// ```
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Send + Sync + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamItem::Value);
    (tx, stream)
}

/// Creates a test channel that accepts `StreamItem<T>` for testing error propagation.
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send + Sync + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, UnboundedReceiverStream::new(rx))
}
