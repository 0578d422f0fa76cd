// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stream wrapper that injects a failure for testing error propagation.

use futures::Stream;
use railcast_core::{RailcastError, StreamItem};
use std::pin::Pin;
use std::task::{Context, Poll};

/// Wraps plain values in `StreamItem::Value` and emits a `StreamItem::Error` at a fixed
/// position, after which it ends (errors are terminal).
///
/// ```rust
/// use railcast_core::StreamItem;
/// use railcast_test_utils::ErrorInjectingStream;
/// use futures::{stream, StreamExt};
///
/// # async fn example() {
/// let items: Vec<_> = ErrorInjectingStream::new(stream::iter(vec![1, 2, 3]), 1)
///     .collect()
///     .await;
///
/// assert!(matches!(items[0], StreamItem::Value(1)));
/// assert!(items[1].is_error());
/// assert_eq!(items.len(), 2);
/// # }
/// ```
pub struct ErrorInjectingStream<S> {
    inner: S,
    inject_error_at: usize,
    error: Option<RailcastError>,
    emitted: usize,
}

impl<S> ErrorInjectingStream<S> {
    /// Injects a generic stream error at 0-indexed position `inject_error_at`.
    pub fn new(inner: S, inject_error_at: usize) -> Self {
        Self::with_error(
            inner,
            inject_error_at,
            RailcastError::stream_error("Injected test error"),
        )
    }

    /// Injects `error` at 0-indexed position `inject_error_at`.
    pub fn with_error(inner: S, inject_error_at: usize, error: RailcastError) -> Self {
        Self {
            inner,
            inject_error_at,
            error: Some(error),
            emitted: 0,
        }
    }
}

impl<S> Stream for ErrorInjectingStream<S>
where
    S: Stream + Unpin,
{
    type Item = StreamItem<S::Item>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.emitted == self.inject_error_at {
            self.emitted += 1;
            return Poll::Ready(self.error.take().map(StreamItem::Error));
        }
        if self.emitted > self.inject_error_at {
            return Poll::Ready(None);
        }

        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(item)) => {
                self.emitted += 1;
                Poll::Ready(Some(StreamItem::Value(item)))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}
