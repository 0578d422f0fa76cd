// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::{self, Stream, StreamExt};
use railcast_core::StreamItem;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A cold, re-creatable source that records how often it was actually collected.
///
/// Every call to [`stream`](Self::stream) produces a fresh stream over the same items. A
/// collection is counted the first time such a stream is polled, so creating a stream
/// without consuming it does not count.
///
/// ```rust
/// use railcast_test_utils::CountingSource;
/// use futures::StreamExt;
///
/// # async fn example() {
/// let source = CountingSource::new(vec![1, 2, 3]);
///
/// let unused = source.stream();
/// assert_eq!(source.collections(), 0);
///
/// let items: Vec<_> = source.stream().collect().await;
/// assert_eq!(items.len(), 3);
/// assert_eq!(source.collections(), 1);
/// # drop(unused);
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CountingSource<T> {
    items: Arc<Vec<T>>,
    collections: Arc<AtomicUsize>,
}

impl<T: Clone + Send + Sync + 'static> CountingSource<T> {
    /// A source replaying `items` on every collection.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(items),
            collections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A fresh, not yet started collection of the items.
    pub fn stream(&self) -> impl Stream<Item = StreamItem<T>> + Send + Sync + Unpin + 'static {
        let items = self.items.clone();
        let collections = self.collections.clone();

        Box::pin(
            stream::once(async move {
                collections.fetch_add(1, Ordering::SeqCst);
                stream::iter(items.iter().cloned().map(StreamItem::Value).collect::<Vec<_>>())
            })
            .flatten(),
        )
    }

    /// How many streams created by this source have been polled.
    #[must_use]
    pub fn collections(&self) -> usize {
        self.collections.load(Ordering::SeqCst)
    }
}
