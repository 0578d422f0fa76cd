// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::pin::Pin;
use core::task::{Context, Poll};
use futures::{Stream, StreamExt};
use railcast_core::StreamItem;

/// Fair round-robin merge of several rails.
///
/// Each poll starts at the rail after the one that produced the previous item, so under
/// balanced load no rail waits more than one round. The stream ends when every rail has
/// ended. The first error is forwarded, every rail is dropped (cancelling it) and the
/// stream ends.
pub struct Sequential<S> {
    rails: Vec<Option<S>>,
    cursor: usize,
    done: bool,
}

impl<S> Sequential<S> {
    pub(crate) fn new(rails: Vec<S>) -> Self {
        Self {
            rails: rails.into_iter().map(Some).collect(),
            cursor: 0,
            done: false,
        }
    }

    /// Number of rails that have not ended yet.
    #[must_use]
    pub fn active_rails(&self) -> usize {
        self.rails.iter().filter(|rail| rail.is_some()).count()
    }
}

impl<S, T> Stream for Sequential<S>
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    type Item = StreamItem<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        if this.done {
            return Poll::Ready(None);
        }

        let count = this.rails.len();
        for offset in 0..count {
            let index = (this.cursor + offset) % count;
            let Some(rail) = this.rails[index].as_mut() else {
                continue;
            };

            match rail.poll_next_unpin(cx) {
                Poll::Ready(Some(StreamItem::Value(value))) => {
                    this.cursor = (index + 1) % count;
                    return Poll::Ready(Some(StreamItem::Value(value)));
                }
                Poll::Ready(Some(StreamItem::Error(error))) => {
                    debug!("rail {index} failed, cancelling the remaining rails");
                    this.rails.clear();
                    this.done = true;
                    return Poll::Ready(Some(StreamItem::Error(error)));
                }
                Poll::Ready(None) => this.rails[index] = None,
                Poll::Pending => {}
            }
        }

        if this.rails.iter().all(Option::is_none) {
            trace!("every rail completed");
            this.done = true;
            return Poll::Ready(None);
        }

        Poll::Pending
    }
}

impl<S> core::fmt::Debug for Sequential<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Sequential")
            .field("rails", &self.rails.len())
            .field("cursor", &self.cursor)
            .field("done", &self.done)
            .finish()
    }
}
