// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::SharedSource;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use railcast_core::{
    CancellationToken, RailcastError, RailcastTask, ReplayPolicy, StreamItem, Subject, SubjectKind,
};
use std::sync::Arc;

/// Where a [`Multicast`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Created but never polled; the upstream is untouched.
    NotConnected,
    /// The transform has been invoked; the collection loop is being spawned.
    Connecting,
    /// The collection loop is running.
    Connected,
    /// The collection loop has finished or was cancelled.
    Terminated,
}

type Launch<U> = Box<dyn FnOnce(Arc<Mutex<ConnectionState>>) -> Running<U> + Send>;

struct Running<U> {
    output: BoxStream<'static, StreamItem<U>>,
    _collector: RailcastTask,
    state: Arc<Mutex<ConnectionState>>,
}

impl<U> Drop for Running<U> {
    fn drop(&mut self) {
        // The collector may be cancelled before it was ever polled.
        *self.state.lock() = ConnectionState::Terminated;
    }
}

/// Output of a multicast pipeline.
///
/// Nothing happens until the first poll. Dropping it (or reaching the end of the
/// transform's output) cancels the upstream collection.
pub struct Multicast<U> {
    state: Arc<Mutex<ConnectionState>>,
    launch: Option<Launch<U>>,
    running: Option<Running<U>>,
}

impl<U: Send + 'static> Multicast<U> {
    fn new<T, F, Out>(
        source: BoxStream<'static, StreamItem<T>>,
        subject: impl FnOnce() -> Subject<T> + Send + 'static,
        transform: F,
    ) -> Self
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce(SharedSource<T>) -> Out + Send + 'static,
        Out: Stream<Item = StreamItem<U>> + Send + 'static,
    {
        let launch: Launch<U> = Box::new(move |state| {
            let subject = subject();
            *state.lock() = ConnectionState::Connecting;

            // Subscriptions made synchronously by the transform are in place before the
            // first upstream item is offered.
            let output = transform(SharedSource::new(subject.clone())).boxed();
            let collector = {
                let state = state.clone();
                RailcastTask::spawn(move |cancel| collect(source, subject, state, cancel))
            };

            Running {
                output,
                _collector: collector,
                state,
            }
        });

        Self {
            state: Arc::new(Mutex::new(ConnectionState::NotConnected)),
            launch: Some(launch),
            running: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        *self.state.lock()
    }
}

impl<U> Stream for Multicast<U> {
    type Item = StreamItem<U>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        if let Some(launch) = this.launch.take() {
            this.running = Some(launch(this.state.clone()));
        }

        let Some(running) = this.running.as_mut() else {
            return Poll::Ready(None);
        };

        match running.output.poll_next_unpin(cx) {
            Poll::Ready(Some(StreamItem::Value(value))) => {
                Poll::Ready(Some(StreamItem::Value(value)))
            }
            Poll::Ready(Some(StreamItem::Error(error))) => {
                this.running = None;
                Poll::Ready(Some(StreamItem::Error(error)))
            }
            Poll::Ready(None) => {
                this.running = None;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<U> core::fmt::Debug for Multicast<U> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Multicast")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

struct MarkTerminated(Arc<Mutex<ConnectionState>>);

impl Drop for MarkTerminated {
    fn drop(&mut self) {
        *self.0.lock() = ConnectionState::Terminated;
    }
}

async fn collect<T>(
    mut source: BoxStream<'static, StreamItem<T>>,
    subject: Subject<T>,
    state: Arc<Mutex<ConnectionState>>,
    cancel: CancellationToken,
) where
    T: Clone + Send + Sync + 'static,
{
    let _terminated = MarkTerminated(state.clone());
    *state.lock() = ConnectionState::Connected;
    debug!("multicast connected ({:?})", subject.kind());

    let mut had_subscribers = false;

    while let Some(item) = source.next().await {
        if cancel.is_cancelled() {
            return;
        }

        match item {
            StreamItem::Value(value) => {
                if subject.offer(value).is_err() {
                    return;
                }

                if subject.kind() == SubjectKind::Publish {
                    if subject.subscriber_count() > 0 {
                        had_subscribers = true;
                    } else if had_subscribers {
                        debug!("every publish subscriber detached, stopping upstream");
                        let _ = subject.fail(RailcastError::cancelled(
                            "every publish subscriber detached",
                        ));
                        return;
                    }
                }
            }
            StreamItem::Error(error) => {
                debug!("multicast upstream failed: {error}");
                let _ = subject.fail(error);
                return;
            }
        }
    }

    debug!("multicast upstream completed");
    let _ = subject.complete();
}

type SourceFactory<T> = dyn Fn() -> BoxStream<'static, StreamItem<T>> + Send + Sync;
type SubjectFactory<T> = dyn Fn() -> Subject<T> + Send + Sync;
type Transform<T, U> = dyn Fn(SharedSource<T>) -> BoxStream<'static, StreamItem<U>> + Send + Sync;

/// A re-runnable multicast pipeline.
///
/// Every call to [`subscribe`](Self::subscribe) is an independent consumption: a fresh
/// subject, a fresh upstream collection and a fresh transform invocation, all deferred until
/// the returned [`Multicast`] is first polled.
pub struct MulticastConnector<T, U>
where
    T: Clone + Send + Sync + 'static,
{
    source: Arc<SourceFactory<T>>,
    subject: Arc<SubjectFactory<T>>,
    transform: Arc<Transform<T, U>>,
}

impl<T, U> MulticastConnector<T, U>
where
    T: Clone + Send + Sync + 'static,
    U: Send + 'static,
{
    /// Builds a connector from an upstream factory, a subject factory and a transform.
    pub fn new<Src, S, Sub, F, Out>(source: Src, subject: Sub, transform: F) -> Self
    where
        Src: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = StreamItem<T>> + Send + 'static,
        Sub: Fn() -> Subject<T> + Send + Sync + 'static,
        F: Fn(SharedSource<T>) -> Out + Send + Sync + 'static,
        Out: Stream<Item = StreamItem<U>> + Send + 'static,
    {
        Self {
            source: Arc::new(move || source().boxed()),
            subject: Arc::new(subject),
            transform: Arc::new(move |shared| transform(shared).boxed()),
        }
    }

    /// A connector backed by a publish subject.
    pub fn publish<Src, S, F, Out>(source: Src, transform: F) -> Self
    where
        Src: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = StreamItem<T>> + Send + 'static,
        F: Fn(SharedSource<T>) -> Out + Send + Sync + 'static,
        Out: Stream<Item = StreamItem<U>> + Send + 'static,
    {
        Self::new(source, Subject::publish, transform)
    }

    /// A connector backed by a replay subject retaining history under `policy`.
    pub fn replay<Src, S, F, Out>(source: Src, policy: ReplayPolicy, transform: F) -> Self
    where
        Src: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = StreamItem<T>> + Send + 'static,
        F: Fn(SharedSource<T>) -> Out + Send + Sync + 'static,
        Out: Stream<Item = StreamItem<U>> + Send + 'static,
    {
        Self::new(source, move || Subject::replay(policy.clone()), transform)
    }

    /// Starts a new, independent consumption of the pipeline.
    #[must_use]
    pub fn subscribe(&self) -> Multicast<U> {
        let source = self.source.clone();
        let subject = self.subject.clone();
        let transform = self.transform.clone();

        Multicast::new(source(), move || subject(), move |shared| transform(shared))
    }
}

impl<T, U> Clone for MulticastConnector<T, U>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            subject: self.subject.clone(),
            transform: self.transform.clone(),
        }
    }
}

impl<T, U> core::fmt::Debug for MulticastConnector<T, U>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MulticastConnector").finish_non_exhaustive()
    }
}

/// Extension trait for sharing a stream through a transform.
///
/// See the [module-level documentation](crate::multicast) for the lifecycle.
pub trait MulticastExt<T>: Stream<Item = StreamItem<T>> + Sized
where
    T: Clone + Send + Sync + 'static,
{
    /// Shares this stream through the subject built by `subject` and feeds it to `transform`.
    fn multicast<Sub, F, Out, U>(self, subject: Sub, transform: F) -> Multicast<U>
    where
        Sub: FnOnce() -> Subject<T> + Send + 'static,
        F: FnOnce(SharedSource<T>) -> Out + Send + 'static,
        Out: Stream<Item = StreamItem<U>> + Send + 'static,
        U: Send + 'static;

    /// Shares this stream without history: subscriptions only see later items.
    fn publish<F, Out, U>(self, transform: F) -> Multicast<U>
    where
        F: FnOnce(SharedSource<T>) -> Out + Send + 'static,
        Out: Stream<Item = StreamItem<U>> + Send + 'static,
        U: Send + 'static,
    {
        self.multicast(Subject::publish, transform)
    }

    /// Shares this stream, replaying history retained under `policy` to late subscriptions.
    fn replay<F, Out, U>(self, policy: ReplayPolicy, transform: F) -> Multicast<U>
    where
        F: FnOnce(SharedSource<T>) -> Out + Send + 'static,
        Out: Stream<Item = StreamItem<U>> + Send + 'static,
        U: Send + 'static,
    {
        self.multicast(move || Subject::replay(policy), transform)
    }
}

impl<S, T> MulticastExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn multicast<Sub, F, Out, U>(self, subject: Sub, transform: F) -> Multicast<U>
    where
        Sub: FnOnce() -> Subject<T> + Send + 'static,
        F: FnOnce(SharedSource<T>) -> Out + Send + 'static,
        Out: Stream<Item = StreamItem<U>> + Send + 'static,
        U: Send + 'static,
    {
        Multicast::new(self.boxed(), subject, transform)
    }
}
