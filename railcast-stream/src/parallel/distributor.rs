// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::Dispatcher;
use async_channel::{Receiver, Sender};
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use pin_project::pin_project;
use railcast_core::{RailcastError, RailcastTask, StreamItem};
use std::sync::Arc;

enum Launch {
    Pending(Box<dyn FnOnce() -> RailcastTask + Send>),
    Running { _task: RailcastTask },
    Starting,
}

/// Shared by every rail of one fan-out. The distributor task is cancelled when the last
/// rail lets go of it.
struct DistributorHandle {
    launch: Mutex<Launch>,
}

impl DistributorHandle {
    fn start(&self) {
        let mut launch = self.launch.lock();
        if let Launch::Pending(_) = &*launch {
            if let Launch::Pending(start) = core::mem::replace(&mut *launch, Launch::Starting) {
                *launch = Launch::Running { _task: start() };
            }
        }
    }
}

/// Receiving end of one rail. The first poll of any rail starts the distribution.
#[pin_project]
pub(crate) struct RailReceiver<T> {
    #[pin]
    rx: Receiver<StreamItem<T>>,
    distributor: Arc<DistributorHandle>,
}

impl<T> Stream for RailReceiver<T> {
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        this.distributor.start();
        this.rx.poll_next(cx)
    }
}

/// Splits `source` into `rails` bounded queues of `prefetch` items each. The distribution
/// loop runs on `dispatcher` once a rail is first polled.
pub(crate) fn distribute<T>(
    source: BoxStream<'static, StreamItem<T>>,
    rails: usize,
    prefetch: usize,
    dispatcher: Arc<dyn Dispatcher>,
) -> Vec<RailReceiver<T>>
where
    T: Send + 'static,
{
    let (senders, receivers): (Vec<_>, Vec<_>) =
        (0..rails).map(|_| async_channel::bounded(prefetch)).unzip();

    let start = move || {
        RailcastTask::spawn_with(
            move |_| run(source, senders),
            move |future| dispatcher.dispatch(Box::pin(future)),
        )
    };

    let handle = Arc::new(DistributorHandle {
        launch: Mutex::new(Launch::Pending(Box::new(start))),
    });

    receivers
        .into_iter()
        .map(|rx| RailReceiver {
            rx,
            distributor: handle.clone(),
        })
        .collect()
}

async fn run<T>(
    mut source: BoxStream<'static, StreamItem<T>>,
    senders: Vec<Sender<StreamItem<T>>>,
) {
    debug!("distributor started over {} rails", senders.len());
    let mut next = 0;

    while let Some(item) = source.next().await {
        match item {
            StreamItem::Value(value) => {
                let rail = next;
                next = (next + 1) % senders.len();

                if senders[rail].send(StreamItem::Value(value)).await.is_err() {
                    warn!("rail {rail} was dropped with items still assigned to it");
                    broadcast(&senders, &RailcastError::dead_rail(rail), Some(rail)).await;
                    return;
                }
            }
            StreamItem::Error(error) => {
                debug!("distributor upstream failed: {error}");
                broadcast(&senders, &error, None).await;
                return;
            }
        }
    }

    // Dropping the senders ends each rail once its queue is drained.
    debug!("distributor upstream completed");
}

async fn broadcast<T>(
    senders: &[Sender<StreamItem<T>>],
    error: &RailcastError,
    skip: Option<usize>,
) {
    for (rail, tx) in senders.iter().enumerate() {
        if Some(rail) != skip {
            let _ = tx.send(StreamItem::Error(error.clone())).await;
        }
    }
}
