// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::distributor::distribute;
use super::{DispatchedRail, Dispatcher, ParallelConfig, Rail, Sequential};
use core::future::Future;
use futures::{Stream, StreamExt};
use railcast_core::{Result, StreamItem};
use std::error::Error;
use std::sync::Arc;

/// The rails of one parallel fan-out, in index order.
///
/// Operators applied here are applied to every rail independently; rails share no state
/// beyond the operator itself.
pub struct RailSet<T> {
    rails: Vec<Rail<T>>,
}

impl<T: Send + 'static> RailSet<T> {
    /// Number of rails.
    #[must_use]
    pub fn parallelism(&self) -> usize {
        self.rails.len()
    }

    /// The individual rails, for consuming them separately.
    #[must_use]
    pub fn into_rails(self) -> Vec<Rail<T>> {
        self.rails
    }

    /// See [`Rail::map`].
    #[must_use]
    pub fn map<U, F, Fut, E>(self, f: F) -> RailSet<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<U, E>> + Send + 'static,
        E: Error + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.each(|rail| {
            let f = f.clone();
            rail.map(move |value| f(value))
        })
    }

    /// See [`Rail::filter`].
    #[must_use]
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        self.each(|rail| {
            let predicate = predicate.clone();
            rail.filter(move |value| predicate(value))
        })
    }

    /// See [`Rail::transform`].
    #[must_use]
    pub fn transform<U, F, S>(self, f: F) -> RailSet<U>
    where
        U: Send + 'static,
        F: Fn(T) -> S + Send + Sync + 'static,
        S: Stream<Item = StreamItem<U>> + Send + 'static,
    {
        let f = Arc::new(f);
        self.each(|rail| {
            let f = f.clone();
            rail.transform(move |value| f(value))
        })
    }

    /// Merges the rails back into one stream with a fair round-robin merger.
    ///
    /// Each rail is driven on its dispatcher; dropping the merged stream cancels all of
    /// them and the upstream.
    #[must_use]
    pub fn sequential(self) -> Sequential<DispatchedRail<T>> {
        Sequential::new(self.rails.into_iter().map(Rail::into_stream).collect())
    }

    fn each<U>(self, op: impl FnMut(Rail<T>) -> Rail<U>) -> RailSet<U> {
        RailSet {
            rails: self.rails.into_iter().map(op).collect(),
        }
    }
}

impl<T> core::fmt::Debug for RailSet<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RailSet")
            .field("rails", &self.rails)
            .finish()
    }
}

/// Extension trait fanning a stream out over parallel rails.
pub trait ParallelExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Splits this stream round-robin over `config` rails.
    ///
    /// `selector` is called once per rail index to pick the rail's dispatcher. The
    /// distribution loop itself runs on rail 0's dispatcher. Nothing is consumed until a
    /// rail is first polled.
    ///
    /// # Errors
    ///
    /// Returns [`RailcastError::StreamProcessingError`](railcast_core::RailcastError) when
    /// the parallelism is zero.
    fn parallel<C, Sel, D>(self, config: C, selector: Sel) -> Result<RailSet<T>>
    where
        C: Into<ParallelConfig>,
        Sel: FnMut(usize) -> D,
        D: Dispatcher;
}

impl<S, T> ParallelExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
{
    fn parallel<C, Sel, D>(self, config: C, mut selector: Sel) -> Result<RailSet<T>>
    where
        C: Into<ParallelConfig>,
        Sel: FnMut(usize) -> D,
        D: Dispatcher,
    {
        let config: ParallelConfig = config.into();
        let config = config.validate()?;
        let dispatchers: Vec<Arc<dyn Dispatcher>> = (0..config.parallelism())
            .map(|index| Arc::new(selector(index)) as Arc<dyn Dispatcher>)
            .collect();

        let receivers = distribute(
            self.boxed(),
            config.parallelism(),
            config.prefetch(),
            dispatchers[0].clone(),
        );

        let rails = receivers
            .into_iter()
            .zip(dispatchers)
            .enumerate()
            .map(|(index, (rx, dispatcher))| Rail::new(index, dispatcher, config.prefetch(), rx))
            .collect();

        Ok(RailSet { rails })
    }
}
