// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sharing and fanning out `StreamItem` streams.
//!
//! # Multicast
//!
//! [`MulticastExt::publish`] and [`MulticastExt::replay`] wire a cold upstream into a
//! [`Subject`](railcast_core::Subject) and hand a [`SharedSource`] to a transform. The
//! transform may subscribe as many times as it likes; the upstream is still collected by one
//! loop, started when the output is first polled and stopped when the output is dropped.
//! [`MulticastConnector`] keeps the recipe around so the whole pipeline can be re-run.
//!
//! # Parallel rails
//!
//! [`ParallelExt::parallel`] splits a stream round-robin into a [`RailSet`]: item `i` goes to
//! rail `i % N`. Each rail is driven on the [`Dispatcher`] chosen for it, per-rail operators
//! (`map`, `filter`, `transform`) run there, and [`RailSet::sequential`] merges the rails back
//! with a fair round-robin [`Sequential`] merger.
//!
//! ```
//! use railcast_stream::{ParallelConfig, ParallelExt, TokioDispatcher};
//! use railcast_core::StreamItem;
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = stream::iter((1..=10).map(StreamItem::Value));
//!
//! let mut merged: Vec<i32> = source
//!     .parallel(ParallelConfig::new(2), |_| TokioDispatcher::current())
//!     .unwrap()
//!     .map(|x| async move { Ok::<_, std::io::Error>(x * 10) })
//!     .sequential()
//!     .map(|item| item.unwrap())
//!     .collect()
//!     .await;
//!
//! merged.sort_unstable();
//! assert_eq!(merged, (1..=10).map(|x| x * 10).collect::<Vec<_>>());
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

#[cfg(feature = "runtime-tokio")]
pub mod multicast;
pub mod parallel;
pub mod prelude;

#[cfg(feature = "runtime-tokio")]
pub use multicast::{ConnectionState, Multicast, MulticastConnector, MulticastExt, SharedSource};
#[cfg(feature = "runtime-tokio")]
pub use parallel::TokioDispatcher;
pub use parallel::{
    DispatchedRail, Dispatcher, FnDispatcher, ParallelConfig, ParallelExt, Rail, RailSet,
    Sequential, DEFAULT_PREFETCH,
};
