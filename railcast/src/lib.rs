// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Railcast
//!
//! Two ways of reshaping an async stream of [`StreamItem`]s:
//!
//! - **Multicast**: collect a cold upstream once and share it among any number of
//!   subscriptions, either live only ([`publish`](MulticastExt::publish)) or with a bounded
//!   history for late subscribers ([`replay`](MulticastExt::replay)).
//! - **Parallel rails**: split a stream round-robin over N rails, process each rail on its
//!   own [`Dispatcher`], and merge the rails back with [`RailSet::sequential`].
//!
//! ## Quick Start
//!
//! ```rust
//! use railcast::prelude::*;
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = stream::iter((1..=6).map(StreamItem::Value));
//!
//! let mut doubled: Vec<i32> = source
//!     .replay(ReplayPolicy::max_size(2), |shared| shared.subscribe())
//!     .parallel(ParallelConfig::new(3), |_| TokioDispatcher::current())
//!     .unwrap()
//!     .map(|x| async move { Ok::<_, std::io::Error>(x * 2) })
//!     .sequential()
//!     .map(|item| item.unwrap())
//!     .collect()
//!     .await;
//!
//! doubled.sort_unstable();
//! assert_eq!(doubled, vec![2, 4, 6, 8, 10, 12]);
//! # }
//! ```

pub use railcast_core::{
    CancellationToken, Clock, ErrorKind, FnClock, RailcastError, RailcastTask, ReplayPolicy,
    Result, StreamItem, Subject, SubjectError, SubjectKind, SubjectStream, SystemClock,
};
#[cfg(feature = "runtime-tokio")]
pub use railcast_core::TokioClock;

#[cfg(feature = "runtime-tokio")]
pub use railcast_stream::{
    ConnectionState, Multicast, MulticastConnector, MulticastExt, SharedSource, TokioDispatcher,
};
pub use railcast_stream::{
    DispatchedRail, Dispatcher, FnDispatcher, ParallelConfig, ParallelExt, Rail, RailSet,
    Sequential, DEFAULT_PREFETCH,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use railcast_stream::prelude::*;
}
