// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Lazily connected multicast pipelines.
//!
//! A multicast pipeline has three parts:
//!
//! 1. a cold **upstream** of `StreamItem<T>`,
//! 2. a [`Subject`](railcast_core::Subject) that broadcasts the upstream,
//! 3. a **transform** that receives a [`SharedSource`] and builds the output stream from any
//!    number of subscriptions to it.
//!
//! ## Lifecycle
//!
//! | Event | Effect |
//! |-------|--------|
//! | output created | nothing; the upstream is untouched |
//! | first poll of the output | transform invoked, then the collection loop is spawned |
//! | upstream item | offered to the subject |
//! | upstream error | subject fails; every subscription sees the original error |
//! | upstream end | subject completes; subscriptions drain and end |
//! | output dropped | collection loop cancelled, upstream dropped |
//!
//! A publish subject whose subscriptions have all gone away is failed with
//! [`RailcastError::Cancelled`](railcast_core::RailcastError::Cancelled) and the loop stops.
//!
//! ## Example
//!
//! ```
//! use railcast_stream::MulticastExt;
//! use railcast_core::StreamItem;
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = stream::iter((1..=3).map(StreamItem::Value));
//!
//! // Both subscriptions observe the same single collection of `source`
//! let zipped: Vec<_> = source
//!     .publish(|shared| {
//!         let left = shared.subscribe();
//!         let right = shared.subscribe();
//!         left.zip(right)
//!             .map(|(l, r)| l.and_then(|l| r.map(|r| l + r)))
//!     })
//!     .map(|item| item.unwrap())
//!     .collect()
//!     .await;
//!
//! assert_eq!(zipped, vec![2, 4, 6]);
//! # }
//! ```

mod connector;
mod shared_source;

pub use connector::{ConnectionState, Multicast, MulticastConnector, MulticastExt};
pub use shared_source::SharedSource;
