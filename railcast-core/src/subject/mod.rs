// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Single-producer, multi-consumer broadcast hub.
//!
//! A [`Subject`] broadcasts each offered value to every attached consumer. It comes in two
//! flavours:
//!
//! - **Publish** ([`Subject::publish`]): no history. A consumer only sees values offered
//!   after it attached.
//! - **Replay** ([`Subject::replay`]): keeps a history bounded by a [`ReplayPolicy`] and
//!   hands it to every newly attached consumer before the live values.
//!
//! ## Characteristics
//!
//! - **Ordered**: offers are serialized behind one lock; every consumer observes the same
//!   total order.
//! - **Unbounded per consumer**: each consumer owns an unbounded queue, so a slow consumer
//!   never suspends the producer. Its backlog is not bounded by the replay policy.
//! - **Terminal is permanent**: after [`complete`](Subject::complete) or
//!   [`fail`](Subject::fail), offers are rejected and late consumers receive the retained
//!   history followed by the terminal signal.
//! - **Cheap to clone**: all clones share the same state.
//!
//! ## Example
//!
//! ```
//! use railcast_core::{ReplayPolicy, StreamItem, Subject};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let subject = Subject::<i32>::replay(ReplayPolicy::max_size(2));
//!
//! for value in 1..=3 {
//!     subject.offer(value).unwrap();
//! }
//! subject.complete().unwrap();
//!
//! let late: Vec<_> = subject.attach().collect().await;
//! assert_eq!(late, vec![StreamItem::Value(2), StreamItem::Value(3)]);
//! # }
//! ```

mod history;
mod implementation;

pub use implementation::{Subject, SubjectKind, SubjectStream};
