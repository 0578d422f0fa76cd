// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Fan-out of one stream over N concurrently driven rails.
//!
//! ## Pipeline
//!
//! ```text
//!               ┌─ rail 0 ─ map/filter/transform ─┐
//! upstream ─ distributor ─ rail 1 ─ ... ────────────── Sequential ─ output
//!               └─ rail N-1 ─ ... ────────────────┘
//! ```
//!
//! - **Distribution**: round-robin, item `i` goes to rail `i % N`. Each rail has a bounded
//!   queue of `prefetch` items; the distributor suspends on a full rail.
//! - **Execution**: a rail's operator chain is driven by a task dispatched on the
//!   [`Dispatcher`] chosen for that rail, starting when the rail is first consumed.
//! - **Order**: preserved within a rail, not across rails.
//! - **Errors**: an upstream error is delivered to every rail. An operator error ends only
//!   its own rail; [`Sequential`] then stops every other rail.
//! - **Dead rails**: if a rail is dropped while the distributor still has an item for it,
//!   the upstream is stopped and every remaining rail ends with
//!   [`RailcastError::DeadRail`](railcast_core::RailcastError::DeadRail). No item is ever
//!   silently discarded.
//! - **Cancellation**: dropping the merged output drops every rail, which stops the
//!   distributor and the upstream.

mod config;
mod dispatcher;
mod distributor;
mod rail;
mod rail_set;
mod sequential;

pub use config::{ParallelConfig, DEFAULT_PREFETCH};
#[cfg(feature = "runtime-tokio")]
pub use dispatcher::TokioDispatcher;
pub use dispatcher::{Dispatcher, FnDispatcher};
pub use rail::{DispatchedRail, Rail};
pub use rail_set::{ParallelExt, RailSet};
pub use sequential::Sequential;
