// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core building blocks for railcast.
//!
//! - [`StreamItem`] and [`RailcastError`]: the value/terminal-failure model every stream carries
//! - [`Subject`]: a single-producer, multi-consumer hub with publish or replay semantics
//! - [`ReplayPolicy`] and [`Clock`]: how much history a late consumer observes
//! - [`RailcastTask`] and [`CancellationToken`]: owned background work that stops on drop

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod cancellation_token;
pub mod clock;
pub mod railcast_error;
pub mod railcast_task;
pub mod replay_policy;
pub mod stream_item;
pub mod subject;
pub mod subject_error;

pub use self::cancellation_token::CancellationToken;
#[cfg(feature = "runtime-tokio")]
pub use self::clock::TokioClock;
pub use self::clock::{Clock, FnClock, SystemClock};
pub use self::railcast_error::{ErrorKind, RailcastError, Result};
pub use self::railcast_task::RailcastTask;
pub use self::replay_policy::ReplayPolicy;
pub use self::stream_item::StreamItem;
pub use self::subject::{Subject, SubjectKind, SubjectStream};
pub use self::subject_error::SubjectError;
