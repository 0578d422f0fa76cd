// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension traits and the types most pipelines need.

#[cfg(feature = "runtime-tokio")]
pub use crate::multicast::{MulticastExt, SharedSource};
#[cfg(feature = "runtime-tokio")]
pub use crate::parallel::TokioDispatcher;
pub use crate::parallel::{Dispatcher, ParallelConfig, ParallelExt, RailSet};
pub use railcast_core::{RailcastError, ReplayPolicy, StreamItem, Subject};
