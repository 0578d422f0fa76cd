// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::RailcastError;

/// Errors specific to subject lifecycle operations.
///
/// These are returned to the producer side of a [`Subject`](crate::Subject); consumers
/// never see them, they observe the terminal signal instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
    /// The subject already reached its terminal state and accepts nothing further.
    #[error("Subject is closed")]
    Closed,
}

impl From<SubjectError> for RailcastError {
    fn from(error: SubjectError) -> Self {
        RailcastError::stream_error(error.to_string())
    }
}
