// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for railcast streams.
//!
//! Every failure travels through a stream as [`StreamItem::Error`](crate::StreamItem::Error)
//! carrying a [`RailcastError`]. The error is a terminal signal: operators forward it and then
//! end the stream. Errors are cheap to clone and cloning never loses the original cause, so
//! every consumer of a multicast hub observes the same source error.
//!
//! # Examples
//!
//! ```
//! use railcast_core::{ErrorKind, RailcastError, Result};
//!
//! fn process_data() -> Result<()> {
//!     Err(RailcastError::stream_error("Stream not ready"))
//! }
//!
//! assert_eq!(process_data().unwrap_err().kind(), ErrorKind::Upstream);
//! ```

use std::error::Error as StdError;
use std::sync::Arc;

/// Shared, cloneable handle to a user-supplied error.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Root error type for all railcast operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RailcastError {
    /// Stream processing encountered an error
    ///
    /// This is a general error for stream operations that don't fit
    /// other specific categories.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong during stream processing
        context: String,
    },

    /// Custom error from user code, forwarded unchanged.
    #[error("User error: {0}")]
    UserError(#[source] SharedError),

    /// A user-supplied mapping, filtering or transform function failed.
    #[error("Transform failed{}: {source}", rail_suffix(.rail))]
    TransformFailure {
        /// Rail the failure happened on, if it happened inside the parallel rail engine
        rail: Option<usize>,
        /// The error raised by the user function
        #[source]
        source: SharedError,
    },

    /// The pipeline (or part of it) was cancelled before it could complete.
    #[error("Cancelled: {context}")]
    Cancelled {
        /// What was cancelled and why
        context: String,
    },

    /// A rail consumer disappeared while the distributor still had items routed to it.
    #[error("Rail {rail} was abandoned while items were still routed to it")]
    DeadRail {
        /// Index of the abandoned rail
        rail: usize,
    },
}

fn rail_suffix(rail: &Option<usize>) -> String {
    rail.map(|rail| format!(" on rail {rail}")).unwrap_or_default()
}

/// Coarse classification of a [`RailcastError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The source stream failed.
    Upstream,
    /// A user-supplied function raised.
    Transform,
    /// A consumer or the whole pipeline was cancelled.
    Cancellation,
    /// The rail engine hit a condition it cannot route around.
    PolicyViolation,
}

impl RailcastError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl StdError + Send + Sync + 'static) -> Self {
        Self::UserError(Arc::new(error))
    }

    /// Wrap the error of a user transform function, optionally tagged with its rail.
    pub fn transform_failure(
        rail: Option<usize>,
        error: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::TransformFailure {
            rail,
            source: Arc::new(error),
        }
    }

    /// Create a cancellation signal with the given context
    pub fn cancelled(context: impl Into<String>) -> Self {
        Self::Cancelled {
            context: context.into(),
        }
    }

    /// Create a dead-rail policy violation for the given rail
    #[must_use]
    pub const fn dead_rail(rail: usize) -> Self {
        Self::DeadRail { rail }
    }

    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TransformFailure { .. } => ErrorKind::Transform,
            Self::Cancelled { .. } => ErrorKind::Cancellation,
            Self::DeadRail { .. } => ErrorKind::PolicyViolation,
            Self::StreamProcessingError { .. } | Self::UserError(_) => ErrorKind::Upstream,
        }
    }

    /// Returns `true` if this error is a cancellation signal rather than a failure.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Check if this error indicates a permanent failure
    ///
    /// Nothing in railcast is retried automatically; every variant except
    /// cancellation describes a failure that retrying the same pipeline would not fix.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        !self.is_cancellation()
    }
}

/// Specialized Result type for railcast operations
pub type Result<T> = std::result::Result<T, RailcastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn clone_preserves_user_error_source() {
        let error = RailcastError::user_error(Boom);
        let cloned = error.clone();

        let source = StdError::source(&cloned).expect("source should be preserved");
        assert_eq!(source.to_string(), "boom");
        match cloned {
            RailcastError::UserError(inner) => assert!(inner.downcast_ref::<Boom>().is_some()),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn transform_failure_mentions_rail() {
        let error = RailcastError::transform_failure(Some(3), Boom);
        assert_eq!(error.to_string(), "Transform failed on rail 3: boom");
        assert_eq!(error.kind(), ErrorKind::Transform);

        let error = RailcastError::transform_failure(None, Boom);
        assert_eq!(error.to_string(), "Transform failed: boom");
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(RailcastError::dead_rail(1).kind(), ErrorKind::PolicyViolation);
        assert_eq!(RailcastError::cancelled("x").kind(), ErrorKind::Cancellation);
        assert!(!RailcastError::cancelled("x").is_permanent());
        assert!(RailcastError::stream_error("x").is_permanent());
    }
}
