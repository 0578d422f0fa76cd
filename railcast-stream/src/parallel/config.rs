// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use railcast_core::{RailcastError, Result};

/// Default number of items buffered per rail.
pub const DEFAULT_PREFETCH: usize = 16;

/// Shape of a parallel fan-out.
///
/// Converts from a bare `usize` parallelism with the default prefetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelConfig {
    parallelism: usize,
    prefetch: usize,
}

impl ParallelConfig {
    /// `parallelism` rails, each buffering [`DEFAULT_PREFETCH`] items.
    #[must_use]
    pub const fn new(parallelism: usize) -> Self {
        Self {
            parallelism,
            prefetch: DEFAULT_PREFETCH,
        }
    }

    /// Sets the per-rail buffer size. Values below one are raised to one.
    #[must_use]
    pub const fn with_prefetch(mut self, prefetch: usize) -> Self {
        self.prefetch = if prefetch == 0 { 1 } else { prefetch };
        self
    }

    #[must_use]
    pub const fn parallelism(&self) -> usize {
        self.parallelism
    }

    #[must_use]
    pub const fn prefetch(&self) -> usize {
        self.prefetch
    }

    pub(crate) fn validate(self) -> Result<Self> {
        if self.parallelism == 0 {
            return Err(RailcastError::stream_error(
                "parallelism must be at least one rail",
            ));
        }
        Ok(self)
    }
}

impl From<usize> for ParallelConfig {
    fn from(parallelism: usize) -> Self {
        Self::new(parallelism)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_parallelism_is_rejected() {
        assert!(ParallelConfig::new(0).validate().is_err());
        assert!(ParallelConfig::from(3).validate().is_ok());
    }

    #[test]
    fn prefetch_never_drops_below_one() {
        let config = ParallelConfig::new(2).with_prefetch(0);

        assert_eq!(config.prefetch(), 1);
        assert_eq!(ParallelConfig::new(2).prefetch(), DEFAULT_PREFETCH);
    }
}
