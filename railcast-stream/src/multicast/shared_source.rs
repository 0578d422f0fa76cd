// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use railcast_core::{Subject, SubjectKind, SubjectStream};

/// The shared side of a multicast pipeline, handed to its transform.
///
/// Cloning is cheap; every clone subscribes to the same subject.
pub struct SharedSource<T: Clone + Send + Sync + 'static> {
    subject: Subject<T>,
}

impl<T: Clone + Send + Sync + 'static> SharedSource<T> {
    pub(crate) const fn new(subject: Subject<T>) -> Self {
        Self { subject }
    }

    /// Attaches a new subscription.
    ///
    /// With a replay subject the subscription starts with the retained history.
    #[must_use]
    pub fn subscribe(&self) -> SubjectStream<T> {
        self.subject.attach()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subject.subscriber_count()
    }

    /// Whether the underlying subject publishes or replays.
    #[must_use]
    pub const fn kind(&self) -> SubjectKind {
        self.subject.kind()
    }

    /// Returns `true` once the upstream completed or failed.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.subject.is_terminated()
    }
}

impl<T: Clone + Send + Sync + 'static> Clone for SharedSource<T> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> core::fmt::Debug for SharedSource<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedSource")
            .field("subject", &self.subject)
            .finish()
    }
}
