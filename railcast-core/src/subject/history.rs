// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::ReplayPolicy;
use core::time::Duration;
use std::collections::VecDeque;

struct Entry<T> {
    offered_at: Duration,
    value: T,
}

/// Append-only replay buffer; eviction only ever removes from the front.
pub(crate) struct History<T> {
    entries: VecDeque<Entry<T>>,
    policy: ReplayPolicy,
}

impl<T: Clone> History<T> {
    pub(crate) fn new(policy: ReplayPolicy) -> Self {
        Self {
            entries: VecDeque::new(),
            policy,
        }
    }

    pub(crate) fn record(&mut self, value: T) {
        if self.policy.max_size_limit() == Some(0) {
            return;
        }

        let now = self.policy.now();
        self.entries.push_back(Entry {
            offered_at: now,
            value,
        });

        if let Some(max_size) = self.policy.max_size_limit() {
            let excess = self.entries.len().saturating_sub(max_size);
            self.entries.drain(..excess);
        }
        self.evict_stale(now);
    }

    /// Values a consumer attaching right now must receive, oldest first.
    pub(crate) fn snapshot(&mut self) -> Vec<T> {
        let now = self.policy.now();
        self.evict_stale(now);
        self.entries.iter().map(|entry| entry.value.clone()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn evict_stale(&mut self, now: Duration) {
        while self
            .entries
            .front()
            .is_some_and(|entry| !self.policy.is_fresh(entry.offered_at, now))
        {
            self.entries.pop_front();
        }
    }
}
