// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::history::History;
use crate::{RailcastError, ReplayPolicy, StreamItem, SubjectError};
use async_channel::Sender;
use core::pin::Pin;
use futures::Stream;
use parking_lot::Mutex;
use std::sync::Arc;

/// Stream handed to each attached consumer.
pub type SubjectStream<T> = Pin<Box<dyn Stream<Item = StreamItem<T>> + Send + Sync + 'static>>;

/// Retention flavour of a [`Subject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectKind {
    /// No history; late consumers only see later values.
    Publish,
    /// Bounded history replayed to late consumers.
    Replay,
}

enum Terminal {
    Open,
    Completed,
    Failed(RailcastError),
}

struct SubjectState<T> {
    terminal: Terminal,
    senders: Vec<Sender<StreamItem<T>>>,
    history: Option<History<T>>,
}

impl<T> SubjectState<T> {
    fn ensure_open(&self) -> Result<(), SubjectError> {
        match self.terminal {
            Terminal::Open => Ok(()),
            Terminal::Completed | Terminal::Failed(_) => Err(SubjectError::Closed),
        }
    }
}

/// A multicast hub with publish or replay semantics.
///
/// See the [module documentation](crate::subject) for the delivery contract.
pub struct Subject<T: Clone + Send + Sync + 'static> {
    kind: SubjectKind,
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Subject<T> {
    /// Creates a subject without history.
    #[must_use]
    pub fn publish() -> Self {
        Self::with_history(SubjectKind::Publish, None)
    }

    /// Creates a subject that replays history retained under `policy`.
    #[must_use]
    pub fn replay(policy: ReplayPolicy) -> Self {
        Self::with_history(SubjectKind::Replay, Some(History::new(policy)))
    }

    fn with_history(kind: SubjectKind, history: Option<History<T>>) -> Self {
        Self {
            kind,
            state: Arc::new(Mutex::new(SubjectState {
                terminal: Terminal::Open,
                senders: Vec::new(),
                history,
            })),
        }
    }

    /// Retention flavour of this subject.
    #[must_use]
    pub const fn kind(&self) -> SubjectKind {
        self.kind
    }

    /// Attaches a new consumer.
    ///
    /// The returned stream yields, in order: the retained history applicable right now,
    /// every value offered afterwards, then the terminal signal. Attaching never fails;
    /// attaching to a terminated subject yields the history followed immediately by the
    /// terminal signal.
    pub fn attach(&self) -> SubjectStream<T> {
        let (tx, rx) = async_channel::unbounded();
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if let Some(history) = state.history.as_mut() {
            for value in history.snapshot() {
                // Unbounded and the receiver is still in scope: cannot fail.
                let _ = tx.try_send(StreamItem::Value(value));
            }
        }

        match &state.terminal {
            Terminal::Open => {
                state.senders.push(tx);
                trace!("consumer attached, {} active", state.senders.len());
            }
            Terminal::Completed => {}
            Terminal::Failed(error) => {
                let _ = tx.try_send(StreamItem::Error(error.clone()));
            }
        }

        Box::pin(rx)
    }

    /// Delivers `value` to every attached consumer, recording it first when replaying.
    ///
    /// Consumers that detached since the previous offer are pruned here.
    ///
    /// # Errors
    ///
    /// Returns [`SubjectError::Closed`] once the subject is terminal.
    pub fn offer(&self, value: T) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        state.ensure_open()?;

        if let Some(history) = state.history.as_mut() {
            history.record(value.clone());
        }

        state
            .senders
            .retain(|tx| tx.try_send(StreamItem::Value(value.clone())).is_ok());
        Ok(())
    }

    /// Completes the subject: attached consumers drain their backlog and end.
    ///
    /// # Errors
    ///
    /// Returns [`SubjectError::Closed`] if the subject is already terminal.
    pub fn complete(&self) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        state.ensure_open()?;

        state.terminal = Terminal::Completed;
        // Dropping the senders closes every consumer queue after its backlog.
        state.senders.clear();
        debug!("subject completed");
        Ok(())
    }

    /// Fails the subject: attached and future consumers receive `error` after their
    /// backlog and then end.
    ///
    /// # Errors
    ///
    /// Returns [`SubjectError::Closed`] if the subject is already terminal.
    pub fn fail(&self, error: RailcastError) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        state.ensure_open()?;

        for tx in state.senders.drain(..) {
            let _ = tx.try_send(StreamItem::Error(error.clone()));
        }
        debug!("subject failed: {error}");
        state.terminal = Terminal::Failed(error);
        Ok(())
    }

    /// Returns `true` once the subject completed or failed.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.state.lock().ensure_open().is_err()
    }

    /// Number of attached consumers.
    ///
    /// Consumers whose stream was dropped are pruned before counting.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.state.lock();
        state.senders.retain(|tx| !tx.is_closed());
        state.senders.len()
    }

    /// Number of values currently retained for late consumers (always zero for publish).
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.state.lock().history.as_ref().map_or(0, History::len)
    }
}

impl<T: Clone + Send + Sync + 'static> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            state: self.state.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> core::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subject")
            .field("kind", &self.kind)
            .field("terminated", &self.is_terminated())
            .finish_non_exhaustive()
    }
}
