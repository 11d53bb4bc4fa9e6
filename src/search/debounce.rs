//! Quiet-period debounce for raw search input
//!
//! One actor task per debouncer:
//!
//! ```text
//! push("j") push("jo") push("joh") ... ──▶ mpsc ──▶ actor ──(quiet period)──▶ watch
//!                                              each input restarts the timer
//! ```
//!
//! The actor holds at most one pending term. A new input replaces it and
//! restarts the quiet period, so superseded terms are never delivered. When
//! the period elapses the term is published only if it differs from the last
//! settled term.
//!
//! A reset drops the pending term and forgets the settled one without
//! notifying subscribers. Hosts send it when the search was cleared on the
//! table directly, so retyping the old term settles again.

use crate::core::error::{Result, TableError};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

#[derive(Debug)]
enum Input {
    Term(String),
    Reset,
}

/// Turns a stream of keystroke-level search strings into settled terms
///
/// Must be created inside a tokio runtime. Dropping the debouncer stops the
/// actor; a pending term is discarded.
#[derive(Debug)]
pub struct SearchDebouncer {
    input: mpsc::UnboundedSender<Input>,
    settled: watch::Receiver<String>,
    task: JoinHandle<()>,
    quiet: Duration,
}

impl SearchDebouncer {
    /// Spawn the actor with the given quiet period
    pub fn spawn(quiet: Duration) -> Self {
        let (input, rx) = mpsc::unbounded_channel();
        let (tx, settled) = watch::channel(String::new());
        let task = tokio::spawn(run(quiet, rx, tx));
        Self {
            input,
            settled,
            task,
            quiet,
        }
    }

    /// Feed one raw search string
    pub fn push(&self, raw: impl Into<String>) -> Result<()> {
        self.send(Input::Term(raw.into()))
    }

    /// Drop any pending term and forget the settled one
    ///
    /// Ordered with [`push`](Self::push): terms pushed afterwards debounce
    /// against an empty settled term.
    pub fn reset(&self) -> Result<()> {
        self.send(Input::Reset)
    }

    fn send(&self, input: Input) -> Result<()> {
        self.input
            .send(input)
            .map_err(|_| TableError::DebouncerClosed)
    }

    /// Receiver notified whenever a new term settles
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.settled.clone()
    }

    /// The last settled term (empty before the first one)
    pub fn settled(&self) -> String {
        self.settled.borrow().clone()
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Stop the actor; any pending term is dropped
    pub fn shutdown(&self) {
        self.task.abort();
    }

    pub fn is_closed(&self) -> bool {
        self.input.is_closed()
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(quiet: Duration, mut rx: mpsc::UnboundedReceiver<Input>, tx: watch::Sender<String>) {
    let mut pending: Option<String> = None;

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(Input::Term(term)) => pending = Some(term),
                Some(Input::Reset) => {
                    pending = None;
                    // Returning false stores the value without waking receivers
                    tx.send_if_modified(|current| {
                        current.clear();
                        false
                    });
                    tracing::trace!("Search debouncer reset");
                }
                None => break,
            },
            _ = tokio::time::sleep(quiet), if pending.is_some() => {
                if let Some(term) = pending.take() {
                    let emitted = tx.send_if_modified(|current| {
                        if *current == term {
                            false
                        } else {
                            *current = term;
                            true
                        }
                    });
                    if emitted {
                        tracing::debug!(term = %tx.borrow().as_str(), "Search term settled");
                    } else {
                        tracing::trace!("Settled search term unchanged, not emitting");
                    }
                }
            }
        }
    }

    tracing::debug!("Search debouncer input closed");
}
