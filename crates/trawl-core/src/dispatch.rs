//! Per-session request slot: debounce, dispatch and cancellation of the one
//! remote lookup a session may have in flight.
//!
//! Every dispatch cancels the previous token before issuing a new one, and
//! dropping the slot cancels whatever is still outstanding. Outcomes travel
//! back to the owning session over an unbounded channel tagged with the
//! request signature and a per-slot serial; the session decides whether to
//! honour them, and the serial tells it whether the outcome belongs to the
//! request the slot still tracks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::remote::{LookupError, RemoteEntry, RemoteLookup};

/// A finished (or cancelled) lookup, as delivered to the session.
#[derive(Debug)]
pub struct RemoteOutcome {
    /// Query the request was dispatched with.
    pub signature: String,
    /// Dispatch number within the slot, increasing from 1.
    pub serial: u64,
    pub result: Result<Vec<RemoteEntry>, LookupError>,
}

#[derive(Debug)]
pub struct RequestSlot {
    current: Option<(u64, CancellationToken)>,
    dispatched: u64,
    debounce: Duration,
}

impl RequestSlot {
    pub fn new(debounce: Duration) -> Self {
        Self {
            current: None,
            dispatched: 0,
            debounce,
        }
    }

    /// True while a dispatched request has neither finished nor been
    /// cancelled.
    pub fn is_pending(&self) -> bool {
        self.current.as_ref().is_some_and(|(_, t)| !t.is_cancelled())
    }

    /// Cancel the outstanding request, if any. Returns whether one existed.
    pub fn cancel(&mut self) -> bool {
        match self.current.take() {
            Some((_, token)) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Forget the outstanding request once the outcome numbered `serial` has
    /// been applied. Returns false, and keeps tracking, when `serial` belongs
    /// to an older request.
    pub fn finish(&mut self, serial: u64) -> bool {
        match &self.current {
            Some((current, _)) if *current == serial => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Cancel the previous request and spawn a new one for `query`.
    ///
    /// The debounce delay elapses inside the cancellable task, so a request
    /// superseded during the delay never reaches the remote service.
    /// Must be called from within a tokio runtime.
    pub fn dispatch<L: RemoteLookup>(
        &mut self,
        lookup: Arc<L>,
        query: String,
        offset: usize,
        outcomes: mpsc::UnboundedSender<RemoteOutcome>,
    ) {
        if self.cancel() {
            tracing::debug!("superseded outstanding lookup");
        }
        self.dispatched += 1;
        let serial = self.dispatched;
        let token = CancellationToken::new();
        self.current = Some((serial, token.clone()));
        let debounce = self.debounce;

        tracing::debug!(query = %query, offset, serial, ?debounce, "dispatching remote lookup");
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => Err(LookupError::Cancelled),
                r = async {
                    if !debounce.is_zero() {
                        tokio::time::sleep(debounce).await;
                    }
                    lookup.lookup(&query, offset, token.clone()).await
                } => r,
            };
            // The session may already be gone; nothing to report to then.
            let _ = outcomes.send(RemoteOutcome {
                signature: query,
                serial,
                result,
            });
        });
    }
}

impl Default for RequestSlot {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Drop for RequestSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
