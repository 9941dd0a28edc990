//! Single-flight coordination for token refresh.
//!
//! The in-progress flag and the FIFO queue of requests waiting on the
//! refresh sit behind one mutex. The lock is never held across an `.await`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::oneshot;

use crate::auth::{AuthError, TokenStore};
use crate::error::{Result, StrideError};
use crate::transport::{ApiRequest, ApiResponse};

/// A request that was rejected with 401 and waits for the refresh outcome.
pub(crate) struct PendingRequest {
    pub(crate) request: ApiRequest,
    pub(crate) responder: oneshot::Sender<Result<ApiResponse>>,
}

impl PendingRequest {
    pub(crate) fn reject(self, error: &AuthError) {
        let _ = self
            .responder
            .send(Err(StrideError::AuthenticationRequired(error.to_string())));
    }
}

#[derive(Default)]
struct RefreshState {
    in_progress: bool,
    queue: VecDeque<PendingRequest>,
}

/// What a request rejected with 401 should do next.
pub(crate) enum Admission {
    /// The store already holds a newer access token than the one the request
    /// carried; replay with it without refreshing.
    ReplayNow {
        request: ApiRequest,
        access_token: String,
    },
    /// Queued behind a refresh that is already running.
    Queued,
    /// Queued first; the caller must run the refresh and then finish the flight.
    Lead(RefreshFlight),
}

#[derive(Clone, Default)]
pub(crate) struct RefreshCoordinator {
    state: Arc<Mutex<RefreshState>>,
}

impl RefreshCoordinator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Decide how to recover a request that was rejected with 401.
    ///
    /// `sent_token` is the access token the request carried. The flag check,
    /// the store lookup and the enqueue happen under one lock, so exactly one
    /// caller per wave becomes the leader.
    pub(crate) fn admit(
        &self,
        pending: PendingRequest,
        sent_token: Option<&str>,
        store: &dyn TokenStore,
    ) -> Admission {
        let mut state = lock(&self.state);

        if !state.in_progress {
            match store.load() {
                Ok(Some(current)) if Some(current.access_token.as_str()) != sent_token => {
                    return Admission::ReplayNow {
                        request: pending.request,
                        access_token: current.access_token,
                    };
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "Could not read token store before refresh");
                }
            }
        }

        state.queue.push_back(pending);
        if state.in_progress {
            tracing::debug!(queued = state.queue.len(), "Queued request behind token refresh");
            return Admission::Queued;
        }

        state.in_progress = true;
        Admission::Lead(RefreshFlight {
            state: Arc::clone(&self.state),
            finished: false,
        })
    }

    pub(crate) fn is_refreshing(&self) -> bool {
        lock(&self.state).in_progress
    }

    pub(crate) fn queued(&self) -> usize {
        lock(&self.state).queue.len()
    }
}

/// Ownership of the in-progress flag for one refresh.
///
/// [`RefreshFlight::finish`] clears the flag and hands back the queue. If the
/// flight is dropped without finishing, the flag is still cleared and every
/// queued request is rejected.
pub(crate) struct RefreshFlight {
    state: Arc<Mutex<RefreshState>>,
    finished: bool,
}

impl RefreshFlight {
    /// Clear the flag and take every request queued during this flight.
    pub(crate) fn finish(mut self) -> VecDeque<PendingRequest> {
        self.finished = true;
        let mut state = lock(&self.state);
        state.in_progress = false;
        std::mem::take(&mut state.queue)
    }
}

impl Drop for RefreshFlight {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let abandoned = {
            let mut state = lock(&self.state);
            state.in_progress = false;
            std::mem::take(&mut state.queue)
        };
        if !abandoned.is_empty() {
            tracing::warn!(queued = abandoned.len(), "Token refresh abandoned");
        }
        for pending in abandoned {
            pending.reject(&AuthError::RefreshAbandoned);
        }
    }
}

fn lock(state: &Mutex<RefreshState>) -> MutexGuard<'_, RefreshState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
