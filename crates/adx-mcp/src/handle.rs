//! Shared handle to the remote execution client.
//!
//! The handle replaces ambient nullable state with an explicit lifecycle:
//! it is constructed either connected or unconnected at startup, handlers
//! read the executor without mutating, and shutdown moves it to `Closed`.
//! An unconnected or closed handle is a per-request error, never a crash.

use std::sync::{Arc, PoisonError, RwLock};

use adx_core::QueryExecutor;

enum HandleState {
    Unconnected,
    Connected(Arc<dyn QueryExecutor>),
    Closed,
}

/// Handle shared by all request handlers.
///
/// State transitions are single-shot: `Unconnected` or `Connected` at
/// construction, `Closed` at shutdown. [`RemoteHandle::close`] is
/// idempotent.
#[derive(Clone)]
pub struct RemoteHandle {
    state: Arc<RwLock<HandleState>>,
}

impl RemoteHandle {
    /// A handle with no usable client. Every remote-dependent request
    /// through it fails individually.
    pub fn unconnected() -> Self {
        Self {
            state: Arc::new(RwLock::new(HandleState::Unconnected)),
        }
    }

    /// A handle wrapping a live client.
    pub fn connected(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            state: Arc::new(RwLock::new(HandleState::Connected(executor))),
        }
    }

    /// The executor for a remote-dependent request.
    ///
    /// # Errors
    ///
    /// Returns a caller-facing message when the handle never connected or
    /// has been closed.
    pub fn executor(&self) -> Result<Arc<dyn QueryExecutor>, String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        match &*state {
            HandleState::Connected(executor) => Ok(Arc::clone(executor)),
            HandleState::Unconnected => Err(
                "ADX client is not initialized; check the ADX_* environment variables".to_string(),
            ),
            HandleState::Closed => Err("ADX client has been shut down".to_string()),
        }
    }

    pub fn is_connected(&self) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        matches!(&*state, HandleState::Connected(_))
    }

    /// Release the client. Closing twice, or closing a handle that never
    /// connected, is a no-op.
    pub fn close(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = HandleState::Closed;
    }
}
