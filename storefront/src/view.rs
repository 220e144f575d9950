//! Per-view state and lifetime.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// What a view shows: a spinner, its data, or an inline error.
///
/// `Ready` and `Error` are exclusive; any operation that re-fetches goes back
/// through `Loading`. There is no stale state: data is either the last
/// successful fetch or absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Error(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// Ties in-flight calls to the mount of one view.
///
/// Cancelled by [`ViewLifetime::cancel`] or when dropped together with the
/// view. Calls wrapped in [`ViewLifetime::run`] resolve to `None` once
/// cancelled, and the caller must then leave its state alone.
#[derive(Debug, Default)]
pub struct ViewLifetime {
    token: CancellationToken,
}

impl ViewLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that observes or cancels this lifetime from elsewhere.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn run<F: Future>(&self, call: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            () = self.token.cancelled() => None,
            output = call => Some(output),
        }
    }
}

impl Drop for ViewLifetime {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
