//! Request lifecycle state.
//!
//! [`RequestLifecycle`] wraps one logical backend call and tracks its
//! loading flag, last error and last successful payload. Every invocation
//! takes a sequence token; only the most recent invocation may write its
//! outcome, so an older response arriving late is discarded instead of
//! overwriting fresher state.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// Observable state of one request lifecycle.
///
/// At most one of `data` and `error` is present, and neither is while
/// `loading` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> RequestState<T> {
    /// Nothing requested yet.
    pub fn idle() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True when no request has run and nothing is cached.
    pub fn is_idle(&self) -> bool {
        !self.loading && self.data.is_none() && self.error.is_none()
    }

    fn begin(&mut self) {
        self.data = None;
        self.loading = true;
        self.error = None;
    }

    fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.loading = false;
        self.error = None;
    }

    fn fail(&mut self, message: String) {
        self.data = None;
        self.loading = false;
        self.error = Some(message);
    }

    fn abandon(&mut self) {
        self.loading = false;
    }
}

/// Wrapper around an asynchronous backend call with observable state.
///
/// ```ignore
/// let files: RequestLifecycle<FileListing> = RequestLifecycle::new();
/// let listing = files.execute(|| api.list_files(None, None)).await?;
/// assert!(!files.state().is_loading());
/// ```
#[derive(Debug)]
pub struct RequestLifecycle<T> {
    state: watch::Sender<RequestState<T>>,
    issued: AtomicU64,
}

impl<T> Default for RequestLifecycle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RequestLifecycle<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(RequestState::idle());
        Self {
            state,
            issued: AtomicU64::new(0),
        }
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.state.subscribe()
    }

    /// Return to idle, dropping cached data and error.
    ///
    /// Any invocation still in flight becomes stale and will not write.
    pub fn reset(&self) {
        self.issued.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(RequestState::idle());
    }

    fn is_current(&self, token: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == token
    }
}

/// Clears `loading` if an invocation is dropped before it settles, unless a
/// newer invocation owns the state by then.
struct InFlight<'a, T> {
    lifecycle: &'a RequestLifecycle<T>,
    token: u64,
    settled: bool,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.settled || !self.lifecycle.is_current(self.token) {
            return;
        }
        debug!(token = self.token, "request dropped before completion");
        self.lifecycle.state.send_modify(RequestState::abandon);
    }
}

impl<T: Clone> RequestLifecycle<T> {
    /// Snapshot of the current state.
    pub fn state(&self) -> RequestState<T> {
        self.state.borrow().clone()
    }

    /// Run `call`, updating the observable state around it.
    ///
    /// The outcome is always returned to the caller. It is written to the
    /// shared state only when no newer invocation (or reset) has started in
    /// the meantime. Errors are recorded by their display text. Dropping the
    /// returned future before it completes leaves the state idle.
    pub async fn execute<F, Fut, E>(&self, call: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(RequestState::begin);
        let mut guard = InFlight {
            lifecycle: self,
            token,
            settled: false,
        };

        let outcome = call().await;
        guard.settled = true;

        if !self.is_current(token) {
            debug!(token, "discarding stale response");
            return outcome;
        }

        match &outcome {
            Ok(data) => {
                let data = data.clone();
                self.state.send_modify(|state| state.succeed(data));
            }
            Err(err) => {
                let message = err.to_string();
                self.state.send_modify(|state| state.fail(message));
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[test]
    fn test_initial_state_is_idle() {
        let lifecycle: RequestLifecycle<u32> = RequestLifecycle::new();
        let state = lifecycle.state();
        assert!(state.is_idle());
        assert!(!state.is_loading());
        assert_eq!(state.data(), None);
        assert_eq!(state.error(), None);
    }

    #[tokio::test]
    async fn test_success_stores_data() {
        let lifecycle = RequestLifecycle::new();
        let result = lifecycle
            .execute(|| async { Ok::<_, ApiError>(vec!["a.csv".to_string()]) })
            .await
            .unwrap();

        assert_eq!(result, vec!["a.csv"]);
        let state = lifecycle.state();
        assert_eq!(state.data(), Some(&vec!["a.csv".to_string()]));
        assert!(!state.is_loading());
        assert_eq!(state.error(), None);
    }

    #[tokio::test]
    async fn test_failure_clears_previous_data() {
        let lifecycle = RequestLifecycle::new();
        lifecycle
            .execute(|| async { Ok::<u32, ApiError>(7) })
            .await
            .unwrap();

        let err = lifecycle
            .execute(|| async {
                Err::<u32, _>(ApiError::Protocol {
                    status: 503,
                    message: "disk full".to_string(),
                })
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(503));
        let state = lifecycle.state();
        assert_eq!(state.error(), Some("disk full"));
        assert_eq!(state.data(), None);
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_loading_visible_while_in_flight() {
        let lifecycle = Arc::new(RequestLifecycle::<u32>::new());
        let (tx, rx) = oneshot::channel::<u32>();

        let task = {
            let lifecycle = lifecycle.clone();
            tokio::spawn(async move {
                lifecycle
                    .execute(|| async move { Ok::<_, ApiError>(rx.await.unwrap_or(0)) })
                    .await
            })
        };

        let mut watcher = lifecycle.subscribe();
        watcher.wait_for(|s| s.is_loading()).await.unwrap();
        assert_eq!(lifecycle.state().error(), None);
        assert_eq!(lifecycle.state().data(), None);

        tx.send(3).unwrap();
        assert_eq!(task.await.unwrap().unwrap(), 3);
        assert!(!lifecycle.state().is_loading());
    }

    #[tokio::test]
    async fn test_new_invocation_clears_previous_outcome() {
        let lifecycle = RequestLifecycle::<u32>::new();
        let _ = lifecycle
            .execute(|| async { Err::<u32, _>(ApiError::Transport("refused".to_string())) })
            .await;
        assert_eq!(lifecycle.state().error(), Some("refused"));

        let (tx, rx) = oneshot::channel::<u32>();
        let pending = lifecycle.execute(|| async move { Ok::<_, ApiError>(rx.await.unwrap_or(0)) });
        tokio::pin!(pending);
        assert!(futures::poll!(pending.as_mut()).is_pending());

        let state = lifecycle.state();
        assert!(state.is_loading());
        assert_eq!(state.error(), None);
        assert_eq!(state.data(), None);

        tx.send(1).unwrap();
        pending.await.unwrap();
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let lifecycle = RequestLifecycle::<&'static str>::new();
        let (slow_tx, slow_rx) = oneshot::channel::<&'static str>();
        let (fast_tx, fast_rx) = oneshot::channel::<&'static str>();

        let slow = lifecycle.execute(|| async move { Ok::<_, ApiError>(slow_rx.await.unwrap_or("")) });
        let fast = lifecycle.execute(|| async move { Ok::<_, ApiError>(fast_rx.await.unwrap_or("")) });
        tokio::pin!(slow);
        tokio::pin!(fast);

        // Start the older call first, then the newer one.
        assert!(futures::poll!(slow.as_mut()).is_pending());
        assert!(futures::poll!(fast.as_mut()).is_pending());

        fast_tx.send("new").unwrap();
        assert_eq!(fast.await.unwrap(), "new");
        assert_eq!(lifecycle.state().data(), Some(&"new"));

        slow_tx.send("old").unwrap();
        assert_eq!(slow.await.unwrap(), "old");

        let state = lifecycle.state();
        assert_eq!(state.data(), Some(&"new"));
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_stale_error_is_discarded() {
        let lifecycle = RequestLifecycle::<u32>::new();
        let (slow_tx, slow_rx) = oneshot::channel::<()>();

        let slow = lifecycle.execute(|| async move {
            let _ = slow_rx.await;
            Err::<u32, _>(ApiError::Transport("late".to_string()))
        });
        tokio::pin!(slow);
        assert!(futures::poll!(slow.as_mut()).is_pending());

        lifecycle
            .execute(|| async { Ok::<u32, ApiError>(5) })
            .await
            .unwrap();

        slow_tx.send(()).unwrap();
        assert!(slow.await.is_err());

        let state = lifecycle.state();
        assert_eq!(state.error(), None);
        assert_eq!(state.data(), Some(&5));
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let lifecycle = RequestLifecycle::<u32>::new();
        lifecycle
            .execute(|| async { Ok::<u32, ApiError>(1) })
            .await
            .unwrap();
        lifecycle.reset();
        assert!(lifecycle.state().is_idle());
    }

    #[tokio::test]
    async fn test_reset_invalidates_in_flight_call() {
        let lifecycle = RequestLifecycle::<u32>::new();
        let (tx, rx) = oneshot::channel::<u32>();

        let pending = lifecycle.execute(|| async move { Ok::<_, ApiError>(rx.await.unwrap_or(0)) });
        tokio::pin!(pending);
        assert!(futures::poll!(pending.as_mut()).is_pending());

        lifecycle.reset();
        tx.send(9).unwrap();
        assert_eq!(pending.await.unwrap(), 9);
        assert!(lifecycle.state().is_idle());
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let lifecycle = RequestLifecycle::<u32>::new();
        let mut rx = lifecycle.subscribe();

        lifecycle
            .execute(|| async { Ok::<u32, ApiError>(2) })
            .await
            .unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().data(), Some(&2));
    }

    #[tokio::test]
    async fn test_timed_out_call_leaves_idle() {
        let lifecycle = RequestLifecycle::<u32>::new();
        let mut rx = lifecycle.subscribe();

        let outcome = tokio::time::timeout(
            Duration::from_millis(20),
            lifecycle.execute(|| std::future::pending::<Result<u32, ApiError>>()),
        )
        .await;

        assert!(outcome.is_err());
        let state = lifecycle.state();
        assert!(state.is_idle());
        assert!(!state.is_loading());
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().is_loading());
    }

    #[tokio::test]
    async fn test_dropped_stale_call_keeps_newer_loading() {
        let lifecycle = RequestLifecycle::<u32>::new();
        let (tx, rx) = oneshot::channel::<u32>();

        let older = lifecycle.execute(|| std::future::pending::<Result<u32, ApiError>>());
        let newer = lifecycle.execute(|| async move { Ok::<_, ApiError>(rx.await.unwrap_or(0)) });
        tokio::pin!(newer);
        {
            tokio::pin!(older);
            assert!(futures::poll!(older.as_mut()).is_pending());
            assert!(futures::poll!(newer.as_mut()).is_pending());
        }

        assert!(lifecycle.state().is_loading());

        tx.send(4).unwrap();
        assert_eq!(newer.await.unwrap(), 4);
        assert_eq!(lifecycle.state().data(), Some(&4));
    }

    #[tokio::test]
    async fn test_dropped_before_first_poll_leaves_state_alone() {
        let lifecycle = RequestLifecycle::<u32>::new();
        lifecycle
            .execute(|| async { Ok::<u32, ApiError>(8) })
            .await
            .unwrap();

        drop(lifecycle.execute(|| async { Ok::<u32, ApiError>(9) }));

        assert_eq!(lifecycle.state().data(), Some(&8));
    }
}
