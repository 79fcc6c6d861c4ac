//! Cooperative cancellation handles.
//!
//! A [`CancellationHandle`] is threaded explicitly into both the retry loop and
//! the wait primitive. It answers three questions: is it already cancelled,
//! why, and (as a future) when will it be.

use async_trait::async_trait;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::watch;

/// A source of cooperative cancellation.
///
/// # Examples
///
/// ```rust
/// use rebound::cancel::{CancelToken, CancellationHandle};
///
/// let token = CancelToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel("shutting down");
/// assert!(token.is_cancelled());
/// assert_eq!(token.reason(), Some("shutting down"));
/// ```
#[async_trait]
pub trait CancellationHandle: Send + Sync {
    /// The value carried by a cancellation. Any type the caller chooses.
    type Reason: Send;

    /// Whether cancellation has already happened.
    fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }

    /// The cancellation reason, or `None` while not cancelled.
    fn reason(&self) -> Option<Self::Reason>;

    /// Resolves with the reason once cancellation happens.
    ///
    /// This is the one-shot listener: dropping the returned future unregisters
    /// it, so abandoned waits do not accumulate listeners.
    async fn cancelled(&self) -> Self::Reason;
}

#[async_trait]
impl<C> CancellationHandle for &C
where
    C: CancellationHandle + ?Sized,
{
    type Reason = C::Reason;

    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }

    fn reason(&self) -> Option<Self::Reason> {
        (**self).reason()
    }

    async fn cancelled(&self) -> Self::Reason {
        (**self).cancelled().await
    }
}

/// A clonable cancellation token carrying a reason.
///
/// All clones observe the same state. The first call to [`cancel`](Self::cancel)
/// wins; later reasons are ignored.
#[derive(Debug)]
pub struct CancelToken<R> {
    state: Arc<watch::Sender<Option<R>>>,
}

impl<R> CancelToken<R> {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            state: Arc::new(state),
        }
    }

    /// Cancel with `reason`, waking every pending listener.
    ///
    /// Returns `false` if the token was already cancelled.
    pub fn cancel(&self, reason: R) -> bool {
        let mut reason = Some(reason);
        self.state.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = reason.take();
            true
        })
    }

    #[cfg(test)]
    pub(crate) fn listeners(&self) -> usize {
        self.state.receiver_count()
    }
}

impl<R> Clone for CancelToken<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<R> Default for CancelToken<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R> CancellationHandle for CancelToken<R>
where
    R: Clone + Send + Sync,
{
    type Reason = R;

    fn is_cancelled(&self) -> bool {
        self.state.borrow().is_some()
    }

    fn reason(&self) -> Option<R> {
        (*self.state.borrow()).clone()
    }

    async fn cancelled(&self) -> R {
        let mut rx = self.state.subscribe();
        loop {
            let current = (*rx.borrow_and_update()).clone();
            if let Some(reason) = current {
                return reason;
            }
            // The sender lives in `self`, so `changed` cannot observe a closed channel here.
            let _ = rx.changed().await;
        }
    }
}

/// A handle that never cancels. Used when no handle is supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoCancel;

#[async_trait]
impl CancellationHandle for NoCancel {
    type Reason = Infallible;

    fn is_cancelled(&self) -> bool {
        false
    }

    fn reason(&self) -> Option<Infallible> {
        None
    }

    async fn cancelled(&self) -> Infallible {
        std::future::pending().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_reason_wins() {
        let token = CancelToken::new();
        assert!(token.cancel(1));
        assert!(!token.cancel(2));
        assert_eq!(token.reason(), Some(1));
    }

    #[test]
    fn test_clones_share_state() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel("stop");
        assert!(token.is_cancelled());
        assert_eq!(token.reason(), Some("stop"));
    }

    #[tokio::test]
    async fn test_cancelled_resolves_immediately_when_already_cancelled() {
        let token = CancelToken::new();
        token.cancel("early");
        assert_eq!(token.cancelled().await, "early");
    }

    #[tokio::test]
    async fn test_cancelled_wakes_pending_listener() {
        let token: CancelToken<String> = CancelToken::new();
        let trigger = token.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            trigger.cancel("later".to_string());
        });

        assert_eq!(token.cancelled().await, "later");
    }

    #[tokio::test]
    async fn test_dropped_listener_does_not_block_cancel() {
        let token = CancelToken::<()>::new();
        {
            let mut listener = tokio_test::task::spawn(token.cancelled());
            tokio_test::assert_pending!(listener.poll());
        }
        assert!(token.cancel(()));
        assert_eq!(token.listeners(), 0);
    }

    #[test]
    fn test_no_cancel_never_reports_cancellation() {
        assert!(!NoCancel.is_cancelled());
        assert!(NoCancel.reason().is_none());

        let handle = NoCancel;
        let mut listener = tokio_test::task::spawn(handle.cancelled());
        tokio_test::assert_pending!(listener.poll());
    }
}
