//! Per-call cancellation and deadline handling.
//!
//! Every operation takes a [`RequestContext`]. The transport races the
//! outbound send and the body read against the context, so a cancelled or
//! expired call aborts promptly with a transport error instead of decoding a
//! partial body.
//!
//! # Example
//!
//! ```rust
//! use graphql_shape::{CancellationToken, RequestContext};
//! use std::time::Duration;
//!
//! let token = CancellationToken::new();
//! let ctx = RequestContext::background()
//!     .with_timeout(Duration::from_secs(5))
//!     .with_cancellation(token.clone());
//!
//! // Elsewhere, e.g. on shutdown:
//! token.cancel();
//! assert!(ctx.is_cancelled());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// A cloneable cancellation signal shared between a caller and in-flight calls.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<CancellationState>,
}

#[derive(Debug, Default)]
struct CancellationState {
    cancelled: AtomicBool,
    notify: tokio::sync::Notify,
}

impl CancellationToken {
    /// Creates a new, non-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Requests cancellation and wakes every waiter.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::AcqRel) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Completes once cancellation is requested.
    ///
    /// Returns immediately if the token is already cancelled.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Cancellation and deadline scope for a single operation.
///
/// The default context never expires and cannot be cancelled.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancellation: Option<CancellationToken>,
}

impl RequestContext {
    /// Returns a context with no deadline and no cancellation.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Sets a deadline `timeout` from now.
    ///
    /// An earlier deadline already present on the context is kept. A
    /// timeout too large to represent leaves the context unchanged.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Sets an absolute deadline, keeping the earlier of the two if one exists.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(self.deadline.map_or(deadline, |d| d.min(deadline)));
        self
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the cancellation token, if any.
    #[must_use]
    pub const fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// Returns `true` if the attached token has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Returns `true` if the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Completes when the context is cancelled. Pending forever otherwise.
    pub(crate) async fn cancelled(&self) {
        match &self.cancellation {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    }

    /// Completes when the deadline passes. Pending forever otherwise.
    pub(crate) async fn expired(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}
