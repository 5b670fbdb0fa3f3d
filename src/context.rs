//! Cooperative cancellation token
//!
//! [`Context`] is threaded through every call of a
//! [`ContextValidator`](crate::ContextValidator). Composed validators only
//! pass it along; each check decides for itself whether to look at it and
//! bail out early with a [`ContextError`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Why a [`Context`] is done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    /// `cancel()` was called on the token or one of its parents
    #[error("context cancelled")]
    Cancelled,

    /// The token's deadline has passed
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation and deadline token
///
/// Clones share state: cancelling one clone cancels them all. Children
/// created with [`with_cancel`](Self::with_cancel),
/// [`with_deadline`](Self::with_deadline) or
/// [`with_timeout`](Self::with_timeout) observe their parent's cancellation,
/// but cancelling a child leaves the parent untouched.
#[derive(Debug, Clone, Default)]
pub struct Context {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
    parent: Option<Context>,
}

impl Context {
    /// A token that is never cancelled and has no deadline
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A child token that can be cancelled on its own
    #[must_use]
    pub fn with_cancel(&self) -> Self {
        self.child(self.inner.deadline)
    }

    /// A child token that expires at `deadline`
    ///
    /// If the parent expires sooner, the parent's deadline is kept.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let effective = match self.inner.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };
        self.child(Some(effective))
    }

    /// A child token that expires `timeout` from now
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.with_cancel(),
        }
    }

    fn child(&self, deadline: Option<Instant>) -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                deadline,
                parent: Some(self.clone()),
            }),
        }
    }

    /// Cancel this token and every child derived from it
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::AcqRel) {
            log::debug!("context cancelled");
        }
    }

    /// Whether this token or any parent has been cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        let mut current = Some(self);
        while let Some(ctx) = current {
            if ctx.inner.cancelled.load(Ordering::Acquire) {
                return true;
            }
            current = ctx.inner.parent.as_ref();
        }
        false
    }

    /// The instant this token expires, if any
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Why the token is done, or `None` while it is still live
    ///
    /// Cancellation is reported ahead of an expired deadline.
    #[must_use]
    pub fn err(&self) -> Option<ContextError> {
        if self.is_cancelled() {
            return Some(ContextError::Cancelled);
        }
        match self.inner.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Whether the token is cancelled or past its deadline
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }
}
