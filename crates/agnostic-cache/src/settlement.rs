//! Shared computations whose outcome can be inspected without awaiting.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{self, BoxFuture, FutureExt, Shared};

const PENDING: u8 = 0;
const FULFILLED: u8 = 1;
const REJECTED: u8 = 2;

/// The observed state of a tracked computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Pending,
    Fulfilled,
    Rejected,
}

/// A shareable computation that records how it settled.
///
/// Every clone awaits the same underlying future, which runs at most once.
/// The computation is driven by whichever clone is polled first; until then
/// it reports [`Settlement::Pending`].
pub struct Tracked<T, E> {
    inner: Shared<BoxFuture<'static, Result<T, E>>>,
    state: Arc<AtomicU8>,
}

impl<T, E> Tracked<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Wraps a computation.
    ///
    /// Wrapping a value that is already a `Tracked` of the same type returns
    /// it unchanged, so both handles observe one settlement.
    #[must_use]
    pub fn new<F>(computation: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let mut slot = Some(computation);
        if let Some(tracked) = (&mut slot as &mut dyn Any)
            .downcast_mut::<Option<Self>>()
            .and_then(Option::take)
        {
            return tracked;
        }
        let Some(computation) = slot else {
            unreachable!("the slot is only emptied for an already tracked computation")
        };

        let state = Arc::new(AtomicU8::new(PENDING));
        let observer = Arc::clone(&state);
        let inner = computation
            .inspect(move |result| {
                let settled = if result.is_ok() { FULFILLED } else { REJECTED };
                observer.store(settled, Ordering::Release);
            })
            .boxed()
            .shared();

        Self { inner, state }
    }

    /// Creates an already settled computation.
    #[must_use]
    pub fn ready(result: Result<T, E>) -> Self {
        let tracked = Self::new(future::ready(result));
        // Completes immediately, so the state and value are settled on return.
        let _ = tracked.clone().now_or_never();
        tracked
    }

    /// Returns the settled value, if the computation has finished.
    #[must_use]
    pub fn peek(&self) -> Option<&Result<T, E>> {
        self.inner.peek()
    }
}

impl<T, E> Tracked<T, E> {
    /// Returns the latest known state.
    #[must_use]
    pub fn settlement(&self) -> Settlement {
        match self.state.load(Ordering::Acquire) {
            FULFILLED => Settlement::Fulfilled,
            REJECTED => Settlement::Rejected,
            _ => Settlement::Pending,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.settlement() == Settlement::Pending
    }

    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        self.settlement() == Settlement::Fulfilled
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.settlement() == Settlement::Rejected
    }
}

impl<T, E> Clone for Tracked<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T, E> fmt::Debug for Tracked<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracked")
            .field("settlement", &self.settlement())
            .finish_non_exhaustive()
    }
}

impl<T, E> Future for Tracked<T, E>
where
    T: Clone,
    E: Clone,
{
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx)
    }
}
