use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use futures_util::task::AtomicWaker;

use crate::error::CallError;

const PENDING: u8 = 0;
const SETTLED: u8 = 1;
const CANCELLED: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Pending,
    Settled,
    Cancelled,
}

type CancelCallback = Box<dyn FnOnce() + Send>;

struct Shared {
    state: AtomicU8,
    waker: AtomicWaker,
    on_cancel: Mutex<Vec<CancelCallback>>,
}

impl Shared {
    fn state(&self) -> OperationState {
        match self.state.load(Ordering::Acquire) {
            PENDING => OperationState::Pending,
            SETTLED => OperationState::Settled,
            _ => OperationState::Cancelled,
        }
    }

    fn transition(&self, to: u8) -> bool {
        self.state
            .compare_exchange(PENDING, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn cancel(&self) {
        if !self.transition(CANCELLED) {
            return;
        }
        let callbacks = std::mem::take(&mut *self.on_cancel.lock().unwrap_or_else(PoisonError::into_inner));
        for cb in callbacks {
            cb();
        }
        self.waker.wake();
    }
}

/// Cancels the operation it was taken from; cheap to clone and `Send`, so it
/// can be handed to timers or other tasks.
#[derive(Clone)]
pub struct CancelHandle {
    shared: Arc<Shared>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.shared.cancel();
    }

    pub fn state(&self) -> OperationState {
        self.shared.state()
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle").field("state", &self.state()).finish()
    }
}

/// One in-flight call.
///
/// The wrapped work is lazy: nothing runs until the operation is first polled,
/// so cancelling before that guarantees the request is never sent. After
/// dispatch, cancelling drops the in-flight work. Either way the operation
/// resolves exactly once; `PENDING -> SETTLED` and `PENDING -> CANCELLED` are
/// decided by a single compare-and-set and the first transition wins.
#[must_use = "operations do nothing unless polled"]
pub struct CancelableOperation<T> {
    shared: Arc<Shared>,
    inner: Option<BoxFuture<'static, Result<T, CallError>>>,
}

impl<T> CancelableOperation<T> {
    pub fn new<F>(work: F) -> Self
    where
        F: Future<Output = Result<T, CallError>> + Send + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                state: AtomicU8::new(PENDING),
                waker: AtomicWaker::new(),
                on_cancel: Mutex::new(Vec::new()),
            }),
            inner: Some(Box::pin(work)),
        }
    }

    /// No-op once the operation has settled or was already cancelled.
    pub fn cancel(&self) {
        self.shared.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Registers a callback run once if cancellation wins. Ignored when the
    /// operation is no longer pending.
    pub fn on_cancel(&self, f: impl FnOnce() + Send + 'static) {
        let mut callbacks = self
            .shared
            .on_cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.shared.state() == OperationState::Pending {
            callbacks.push(Box::new(f));
        }
    }

    pub fn state(&self) -> OperationState {
        self.shared.state()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == OperationState::Cancelled
    }

    pub fn is_settled(&self) -> bool {
        self.state() == OperationState::Settled
    }
}

impl<T> Future for CancelableOperation<T> {
    type Output = Result<T, CallError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        this.shared.waker.register(cx.waker());

        if this.shared.state() == OperationState::Cancelled {
            // Dropping the work aborts whatever the transport has in flight.
            this.inner = None;
            return Poll::Ready(Err(CallError::Cancelled));
        }

        let Some(work) = this.inner.as_mut() else {
            panic!("CancelableOperation polled after completion");
        };

        match work.as_mut().poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(outcome) => {
                this.inner = None;
                if this.shared.transition(SETTLED) {
                    Poll::Ready(outcome)
                } else {
                    Poll::Ready(Err(CallError::Cancelled))
                }
            }
        }
    }
}

impl<T> std::fmt::Debug for CancelableOperation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelableOperation")
            .field("state", &self.state())
            .finish()
    }
}
