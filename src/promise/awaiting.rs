//! `.await` support for promises.
//!
//! Awaiting subscribes like any other consumer, so the outcome still
//! arrives through a flush job on the promise's scheduler. Driving that
//! scheduler (for example with [`EventLoop::block_on`](crate::EventLoop::block_on))
//! is the caller's job.

use super::Promise;
use std::cell::RefCell;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

struct WaitSlot<T, E> {
    outcome: Option<Result<T, E>>,
    waker: Option<Waker>,
}

impl<T, E> WaitSlot<T, E> {
    fn complete(slot: &RefCell<Self>, outcome: Result<T, E>) {
        let waker = {
            let mut slot = slot.borrow_mut();
            slot.outcome = Some(outcome);
            slot.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// Future returned by awaiting a [`Promise`]. Resolves to its outcome.
#[must_use = "futures do nothing unless polled"]
pub struct Settled<T, E> {
    promise: Promise<T, E>,
    slot: Rc<RefCell<WaitSlot<T, E>>>,
    subscribed: bool,
}

impl<T, E> Future for Settled<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        {
            let mut slot = this.slot.borrow_mut();
            if let Some(outcome) = slot.outcome.take() {
                return Poll::Ready(outcome);
            }
            slot.waker = Some(cx.waker().clone());
        }

        if !this.subscribed {
            this.subscribed = true;
            let on_ok = Rc::clone(&this.slot);
            let on_err = Rc::clone(&this.slot);
            this.promise.on_settled(
                move |value| WaitSlot::complete(&on_ok, Ok(value)),
                move |reason| WaitSlot::complete(&on_err, Err(reason)),
            );
            // An inline scheduler may have delivered already.
            if let Some(outcome) = this.slot.borrow_mut().outcome.take() {
                return Poll::Ready(outcome);
            }
        }
        Poll::Pending
    }
}

impl<T, E> IntoFuture for Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    type Output = Result<T, E>;
    type IntoFuture = Settled<T, E>;

    fn into_future(self) -> Self::IntoFuture {
        Settled {
            promise: self,
            slot: Rc::new(RefCell::new(WaitSlot {
                outcome: None,
                waker: None,
            })),
            subscribed: false,
        }
    }
}

impl<T, E> std::fmt::Debug for Settled<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settled")
            .field("promise", &self.promise.id())
            .field("subscribed", &self.subscribed)
            .finish_non_exhaustive()
    }
}
