//! Scene readiness signal.
//!
//! The index fires the signal with a new generation number every time a
//! scene finishes indexing. Dependents await a [`SceneReady`] future once
//! instead of polling the index.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

#[derive(Default)]
struct ReadyInner {
    generation: u64,
    /// Pending waiters keyed by the slot of their `SceneReady`.
    wakers: Vec<(u64, Waker)>,
    next_slot: u64,
}

/// Cloneable handle to a scene generation counter with wake-ups.
#[derive(Clone, Default)]
pub struct ReadySignal {
    inner: Arc<Mutex<ReadyInner>>,
}

impl ReadySignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently fired generation, `0` before the first scene.
    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    /// Publish `generation` and wake every waiter.
    pub(crate) fn fire(&self, generation: u64) {
        let wakers = {
            let mut inner = self.inner.lock();
            inner.generation = generation;
            std::mem::take(&mut inner.wakers)
        };
        for (_, waker) in wakers {
            waker.wake();
        }
    }

    /// Number of futures currently parked on the signal.
    pub fn waiting(&self) -> usize {
        self.inner.lock().wakers.len()
    }

    /// Future resolving once the generation reaches `target`.
    pub fn wait_for(&self, target: u64) -> SceneReady {
        SceneReady {
            signal: self.clone(),
            target,
            slot: None,
        }
    }
}

impl std::fmt::Debug for ReadySignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadySignal")
            .field("generation", &self.generation())
            .finish()
    }
}

/// Future returned by [`ReadySignal::wait_for`].
///
/// Resolves to the generation that satisfied the wait. Dropping a pending
/// future unregisters its waker.
#[derive(Debug)]
pub struct SceneReady {
    signal: ReadySignal,
    target: u64,
    slot: Option<u64>,
}

impl Future for SceneReady {
    type Output = u64;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<u64> {
        let this = self.get_mut();
        let mut inner = this.signal.inner.lock();
        if inner.generation >= this.target {
            return Poll::Ready(inner.generation);
        }

        let slot = match this.slot {
            Some(slot) => slot,
            None => {
                let slot = inner.next_slot;
                inner.next_slot += 1;
                this.slot = Some(slot);
                slot
            }
        };
        match inner.wakers.iter_mut().find(|(s, _)| *s == slot) {
            Some((_, waker)) => {
                if !waker.will_wake(cx.waker()) {
                    *waker = cx.waker().clone();
                }
            }
            // First poll, or the signal fired without reaching the target.
            None => inner.wakers.push((slot, cx.waker().clone())),
        }
        Poll::Pending
    }
}

impl Drop for SceneReady {
    fn drop(&mut self) {
        if let Some(slot) = self.slot {
            self.signal.inner.lock().wakers.retain(|(s, _)| *s != slot);
        }
    }
}
