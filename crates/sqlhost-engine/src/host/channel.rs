//! Message passing from worker threads onto the host thread.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use sqlhost_core::traits::{Cancellable, CancellationToken};
use tracing::{debug, error, trace};

use crate::pool::panic_message;

type Delivery = Box<dyn FnOnce() + Send + 'static>;

/// A delivery queued for the host thread, tagged with the generation that
/// produced it.
struct HostMessage {
    generation: CancellationToken,
    delivery: Delivery,
}

/// Producer half, cloned into every task that reports back to the host.
#[derive(Clone)]
pub struct HostSender {
    tx: Sender<HostMessage>,
}

/// Consumer half. Owned by the host thread; nothing else runs deliveries.
pub struct HostLoop {
    rx: Receiver<HostMessage>,
}

/// Create a connected sender/loop pair.
pub fn host_channel() -> (HostSender, HostLoop) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (HostSender { tx }, HostLoop { rx })
}

impl HostSender {
    /// Queue `delivery` for the host thread.
    ///
    /// Returns `false` without queuing when `generation` is already
    /// cancelled or the host loop is gone.
    pub fn post<F>(&self, generation: &CancellationToken, delivery: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if generation.is_cancelled() {
            trace!("dropping host delivery from a cancelled generation");
            return false;
        }
        self.tx
            .send(HostMessage {
                generation: generation.clone(),
                delivery: Box::new(delivery),
            })
            .is_ok()
    }
}

impl HostLoop {
    /// Run every delivery already queued. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(message) = self.rx.try_recv() {
            if self.dispatch(message) {
                ran += 1;
            }
        }
        ran
    }

    /// Block up to `timeout` for one delivery, then drain the rest.
    pub fn run_for(&self, timeout: Duration) -> usize {
        match self.rx.recv_timeout(timeout) {
            Ok(message) => usize::from(self.dispatch(message)) + self.run_pending(),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }

    /// Number of deliveries waiting, stale ones included.
    pub fn queued(&self) -> usize {
        self.rx.len()
    }

    fn dispatch(&self, message: HostMessage) -> bool {
        if message.generation.is_cancelled() {
            debug!("discarding host delivery from a cancelled generation");
            return false;
        }
        if let Err(panic) = catch_unwind(AssertUnwindSafe(message.delivery)) {
            error!(panic = %panic_message(&*panic), "host delivery panicked");
        }
        true
    }
}
