//! Serialized executor: same-name tasks run in submission order and never
//! overlap; different names run in parallel up to the pool size.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use sqlhost_core::errors::PoolError;
use sqlhost_core::traits::{Cancellable, CancellationToken};
use sqlhost_core::types::FxHashMap;
use tracing::{debug, warn};

use crate::pool::{lock, panic_message, WorkerPool};

type Task = Box<dyn FnOnce() + Send + 'static>;

struct Queued {
    generation: CancellationToken,
    run: Task,
}

/// FIFO of one connection name plus its running flag.
#[derive(Default)]
struct Lane {
    queue: VecDeque<Queued>,
    running: bool,
}

struct Lanes {
    /// Bumped by `clear`; completions from an older epoch are ignored.
    epoch: u64,
    map: FxHashMap<String, Lane>,
}

struct Inner {
    pool: Arc<WorkerPool>,
    lanes: Mutex<Lanes>,
}

#[derive(Clone)]
pub struct SerialExecutor {
    inner: Arc<Inner>,
}

impl SerialExecutor {
    pub fn new(pool: Arc<WorkerPool>) -> Self {
        Self {
            inner: Arc::new(Inner {
                pool,
                lanes: Mutex::new(Lanes {
                    epoch: 0,
                    map: FxHashMap::default(),
                }),
            }),
        }
    }

    /// Enqueue `operation` for `name`. `continuation` receives its output,
    /// or `PoolError::WorkerPanic` if it panicked.
    ///
    /// If `generation` is cancelled by the time the task is dequeued,
    /// neither closure runs.
    pub fn submit<T, Op, Cont>(
        &self,
        name: &str,
        generation: &CancellationToken,
        operation: Op,
        continuation: Cont,
    ) -> Result<(), PoolError>
    where
        T: Send + 'static,
        Op: FnOnce() -> T + Send + 'static,
        Cont: FnOnce(Result<T, PoolError>) + Send + 'static,
    {
        let run: Task = Box::new(move || {
            let outcome = catch_unwind(AssertUnwindSafe(operation)).map_err(|panic| {
                PoolError::WorkerPanic {
                    message: panic_message(&*panic),
                }
            });
            continuation(outcome);
        });
        let queued = Queued {
            generation: generation.clone(),
            run,
        };

        let mut lanes = lock(&self.inner.lanes);
        let epoch = lanes.epoch;
        let lane = lanes.map.entry(name.to_string()).or_default();
        if lane.running {
            lane.queue.push_back(queued);
            return Ok(());
        }
        lane.running = true;
        if let Err(err) = self.dispatch(name, epoch, queued) {
            lanes.map.remove(name);
            return Err(err);
        }
        Ok(())
    }

    /// Drop every queued task and forget all running flags.
    pub fn clear(&self) {
        let mut lanes = lock(&self.inner.lanes);
        lanes.epoch += 1;
        let dropped: usize = lanes.map.values().map(|lane| lane.queue.len()).sum();
        lanes.map.clear();
        if dropped > 0 {
            warn!(dropped, "executor cleared queued tasks");
        }
    }

    /// Tasks waiting behind the running one for `name`.
    pub fn queued(&self, name: &str) -> usize {
        lock(&self.inner.lanes)
            .map
            .get(name)
            .map_or(0, |lane| lane.queue.len())
    }

    fn dispatch(&self, name: &str, epoch: u64, task: Queued) -> Result<(), PoolError> {
        let executor = self.clone();
        let owned_name = name.to_string();
        self.inner.pool.queue_work(move || {
            if task.generation.is_cancelled() {
                warn!(connection = %owned_name, "dropping task from a cancelled generation");
                drop(task);
            } else {
                (task.run)();
            }
            executor.complete(&owned_name, epoch);
        })
    }

    /// Hand the lane's next task to the pool, or clear its running flag.
    fn complete(&self, name: &str, epoch: u64) {
        let mut lanes = lock(&self.inner.lanes);
        if lanes.epoch != epoch {
            return;
        }
        loop {
            let Some(lane) = lanes.map.get_mut(name) else {
                return;
            };
            let Some(next) = lane.queue.pop_front() else {
                lanes.map.remove(name);
                return;
            };
            match self.dispatch(name, epoch, next) {
                Ok(()) => return,
                Err(err) => {
                    debug!(connection = %name, error = %err, "could not dispatch next task");
                }
            }
        }
    }
}
