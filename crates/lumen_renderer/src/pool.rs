//! Fixed-size worker pool.
//!
//! Each worker owns a single assignment slot. New tasks go straight to an
//! idle worker when there is one and to a FIFO pending queue otherwise. A
//! worker that finishes takes the next pending task itself, or puts itself
//! back on the idle queue. When the last worker goes idle, everyone blocked
//! in [`ThreadPool::wait_idle`] wakes up.
//!
//! Locks are always taken in the order idle, pending, worker slot.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use thiserror::Error;

/// Unique id handed out for every accepted task.
pub type TaskId = u64;

/// Work executed by pool threads.
pub trait TaskHandler: Send + Sync + 'static {
    type Task: Send + 'static;

    /// Run one task. Returning false marks the task as failed; it is logged
    /// and the worker carries on.
    fn handle(&self, task: Self::Task) -> bool;
}

/// Lifecycle of a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    /// Holds a task it has not started yet
    Assigned,
    Running,
    Stopped,
}

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Thread pool needs at least one worker")]
    EmptyPool,
}

/// Outcome of [`ThreadPool::add_tasks`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// `(worker, task)` pairs handed directly to idle workers
    pub assigned: Vec<(usize, TaskId)>,
    /// Tasks appended to the pending queue
    pub queued: Vec<TaskId>,
    /// Tasks dropped because the pool was shutting down
    pub rejected: usize,
}

impl Dispatch {
    pub fn accepted(&self) -> usize {
        self.assigned.len() + self.queued.len()
    }
}

struct Assignment<T> {
    id: TaskId,
    task: T,
}

struct Slot<T> {
    assignment: Option<Assignment<T>>,
    state: WorkerState,
    stop: bool,
}

struct Worker<T> {
    slot: Mutex<Slot<T>>,
    wake: Condvar,
}

struct Shared<H: TaskHandler> {
    name: String,
    handler: H,
    workers: Vec<Worker<H::Task>>,
    idle: Mutex<VecDeque<usize>>,
    all_idle: Condvar,
    pending: Mutex<VecDeque<Assignment<H::Task>>>,
    active: AtomicBool,
    next_task_id: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<H: TaskHandler> Shared<H> {
    /// Put a task into a worker's slot and wake it.
    fn assign(&self, worker: usize, assignment: Assignment<H::Task>) {
        let mut slot = lock(&self.workers[worker].slot);
        slot.assignment = Some(assignment);
        slot.state = WorkerState::Assigned;
        self.workers[worker].wake.notify_one();
    }

    fn run_worker(&self, index: usize) {
        let worker = &self.workers[index];
        log::debug!("{}_{} started", self.name, index);

        loop {
            let assignment = {
                let mut slot = worker
                    .wake
                    .wait_while(lock(&worker.slot), |s| !s.stop && s.assignment.is_none())
                    .unwrap_or_else(PoisonError::into_inner);

                if slot.stop {
                    slot.state = WorkerState::Stopped;
                    break;
                }
                let Some(assignment) = slot.assignment.take() else {
                    continue;
                };
                slot.state = WorkerState::Running;
                assignment
            };

            let id = assignment.id;
            match catch_unwind(AssertUnwindSafe(|| self.handler.handle(assignment.task))) {
                Ok(true) => {}
                Ok(false) => log::error!("{}_{}: task {} failed", self.name, index, id),
                Err(_) => log::error!("{}_{}: task {} panicked", self.name, index, id),
            }

            self.complete(index);
        }

        log::debug!("{}_{} stopped", self.name, index);
    }

    /// Hand the finished worker its next task, or return it to the idle queue.
    fn complete(&self, index: usize) {
        let mut idle = lock(&self.idle);
        let next = lock(&self.pending).pop_front();

        let mut slot = lock(&self.workers[index].slot);
        match next {
            Some(assignment) => {
                slot.assignment = Some(assignment);
                slot.state = WorkerState::Assigned;
            }
            None => {
                slot.state = WorkerState::Idle;
                drop(slot);
                idle.push_back(index);
                if idle.len() == self.workers.len() {
                    self.all_idle.notify_all();
                }
            }
        }
    }
}

/// A fixed set of named worker threads running one [`TaskHandler`].
pub struct ThreadPool<H: TaskHandler> {
    shared: Arc<Shared<H>>,
    threads: Vec<JoinHandle<()>>,
}

impl<H: TaskHandler> ThreadPool<H> {
    /// Spawn `size` workers named `{name}_{index}`.
    pub fn new(name: &str, size: usize, handler: H) -> Result<Self, PoolError> {
        if size == 0 {
            return Err(PoolError::EmptyPool);
        }

        let workers = (0..size)
            .map(|_| Worker {
                slot: Mutex::new(Slot {
                    assignment: None,
                    state: WorkerState::Idle,
                    stop: false,
                }),
                wake: Condvar::new(),
            })
            .collect();

        let shared = Arc::new(Shared {
            name: name.to_string(),
            handler,
            workers,
            idle: Mutex::new((0..size).collect()),
            all_idle: Condvar::new(),
            pending: Mutex::new(VecDeque::new()),
            active: AtomicBool::new(true),
            next_task_id: AtomicU64::new(0),
        });

        let mut pool = Self {
            shared,
            threads: Vec::with_capacity(size),
        };

        for index in 0..size {
            let shared = Arc::clone(&pool.shared);
            let spawned = thread::Builder::new()
                .name(format!("{}_{}", name, index))
                .spawn(move || shared.run_worker(index));

            match spawned {
                Ok(handle) => pool.threads.push(handle),
                Err(e) => {
                    // Joins whatever did start
                    pool.shutdown();
                    return Err(PoolError::Spawn(e));
                }
            }
        }

        log::info!("Thread pool '{}' started with {} workers", name, size);
        Ok(pool)
    }

    /// Submit tasks in order.
    ///
    /// Idle workers are filled first, one task each; the rest are queued.
    /// A pool that is shutting down rejects everything.
    pub fn add_tasks<I>(&self, tasks: I) -> Dispatch
    where
        I: IntoIterator<Item = H::Task>,
    {
        let mut dispatch = Dispatch::default();

        if !self.is_active() {
            let rejected = tasks.into_iter().count();
            log::error!(
                "Thread pool '{}' is not active, rejecting {} tasks",
                self.shared.name,
                rejected
            );
            dispatch.rejected = rejected;
            return dispatch;
        }

        let mut idle = lock(&self.shared.idle);
        let mut pending = lock(&self.shared.pending);

        for task in tasks {
            let id = self.shared.next_task_id.fetch_add(1, Ordering::Relaxed);
            let assignment = Assignment { id, task };

            match idle.pop_front() {
                Some(worker) => {
                    self.shared.assign(worker, assignment);
                    dispatch.assigned.push((worker, id));
                }
                None => {
                    pending.push_back(assignment);
                    dispatch.queued.push(id);
                }
            }
        }

        log::debug!(
            "Thread pool '{}': {} tasks assigned, {} queued",
            self.shared.name,
            dispatch.assigned.len(),
            dispatch.queued.len()
        );
        dispatch
    }

    /// Block until every worker is idle and nothing is pending.
    pub fn wait_idle(&self) {
        let size = self.size();
        let _idle = self
            .shared
            .all_idle
            .wait_while(lock(&self.shared.idle), |idle| {
                idle.len() < size && self.is_active()
            })
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Stop accepting work, drop pending tasks and join every worker.
    ///
    /// Tasks already running finish first. Calling this twice is harmless.
    pub fn shutdown(&mut self) {
        if !self.shared.active.swap(false, Ordering::SeqCst) && self.threads.is_empty() {
            return;
        }

        let dropped = {
            let mut pending = lock(&self.shared.pending);
            let count = pending.len();
            pending.clear();
            count
        };
        if dropped > 0 {
            log::warn!(
                "Thread pool '{}' shutting down with {} pending tasks",
                self.shared.name,
                dropped
            );
        }

        for worker in &self.shared.workers {
            let mut slot = lock(&worker.slot);
            slot.stop = true;
            worker.wake.notify_one();
        }

        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                log::error!("Thread pool '{}': worker exited abnormally", self.shared.name);
            }
        }

        // Wake anyone still waiting for the pool to drain
        self.shared.all_idle.notify_all();
        log::info!("Thread pool '{}' stopped", self.shared.name);
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Number of workers.
    pub fn size(&self) -> usize {
        self.shared.workers.len()
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    pub fn idle_count(&self) -> usize {
        lock(&self.shared.idle).len()
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.shared.pending).len()
    }

    /// State of worker `index`, or `None` if there is no such worker.
    pub fn worker_state(&self, index: usize) -> Option<WorkerState> {
        self.shared
            .workers
            .get(index)
            .map(|worker| lock(&worker.slot).state)
    }

    pub fn handler(&self) -> &H {
        &self.shared.handler
    }
}

impl<H: TaskHandler> Drop for ThreadPool<H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
