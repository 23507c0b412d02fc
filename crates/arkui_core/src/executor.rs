//! Task posting
//!
//! Components never spawn threads directly. They post closures to a [`TaskExecutor`],
//! tagged with the thread class they must run on. Production code uses
//! [`TokioTaskExecutor`]; tests and headless tools use [`ManualTaskExecutor`], which
//! queues everything and runs it on demand against a virtual clock.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

/// A unit of posted work
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Thread class a task must run on
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum TaskType {
    /// The UI thread (layout, paint, component state)
    Ui,
    /// Any background worker; must not touch UI state directly
    Background,
}

/// Posts work onto UI or background threads
pub trait TaskExecutor: Send + Sync {
    /// Run `task` as soon as possible on a thread of class `task_type`
    fn post(&self, task_type: TaskType, name: &'static str, task: Task);

    /// Run `task` once after `delay`
    fn post_delayed(&self, task_type: TaskType, name: &'static str, delay: Duration, task: Task);
}

#[cfg(feature = "tokio-executor")]
pub use tokio_impl::TokioTaskExecutor;

#[cfg(feature = "tokio-executor")]
mod tokio_impl {
    use super::{Task, TaskExecutor, TaskType};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::runtime::{Builder, Handle, Runtime};

    /// Executor backed by a tokio runtime
    ///
    /// Background tasks go through `spawn_blocking` since resource lookups are synchronous.
    /// UI tasks are spawned onto the runtime as well; embedders with a real UI loop
    /// provide their own [`TaskExecutor`].
    pub struct TokioTaskExecutor {
        // Kept alive when the executor owns its runtime.
        _runtime: Option<Arc<Runtime>>,
        handle: Handle,
    }

    impl TokioTaskExecutor {
        /// Create an executor with its own small multi-threaded runtime
        pub fn new() -> std::io::Result<Self> {
            let runtime = Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("arkui-background")
                .enable_time()
                .build()?;
            let handle = runtime.handle().clone();
            Ok(Self {
                _runtime: Some(Arc::new(runtime)),
                handle,
            })
        }

        /// Use an existing runtime
        pub fn from_handle(handle: Handle) -> Self {
            Self {
                _runtime: None,
                handle,
            }
        }

        /// Use the runtime of the calling context, if any
        pub fn current() -> Option<Self> {
            Handle::try_current().ok().map(Self::from_handle)
        }
    }

    impl TaskExecutor for TokioTaskExecutor {
        fn post(&self, task_type: TaskType, name: &'static str, task: Task) {
            tracing::trace!("post {:?} task `{}`", task_type, name);
            match task_type {
                TaskType::Background => {
                    self.handle.spawn_blocking(task);
                }
                TaskType::Ui => {
                    self.handle.spawn(async move { task() });
                }
            }
        }

        fn post_delayed(&self, task_type: TaskType, name: &'static str, delay: Duration, task: Task) {
            tracing::trace!("post {:?} task `{}` after {:?}", task_type, name, delay);
            self.handle.spawn(async move {
                tokio::time::sleep(delay).await;
                task();
            });
        }
    }
}

struct DelayedTask {
    due: Duration,
    seq: u64,
    name: &'static str,
    task: Task,
}

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    seq: u64,
    immediate: VecDeque<(TaskType, &'static str, Task)>,
    delayed: Vec<DelayedTask>,
}

/// Deterministic executor driven by the caller
///
/// Nothing runs until [`run_pending`](Self::run_pending) or [`advance`](Self::advance) is
/// called. Delayed tasks are ordered by due time on a virtual clock that only moves
/// when `advance` is called.
#[derive(Default)]
pub struct ManualTaskExecutor {
    queue: Mutex<ManualQueue>,
}

impl ManualTaskExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued immediate tasks
    pub fn pending(&self) -> usize {
        self.lock().immediate.len()
    }

    /// Number of queued delayed tasks
    pub fn pending_delayed(&self) -> usize {
        self.lock().delayed.len()
    }

    /// Delay until the earliest delayed task is due, relative to the virtual clock
    pub fn next_delay(&self) -> Option<Duration> {
        let queue = self.lock();
        queue
            .delayed
            .iter()
            .map(|t| t.due.saturating_sub(queue.now))
            .min()
    }

    /// Run queued immediate tasks, including ones posted while running. Returns the count.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.lock().immediate.pop_front();
            let Some((_, name, task)) = next else {
                return ran;
            };
            tracing::trace!("manual executor running `{}`", name);
            task();
            ran += 1;
        }
    }

    /// Move the virtual clock forward, running every delayed task that becomes due
    /// (in due order) and any immediate tasks they post. Returns the count.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().now + by;
        let mut ran = self.run_pending();
        loop {
            let next = {
                let mut queue = self.lock();
                let due_index = queue
                    .delayed
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                match due_index {
                    Some(i) => {
                        let task = queue.delayed.swap_remove(i);
                        queue.now = task.due;
                        Some(task)
                    }
                    None => {
                        queue.now = target;
                        None
                    }
                }
            };
            let Some(delayed) = next else {
                return ran;
            };
            tracing::trace!("manual executor running delayed `{}`", delayed.name);
            (delayed.task)();
            ran += 1 + self.run_pending();
        }
    }

    fn lock(&self) -> MutexGuard<'_, ManualQueue> {
        self.queue.lock()
    }
}

impl TaskExecutor for ManualTaskExecutor {
    fn post(&self, task_type: TaskType, name: &'static str, task: Task) {
        self.lock().immediate.push_back((task_type, name, task));
    }

    fn post_delayed(&self, _task_type: TaskType, name: &'static str, delay: Duration, task: Task) {
        let mut queue = self.lock();
        let due = queue.now + delay;
        queue.seq += 1;
        let seq = queue.seq;
        queue.delayed.push(DelayedTask {
            due,
            seq,
            name,
            task,
        });
    }
}
