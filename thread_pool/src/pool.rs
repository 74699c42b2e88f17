use std::{
    cell::Cell,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, PoisonError,
    },
    thread::{self, JoinHandle},
};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{Env, Error, ThreadPoolInterface};

pub type Task = Box<dyn FnOnce() + Send + 'static>;

static NEXT_POOL_ID: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    // (pool id, worker index) of the pool that owns this thread.
    static CURRENT_WORKER: Cell<Option<(usize, usize)>> = const { Cell::new(None) };
}

/// Fixed-size pool of named worker threads fed from a shared queue.
///
/// Dropping the pool stops accepting work, waits until the queue is drained
/// and joins every worker.
pub struct ThreadPool {
    id: usize,
    name: String,
    sender: Option<UnboundedSender<Task>>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    pub fn new(env: &dyn Env, name: &str, num_threads: usize) -> Result<Self, Error> {
        if num_threads == 0 {
            return Err(Error::NoThreads { name: name.into() });
        }

        let id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel::<Task>();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..num_threads)
            .map(|index| {
                let receiver = Arc::clone(&receiver);
                env.start_thread(
                    format!("{name}/{index}"),
                    Box::new(move || run_worker(id, index, &receiver)),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("Started thread pool {:?} with {} threads", name, num_threads);
        Ok(Self {
            id,
            name: name.into(),
            sender: Some(sender),
            workers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn run_worker(pool_id: usize, index: usize, receiver: &Mutex<UnboundedReceiver<Task>>) {
    CURRENT_WORKER.with(|worker| worker.set(Some((pool_id, index))));
    loop {
        let task = receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .blocking_recv();
        let Some(task) = task else {
            break;
        };
        // A panicking task must not take the worker down with it.
        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            log::warn!("Task panicked on worker {index} of thread pool #{pool_id}");
        }
    }
}

impl ThreadPoolInterface for ThreadPool {
    fn schedule(&self, task: Task) {
        let Some(sender) = &self.sender else {
            return;
        };
        if sender.send(task).is_err() {
            log::error!("Thread pool {:?} has no live workers, dropping task", self.name);
        }
    }

    fn num_threads(&self) -> usize {
        self.workers.len()
    }

    fn current_thread_id(&self) -> Option<usize> {
        CURRENT_WORKER.with(|worker| match worker.get() {
            Some((pool_id, index)) if pool_id == self.id => Some(index),
            _ => None,
        })
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        // Closing the channel lets workers exit once the queue is empty.
        self.sender.take();
        let current = thread::current().id();
        for worker in self.workers.drain(..) {
            // The last handle to a pool can be released by one of its own tasks.
            if worker.thread().id() == current {
                continue;
            }
            if worker.join().is_err() {
                log::warn!("A worker of thread pool {:?} panicked", self.name);
            }
        }
        log::debug!("Stopped thread pool {:?}", self.name);
    }
}

impl fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("name", &self.name)
            .field("num_threads", &self.workers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Arc,
    };

    use assert_matches::assert_matches;

    use super::ThreadPool;
    use crate::{DefaultEnv, Error, ThreadPoolInterface};

    #[test]
    fn rejects_zero_threads() {
        let result = ThreadPool::new(&DefaultEnv, "empty", 0);
        assert_matches!(result, Err(Error::NoThreads { name }) if name == "empty");
    }

    #[test]
    fn drop_drains_queued_tasks() {
        let executed = Arc::new(AtomicUsize::new(0));
        {
            let pool = ThreadPool::new(&DefaultEnv, "drain", 2).unwrap();
            for _ in 0..100 {
                let executed = Arc::clone(&executed);
                pool.schedule(Box::new(move || {
                    executed.fetch_add(1, Ordering::SeqCst);
                }));
            }
        }
        assert_eq!(executed.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn current_thread_id_is_scoped_to_pool() {
        let pool = Arc::new(ThreadPool::new(&DefaultEnv, "ids", 3).unwrap());
        let other = ThreadPool::new(&DefaultEnv, "other", 1).unwrap();
        assert_eq!(pool.num_threads(), 3);
        assert_eq!(pool.current_thread_id(), None);

        let (sender, receiver) = mpsc::channel();
        let observed = Arc::clone(&pool);
        other.schedule(Box::new(move || {
            sender.send(observed.current_thread_id()).unwrap();
        }));
        assert_eq!(receiver.recv().unwrap(), None);

        let (sender, receiver) = mpsc::channel();
        for _ in 0..10 {
            let sender = sender.clone();
            let observed = Arc::clone(&pool);
            pool.schedule(Box::new(move || {
                let name = std::thread::current().name().map(String::from);
                sender.send((observed.current_thread_id(), name)).unwrap();
            }));
        }
        drop(sender);
        let observed = receiver.iter().collect::<Vec<_>>();
        assert_eq!(observed.len(), 10);
        for (id, name) in observed {
            let id = id.expect("task ran on a worker of the pool");
            assert!(id < 3);
            assert_eq!(name, Some(format!("ids/{id}")));
        }
    }

    #[test]
    fn worker_survives_panicking_task() {
        let executed = Arc::new(AtomicUsize::new(0));
        {
            let pool = ThreadPool::new(&DefaultEnv, "panics", 1).unwrap();
            pool.schedule(Box::new(|| panic!("task failed")));
            for _ in 0..10 {
                let executed = Arc::clone(&executed);
                pool.schedule(Box::new(move || {
                    executed.fetch_add(1, Ordering::SeqCst);
                }));
            }
            assert_eq!(pool.num_threads(), 1);
        }
        assert_eq!(executed.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn debug_shows_name_and_size() {
        let pool = ThreadPool::new(&DefaultEnv, "debug", 1).unwrap();
        assert_eq!(
            format!("{pool:?}"),
            "ThreadPool { name: \"debug\", num_threads: 1 }"
        );
        assert_eq!(pool.name(), "debug");
    }
}
