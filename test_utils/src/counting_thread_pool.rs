use std::sync::{Mutex, PoisonError};

use thread_pool::{Env, Task, ThreadPool, ThreadPoolInterface};

/// A [`ThreadPoolInterface`] that delegates to a wrapped pool and counts how
/// many tasks were scheduled through it. The count covers scheduled tasks, not
/// finished ones.
#[derive(Debug)]
pub struct CountingThreadPool<P = ThreadPool> {
    thread_pool: P,
    num_scheduled: Mutex<usize>,
}

impl CountingThreadPool<ThreadPool> {
    pub fn new(env: &dyn Env, name: &str, num_threads: usize) -> Result<Self, thread_pool::Error> {
        ThreadPool::new(env, name, num_threads).map(Self::wrap)
    }
}

impl<P> CountingThreadPool<P> {
    pub fn wrap(thread_pool: P) -> Self {
        Self {
            thread_pool,
            num_scheduled: Mutex::new(0),
        }
    }

    pub fn num_scheduled(&self) -> usize {
        *self
            .num_scheduled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn thread_pool(&self) -> &P {
        &self.thread_pool
    }
}

impl<P: ThreadPoolInterface> ThreadPoolInterface for CountingThreadPool<P> {
    fn schedule(&self, task: Task) {
        {
            let mut num_scheduled = self
                .num_scheduled
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *num_scheduled += 1;
            log::trace!("Scheduling task #{}", *num_scheduled);
        }
        self.thread_pool.schedule(task);
    }

    fn num_threads(&self) -> usize {
        self.thread_pool.num_threads()
    }

    fn current_thread_id(&self) -> Option<usize> {
        self.thread_pool.current_thread_id()
    }
}
