mod env;
mod error;
mod pool;

pub use env::{DefaultEnv, Env};
pub use error::Error;
pub use pool::{Task, ThreadPool};

/// What callers need from a worker pool: somewhere to put work, and a way to
/// ask about its threads.
pub trait ThreadPoolInterface: Send + Sync {
    fn schedule(&self, task: Task);

    fn num_threads(&self) -> usize;

    /// Index in `0..num_threads()` of the calling thread, or `None` when the
    /// caller is not one of this pool's workers.
    fn current_thread_id(&self) -> Option<usize>;
}
