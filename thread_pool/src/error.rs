use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("thread pool {name:?} needs at least one thread")]
    NoThreads { name: String },
    #[error("failed to start worker thread: {0}")]
    Spawn(#[from] io::Error),
}
