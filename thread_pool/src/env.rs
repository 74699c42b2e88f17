use std::{
    io,
    thread::{self, JoinHandle},
};

/// Where pools get their threads from.
pub trait Env: Send + Sync {
    fn start_thread(
        &self,
        name: String,
        f: Box<dyn FnOnce() + Send + 'static>,
    ) -> io::Result<JoinHandle<()>>;
}

/// Spawns named OS threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnv;

impl Env for DefaultEnv {
    fn start_thread(
        &self,
        name: String,
        f: Box<dyn FnOnce() + Send + 'static>,
    ) -> io::Result<JoinHandle<()>> {
        thread::Builder::new().name(name).spawn(f)
    }
}
