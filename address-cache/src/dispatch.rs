use crate::error::ProcessError;
use std::future::Future;
use tokio::runtime::Handle;

/// Starts work the caller never waits for.
///
/// Detached tasks are not tracked, joined or bounded: every call spawns a new
/// task on the runtime that was current when the dispatcher was created.
/// Whatever the task produces is dropped, so anything the caller must learn
/// about has to be reported from inside the task.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    runtime: Handle,
}

impl Dispatcher {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Dispatcher for the runtime the caller is running on
    pub fn current() -> Result<Self, ProcessError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| ProcessError::NoRuntime)
    }

    pub fn detach<F>(&self, task: F)
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        // the JoinHandle is dropped right away, which detaches the task
        drop(self.runtime.spawn(task));
    }
}
