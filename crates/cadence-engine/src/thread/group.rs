use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use super::CancelToken;
use crate::error::{Result, RuntimeError};

/// Named OS threads that live and die together.
///
/// The first task to finish, for any reason, cancels the group's token. The
/// group's result is the first error any task reported. A panicking task is
/// re-raised on the joining thread once every task has been joined.
#[derive(Debug)]
pub struct TaskGroup {
    cancel: CancelToken,
    first_error: Arc<Mutex<Option<RuntimeError>>>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl TaskGroup {
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            cancel,
            first_error: Arc::default(),
            tasks: Vec::new(),
        }
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn spawn<F>(&mut self, name: &'static str, task: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        let first_error = self.first_error.clone();

        let handle = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(task));
                match outcome {
                    Ok(Ok(())) => log::debug!("{name} task finished"),
                    Ok(Err(err)) => {
                        log::debug!("{name} task failed: {err}");
                        first_error.lock().get_or_insert(err);
                    }
                    Err(payload) => {
                        log::error!("{name} task panicked");
                        cancel.cancel();
                        panic::resume_unwind(payload);
                    }
                }
                cancel.cancel();
            })
            .map_err(|source| RuntimeError::Spawn {
                name,
                source: Arc::new(source),
            })?;

        self.tasks.push((name, handle));
        Ok(())
    }

    /// Waits for every task, then reports the first error.
    pub fn join(self) -> Result<()> {
        let mut panicked = None;
        for (name, handle) in self.tasks {
            if let Err(payload) = handle.join() {
                log::debug!("joined panicked {name} task");
                panicked.get_or_insert(payload);
            }
        }
        if let Some(payload) = panicked {
            panic::resume_unwind(payload);
        }

        match self.first_error.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
