use std::sync::Arc;
use std::thread::{self, ThreadId};

use crossbeam_channel::{Receiver, Sender, select};
use parking_lot::Mutex;

use super::CancelToken;
use crate::error::{Result, RuntimeError};
use crate::fault::FaultLatch;

/// Unit of work submitted to an [`ExecutionContext`].
///
/// A job that fails with a [`RuntimeError`] (propagated with `?`) keeps that
/// error; any other error is reported as [`RuntimeError::Job`].
pub type Job = Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>;

/// Somewhere jobs can run: a dedicated OS thread or the caller itself.
pub trait ExecutionContext: Send + Sync {
    fn name(&self) -> &'static str;

    /// Runs `job` on this context and blocks until it has finished.
    fn run(&self, job: Job) -> Result<()>;
}

pub type ContextHandle = Arc<dyn ExecutionContext>;

/// Runs `f` on `ctx` and hands its value back to the caller.
pub fn call_on<R, F>(ctx: &dyn ExecutionContext, f: F) -> Result<R>
where
    R: Send + 'static,
    F: FnOnce() -> anyhow::Result<R> + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);
    ctx.run(Box::new(move || -> anyhow::Result<()> {
        let value = f()?;
        let _ = tx.send(value);
        Ok(())
    }))?;
    rx.try_recv().map_err(|_| RuntimeError::ContextClosed(ctx.name()))
}

struct Envelope {
    job: Job,
    reply: Sender<Result<()>>,
}

/// Execution context backed by whichever OS thread calls [`run_loop`].
///
/// The loop serves jobs until the cancel token fires or a job fails. A failed
/// job latches its error before the submitter is told, so every context
/// observing the failure sees the same fault.
///
/// [`run_loop`]: OsThread::run_loop
pub struct OsThread {
    name: &'static str,
    jobs: Sender<Envelope>,
    queue: Receiver<Envelope>,
    fault: FaultLatch,
    cancel: CancelToken,
    owner: Mutex<Option<ThreadId>>,
}

impl OsThread {
    pub fn new(name: &'static str, fault: FaultLatch, cancel: CancelToken) -> Self {
        let (jobs, queue) = crossbeam_channel::unbounded();
        Self {
            name,
            jobs,
            queue,
            fault,
            cancel,
            owner: Mutex::new(None),
        }
    }

    /// Serves jobs on the calling thread until cancelled.
    ///
    /// Returns the error of the first failing job.
    pub fn run_loop(&self) -> Result<()> {
        *self.owner.lock() = Some(thread::current().id());
        log::info!("{} thread loop started", self.name);

        let result = self.serve();

        *self.owner.lock() = None;
        match &result {
            Ok(()) => log::info!("{} thread loop stopped", self.name),
            Err(err) => log::info!("{} thread loop stopped: {err}", self.name),
        }
        result
    }

    fn serve(&self) -> Result<()> {
        loop {
            select! {
                recv(self.queue) -> msg => {
                    // `self` holds a sender, so the queue never disconnects.
                    let Ok(Envelope { job, reply }) = msg else {
                        return Ok(());
                    };
                    if let Err(err) = job() {
                        let err = RuntimeError::job(self.name, err);
                        self.fault.set(err.clone());
                        let _ = reply.send(Err(err.clone()));
                        return Err(err);
                    }
                    let _ = reply.send(Ok(()));
                }
                recv(self.cancel.done()) -> _ => return Ok(()),
            }
        }
    }

    fn on_loop_thread(&self) -> bool {
        *self.owner.lock() == Some(thread::current().id())
    }
}

impl ExecutionContext for OsThread {
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(&self, job: Job) -> Result<()> {
        // Re-entrant submission from a job already on this thread.
        if self.on_loop_thread() {
            return job().map_err(|err| RuntimeError::job(self.name, err));
        }
        if self.cancel.is_cancelled() {
            return Err(RuntimeError::ContextClosed(self.name));
        }

        let (reply, result) = crossbeam_channel::bounded(1);
        self.jobs
            .send(Envelope { job, reply })
            .map_err(|_| RuntimeError::ContextClosed(self.name))?;

        select! {
            recv(result) -> r => r.unwrap_or(Err(RuntimeError::ContextClosed(self.name))),
            recv(self.cancel.done()) -> _ => {
                // The reply may have raced the cancellation.
                result
                    .try_recv()
                    .unwrap_or(Err(RuntimeError::ContextClosed(self.name)))
            }
        }
    }
}

impl std::fmt::Debug for OsThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsThread")
            .field("name", &self.name)
            .field("pending", &self.queue.len())
            .finish()
    }
}

/// Execution context that runs jobs directly on the caller.
///
/// Used when everything shares one thread.
#[derive(Debug, Clone, Copy)]
pub struct InlineThread {
    name: &'static str,
}

impl InlineThread {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl ExecutionContext for InlineThread {
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(&self, job: Job) -> Result<()> {
        job().map_err(|err| RuntimeError::job(self.name, err))
    }
}
