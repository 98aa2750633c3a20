use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

#[derive(Debug)]
struct Inner {
    flag: AtomicBool,
    // Dropped on cancel, which disconnects `done`.
    wake: Mutex<Option<Sender<()>>>,
    done: Receiver<()>,
}

/// Cooperative cancellation shared by a group of loops.
///
/// Blocking loops select on [`done`](Self::done); it becomes ready (as a
/// disconnected channel) once the token is cancelled.
#[derive(Debug, Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(0);
        Self {
            inner: Arc::new(Inner {
                flag: AtomicBool::new(false),
                wake: Mutex::new(Some(tx)),
                done: rx,
            }),
        }
    }

    /// Idempotent.
    pub fn cancel(&self) {
        if !self.inner.flag.swap(true, Ordering::SeqCst) {
            self.inner.wake.lock().take();
            log::debug!("cancellation requested");
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.flag.load(Ordering::SeqCst)
    }

    /// Receiver that never yields a message and disconnects on cancel.
    #[inline]
    pub fn done(&self) -> &Receiver<()> {
        &self.inner.done
    }

    /// Blocks until the token is cancelled.
    pub fn wait(&self) {
        let _ = self.inner.done.recv();
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
