use std::sync::Arc;

use state::InitCell;

use crate::error::{Result, RuntimeError};

/// Write-once fault slot shared across execution contexts.
///
/// The first `set` wins; later errors are dropped. Reads never lock.
/// Clones share the same slot.
#[derive(Clone)]
pub struct FaultLatch {
    slot: Arc<InitCell<RuntimeError>>,
}

impl FaultLatch {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(InitCell::new()),
        }
    }

    /// Latches `err` if no fault has been recorded yet.
    ///
    /// Returns true when this call recorded the fault.
    pub fn set(&self, err: RuntimeError) -> bool {
        let first = self.slot.set(err);
        if first {
            if let Some(err) = self.slot.try_get() {
                log::error!("runtime fault latched: {err}");
            }
        }
        first
    }

    /// Returns the latched fault, if any.
    pub fn get(&self) -> Option<&RuntimeError> {
        self.slot.try_get()
    }

    pub fn is_set(&self) -> bool {
        self.slot.try_get().is_some()
    }

    /// Returns `Err` with the latched fault, `Ok(())` otherwise.
    #[inline]
    pub fn check(&self) -> Result<()> {
        match self.slot.try_get() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl Default for FaultLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FaultLatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaultLatch")
            .field("fault", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fault(msg: &'static str) -> RuntimeError {
        RuntimeError::Update(Arc::new(anyhow::anyhow!(msg)))
    }

    #[test]
    fn empty_latch_checks_ok() {
        let latch = FaultLatch::new();
        assert!(!latch.is_set());
        assert!(latch.check().is_ok());
    }

    #[test]
    fn first_writer_wins() {
        let latch = FaultLatch::new();
        let first = fault("first");

        assert!(latch.set(first.clone()));
        assert!(!latch.set(fault("second")));

        let err = latch.check().unwrap_err();
        assert!(err.same_fault(&first));
    }

    #[test]
    fn clones_share_the_slot() {
        let latch = FaultLatch::new();
        let other = latch.clone();
        other.set(fault("from clone"));
        assert!(latch.is_set());
    }

    #[test]
    fn concurrent_writers_record_exactly_one() {
        let latch = FaultLatch::new();
        let winners: usize = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let latch = latch.clone();
                    s.spawn(move || latch.set(fault("race")) as usize)
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });
        assert_eq!(winners, 1);
    }
}
