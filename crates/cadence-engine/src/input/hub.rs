use std::sync::Arc;

use parking_lot::Mutex;

use super::deltas::InputDeltas;
use super::snapshot::InputSnapshot;
use super::state::InputState;
use super::types::InputEvent;

#[derive(Debug, Default)]
struct HubInner {
    pending: Vec<InputEvent>,
    state: InputState,
    deltas: InputDeltas,
}

/// Input exchange between the platform and the frame loop.
///
/// The platform pushes events from the main thread at any time. The frame loop
/// takes one snapshot at the top of each frame; events pushed after that are
/// held back until the next frame.
#[derive(Debug, Clone, Default)]
pub struct InputHub {
    inner: Arc<Mutex<HubInner>>,
}

impl InputHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, ev: InputEvent) {
        self.inner.lock().pending.push(ev);
    }

    pub fn extend<I>(&self, events: I)
    where
        I: IntoIterator<Item = InputEvent>,
    {
        self.inner.lock().pending.extend(events);
    }

    /// Applies queued events and returns the frame's snapshot.
    ///
    /// The snapshot's `cursor` is left unmapped; the frame loop fills it in.
    pub fn begin_frame(&self) -> InputSnapshot {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        for ev in inner.pending.drain(..) {
            inner.state.apply(&mut inner.deltas, ev);
        }

        InputSnapshot {
            state: inner.state.clone(),
            deltas: inner.deltas.clone(),
            cursor: None,
        }
    }

    /// Drops transitions already observed by a logical update.
    pub fn reset_for_tick(&self) {
        self.inner.lock().deltas.clear();
    }
}
