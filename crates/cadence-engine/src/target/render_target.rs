use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Persistence policy of a render target.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TargetKind {
    /// The physical screen surface. A sink, never a rendering source.
    Screen,
    /// Offscreen target whose content is cleared every frame.
    Volatile,
    /// Offscreen target whose content survives across frames.
    Persistent,
}

impl TargetKind {
    /// Offscreen kind matching the "clear every frame" setting.
    #[inline]
    pub fn offscreen(cleared_every_frame: bool) -> Self {
        if cleared_every_frame {
            TargetKind::Volatile
        } else {
            TargetKind::Persistent
        }
    }
}

/// Single-slot write observer attached to an offscreen target.
///
/// The target calls [`notify`](Self::notify) whenever something is drawn into
/// it. The owner resets it at the start of every draw pass and reads it after.
#[derive(Debug, Clone, Default)]
pub struct WriteNotifier(Arc<AtomicBool>);

impl WriteNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn notify(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// GPU-backed surface created by the game.
///
/// Implementations wrap whatever the graphics layer uses for images. Sizes are
/// whole pixels and never zero.
pub trait RenderTarget: Send {
    /// `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    fn kind(&self) -> TargetKind;

    fn clear(&mut self);

    /// Submits any pending draw commands batched for this target.
    fn flush(&mut self);

    /// Installs the write observer, replacing any previous one.
    fn observe_writes(&mut self, notifier: WriteNotifier);

    /// Releases the underlying resources.
    fn dispose(self)
    where
        Self: Sized;
}
