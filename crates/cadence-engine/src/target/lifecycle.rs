use super::{RenderTarget, TargetKind, WriteNotifier};

/// The two render targets a frame needs: the logical offscreen surface and the
/// physical screen surface.
///
/// Targets are never resized in place. When the required size or persistence
/// policy changes, the current target is disposed and only then is the
/// replacement created.
#[derive(Debug)]
pub struct TargetSlots<T> {
    offscreen: Option<T>,
    screen: Option<T>,
    dirty: WriteNotifier,
}

impl<T: RenderTarget> TargetSlots<T> {
    pub fn new() -> Self {
        Self {
            offscreen: None,
            screen: None,
            dirty: WriteNotifier::new(),
        }
    }

    /// Makes sure the screen target is `width × height`.
    ///
    /// Returns true if a target was created.
    pub fn ensure_screen<F>(&mut self, width: u32, height: u32, create: F) -> bool
    where
        F: FnOnce(u32, u32) -> T,
    {
        if matches!(&self.screen, Some(t) if t.size() == (width, height)) {
            return false;
        }
        assert_positive(width, height);

        if let Some(old) = self.screen.take() {
            log::debug!("disposing screen target {:?}", old.size());
            old.dispose();
        }
        self.screen = Some(create(width, height));
        log::debug!("created screen target {width}x{height}");
        true
    }

    /// Makes sure the offscreen target is `width × height`.
    ///
    /// A new target gets `kind`; an existing one of the right size keeps its
    /// kind (see [`ensure_offscreen_kind`](Self::ensure_offscreen_kind)).
    /// Returns true if a target was created.
    pub fn ensure_offscreen<F>(&mut self, width: u32, height: u32, kind: TargetKind, create: F) -> bool
    where
        F: FnOnce(u32, u32, TargetKind) -> T,
    {
        if matches!(&self.offscreen, Some(t) if t.size() == (width, height)) {
            return false;
        }
        self.replace_offscreen(width, height, kind, create);
        true
    }

    /// Recreates the offscreen target at its current size if its kind differs
    /// from `kind`. Returns true if a target was created.
    pub fn ensure_offscreen_kind<F>(&mut self, kind: TargetKind, create: F) -> bool
    where
        F: FnOnce(u32, u32, TargetKind) -> T,
    {
        let Some(current) = &self.offscreen else {
            return false;
        };
        if current.kind() == kind {
            return false;
        }
        let (width, height) = current.size();
        self.replace_offscreen(width, height, kind, create);
        true
    }

    pub fn offscreen(&self) -> Option<&T> {
        self.offscreen.as_ref()
    }

    pub fn offscreen_mut(&mut self) -> Option<&mut T> {
        self.offscreen.as_mut()
    }

    pub fn screen(&self) -> Option<&T> {
        self.screen.as_ref()
    }

    /// Mutable screen alongside a shared offscreen, for compositing.
    pub fn composite_pair(&mut self) -> Option<(&mut T, &T)> {
        match (&mut self.screen, &self.offscreen) {
            (Some(screen), Some(offscreen)) => Some((screen, offscreen)),
            _ => None,
        }
    }

    /// Disposes both targets. Used when the frame loop shuts down.
    pub fn dispose_all(&mut self) {
        for target in [self.offscreen.take(), self.screen.take()].into_iter().flatten() {
            target.dispose();
        }
    }

    /// Clears the "written this frame" flag.
    pub fn reset_dirty(&self) {
        self.dirty.reset();
    }

    /// Whether the offscreen target was written since the last reset.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_set()
    }

    fn replace_offscreen<F>(&mut self, width: u32, height: u32, kind: TargetKind, create: F)
    where
        F: FnOnce(u32, u32, TargetKind) -> T,
    {
        assert_positive(width, height);

        if let Some(old) = self.offscreen.take() {
            log::debug!("disposing offscreen target {:?} ({:?})", old.size(), old.kind());
            old.dispose();
        }

        let mut target = create(width, height, kind);
        target.observe_writes(self.dirty.clone());
        self.offscreen = Some(target);
        log::debug!("created offscreen target {width}x{height} ({kind:?})");
    }
}

impl<T: RenderTarget> Default for TargetSlots<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn assert_positive(width: u32, height: u32) {
    assert!(
        width > 0 && height > 0,
        "render targets must have a positive size, got {width}x{height}"
    );
}
