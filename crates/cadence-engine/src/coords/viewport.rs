/// Surface size in pixels.
///
/// Used for both the logical (offscreen) surface and the physical (screen)
/// surface; the owner decides which pixel space the numbers are in.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Whole-pixel size large enough to hold this viewport.
    #[inline]
    pub fn ceil_pixels(self) -> (u32, u32) {
        (self.width.ceil() as u32, self.height.ceil() as u32)
    }
}
