use crate::coords::ScaleOffsets;
use crate::input::InputSnapshot;
use crate::target::{RenderTarget, TargetKind};

/// Host application contract.
///
/// The runtime decides when and how often these run; the game decides what
/// they do. All calls happen on the game-logic thread.
pub trait Game: Send + 'static {
    type Target: RenderTarget;

    /// Returns the logical (offscreen) size for the given outside size.
    ///
    /// Both dimensions must be strictly positive. Anything else is a bug in
    /// the game and aborts the frame loop with a panic.
    fn layout(&mut self, outside_width: f64, outside_height: f64) -> (f64, f64);

    /// Advances the game by one logical tick.
    fn update(&mut self, input: &InputSnapshot) -> anyhow::Result<()>;

    /// Renders into the offscreen target.
    ///
    /// Targets report writes through the notifier the runtime installed; a
    /// frame where nothing was written may skip compositing.
    fn draw_offscreen(&mut self, offscreen: &mut Self::Target) -> anyhow::Result<()>;

    /// Composites `offscreen` onto `screen` using `transform`.
    fn draw_final_screen(
        &mut self,
        screen: &mut Self::Target,
        offscreen: &Self::Target,
        transform: ScaleOffsets,
    );

    fn new_offscreen_target(&mut self, width: u32, height: u32, kind: TargetKind) -> Self::Target;

    fn new_screen_target(&mut self, width: u32, height: u32) -> Self::Target;
}
