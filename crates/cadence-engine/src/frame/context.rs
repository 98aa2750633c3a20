use std::sync::Arc;
use std::time::Instant;

use crate::config::RuntimeSettings;
use crate::coords::{ScaleOffsets, ScreenGeometry, Viewport};
use crate::core::{FrameParams, Game, GraphicsDriver};
use crate::error::{Result, RuntimeError};
use crate::fault::FaultLatch;
use crate::input::{InputHub, InputSnapshot};
use crate::target::{RenderTarget, TargetKind, TargetSlots};
use crate::time::TickClock;

use super::skip::SkipCounter;

/// Callback run before every logical update (e.g. audio clock sync).
pub type BeforeUpdateHook = Box<dyn FnMut() -> anyhow::Result<()> + Send>;

/// Lifecycle of a [`FrameContext`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FramePhase {
    /// No layout with positive sizes has happened yet.
    Uninitialized,
    /// Targets exist; no logical update has run yet.
    Initialized,
    /// At least one logical update has run.
    Running,
}

/// Drives frames for one game.
///
/// Owns the game, both render targets and the tick clock. Lives on the
/// game-logic thread; everything shared with other threads goes through the
/// fault latch, the runtime settings and the input hub.
pub struct FrameContext<G: Game> {
    game: G,
    fault: FaultLatch,
    settings: Arc<RuntimeSettings>,
    input: InputHub,
    clock: TickClock,
    hooks: Vec<BeforeUpdateHook>,

    targets: TargetSlots<G::Target>,
    geometry: ScreenGeometry,
    device_scale_factor: f64,

    update_called: bool,
    skip: SkipCounter,
    phase: FramePhase,
}

impl<G: Game> FrameContext<G> {
    pub fn new(
        game: G,
        fault: FaultLatch,
        settings: Arc<RuntimeSettings>,
        input: InputHub,
        clock: TickClock,
    ) -> Self {
        Self {
            game,
            fault,
            settings,
            input,
            clock,
            hooks: Vec::new(),
            targets: TargetSlots::new(),
            geometry: ScreenGeometry::default(),
            device_scale_factor: 1.0,
            update_called: false,
            skip: SkipCounter::default(),
            phase: FramePhase::Uninitialized,
        }
    }

    pub fn add_before_update_hook<F>(&mut self, hook: F)
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    /// Runs one regular frame with as many updates as the tick clock owes.
    pub fn update_frame<D>(&mut self, driver: &mut D, params: FrameParams) -> Result<()>
    where
        D: GraphicsDriver + ?Sized,
    {
        self.update_frame_at(driver, params, Instant::now())
    }

    fn update_frame_at<D>(&mut self, driver: &mut D, params: FrameParams, now: Instant) -> Result<()>
    where
        D: GraphicsDriver + ?Sized,
    {
        self.clock.set_rate(self.settings.tick_rate());
        let count = self.clock.ticks_owed(now);
        self.settings
            .publish_rates(self.clock.actual_fps(), self.clock.actual_tps());
        self.advance(driver, params, count, false)
    }

    /// Runs a synchronous repaint: one update and an unconditional composite.
    ///
    /// Drivers with a double-buffered swap chain get the sequence twice so
    /// both buffers hold the new frame.
    pub fn force_update_frame<D>(&mut self, driver: &mut D, params: FrameParams) -> Result<()>
    where
        D: GraphicsDriver + ?Sized,
    {
        let passes = if driver.needs_double_forced_update() { 2 } else { 1 };
        for _ in 0..passes {
            self.advance(driver, params, 1, true)?;
        }
        Ok(())
    }

    /// Runs one frame with an explicit update count.
    ///
    /// Returns the latched fault immediately if one is set. Any error raised
    /// by this frame is offered to the latch, and the latched fault is what
    /// gets returned.
    ///
    /// # Panics
    /// If the game's layout returns a non-positive size or the device scale
    /// factor is not positive.
    pub fn advance<D>(
        &mut self,
        driver: &mut D,
        params: FrameParams,
        update_count: u32,
        force_draw: bool,
    ) -> Result<()>
    where
        D: GraphicsDriver + ?Sized,
    {
        self.fault.check()?;

        match self.advance_impl(driver, params, update_count, force_draw) {
            Ok(()) => Ok(()),
            Err(err) => {
                // Another context may have latched first; report that one.
                self.fault.set(err);
                self.fault.check()
            }
        }
    }

    fn advance_impl<D>(
        &mut self,
        driver: &mut D,
        params: FrameParams,
        update_count: u32,
        force_draw: bool,
    ) -> Result<()>
    where
        D: GraphicsDriver + ?Sized,
    {
        // One snapshot for the whole frame; later events wait for the next one.
        let mut input = self.input.begin_frame();
        input.cursor = input.state.pointer.and_then(|(x, y)| self.map_cursor(x, y));

        // Some platforms report a zero size while toggling fullscreen.
        if params.outside_width == 0.0 || params.outside_height == 0.0 {
            return Ok(());
        }

        driver.begin_frame().map_err(RuntimeError::driver)?;
        let result = self.run_frame(driver, params, update_count, force_draw, &input);
        let ended = driver.end_frame().map_err(RuntimeError::driver);
        result.and(ended)
    }

    fn run_frame<D>(
        &mut self,
        driver: &mut D,
        params: FrameParams,
        mut update_count: u32,
        force_draw: bool,
        input: &InputSnapshot,
    ) -> Result<()>
    where
        D: GraphicsDriver + ?Sized,
    {
        // Targets must exist before the first update.
        self.layout(params);

        // The first update always precedes the first draw so games can use it
        // for initialisation.
        if !self.update_called && update_count == 0 {
            update_count = 1;
        }
        log::trace!("update count per frame: {update_count}");

        for _ in 0..update_count {
            self.fault.check()?;
            for hook in &mut self.hooks {
                hook().map_err(RuntimeError::hook)?;
            }
            self.game.update(input).map_err(RuntimeError::update)?;

            if !self.update_called {
                self.update_called = true;
                self.phase = FramePhase::Running;
            }
            // Faults raised asynchronously while the update ran.
            self.fault.check()?;
        }
        if update_count > 0 {
            self.input.reset_for_tick();
        }

        self.draw(driver, force_draw)
    }

    fn layout(&mut self, params: FrameParams) {
        let dsf = params.device_scale_factor;
        assert!(
            dsf > 0.0 && dsf.is_finite(),
            "device scale factor must be positive, got {dsf}"
        );

        let (width, height) = self.game.layout(params.outside_width, params.outside_height);
        assert!(
            width > 0.0 && height > 0.0,
            "layout must return positive numbers, got {width}x{height}"
        );

        self.geometry = ScreenGeometry::new(
            Viewport::new(params.outside_width * dsf, params.outside_height * dsf),
            Viewport::new(width, height),
        );
        self.device_scale_factor = dsf;

        let (sw, sh) = self.geometry.screen.ceil_pixels();
        let (ow, oh) = self.geometry.offscreen.ceil_pixels();
        let kind = TargetKind::offscreen(self.settings.is_screen_cleared_every_frame());

        let game = &mut self.game;
        self.targets.ensure_screen(sw, sh, |w, h| game.new_screen_target(w, h));
        self.targets
            .ensure_offscreen(ow, oh, kind, |w, h, k| game.new_offscreen_target(w, h, k));

        if self.phase == FramePhase::Uninitialized {
            self.phase = FramePhase::Initialized;
            log::debug!("frame context initialized: screen {sw}x{sh}, offscreen {ow}x{oh}");
        }
    }

    fn draw<D>(&mut self, driver: &mut D, force_draw: bool) -> Result<()>
    where
        D: GraphicsDriver + ?Sized,
    {
        let cleared = self.settings.is_screen_cleared_every_frame();

        // The policy may have been toggled since the target was created.
        let game = &mut self.game;
        self.targets
            .ensure_offscreen_kind(TargetKind::offscreen(cleared), |w, h, k| {
                game.new_offscreen_target(w, h, k)
            });

        if cleared {
            if let Some(offscreen) = self.targets.offscreen_mut() {
                offscreen.clear();
            }
        }

        self.targets.reset_dirty();
        if let Some(offscreen) = self.targets.offscreen_mut() {
            self.game.draw_offscreen(offscreen).map_err(RuntimeError::draw)?;
        }

        let needs_redraw = force_draw || cleared || self.targets.is_dirty();
        if !self.skip.record(needs_redraw) {
            log::trace!("composite skipped, {} clean frames", self.skip.count());
            return Ok(());
        }

        let transform = self.geometry.scale_and_offsets();
        if let Some((screen, offscreen)) = self.targets.composite_pair() {
            if driver.needs_clearing_screen() {
                screen.clear();
            }
            self.game.draw_final_screen(screen, offscreen, transform);
            // The screen is never a rendering source; nothing may stay pending.
            screen.flush();
        }
        Ok(())
    }

    fn map_cursor(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (lx, ly) = self.geometry.adjust_position(x, y, self.device_scale_factor);
        (!lx.is_nan() && !ly.is_nan()).then_some((lx, ly))
    }

    /// Maps a device-independent position into the game's logical space.
    ///
    /// `(NaN, NaN)` until the first layout.
    pub fn adjust_position(&self, x: f64, y: f64, device_scale_factor: f64) -> (f64, f64) {
        self.geometry.adjust_position(x, y, device_scale_factor)
    }

    pub fn scale_and_offsets(&self) -> ScaleOffsets {
        self.geometry.scale_and_offsets()
    }

    pub fn geometry(&self) -> &ScreenGeometry {
        &self.geometry
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn skip_count(&self) -> u32 {
        self.skip.count()
    }

    pub fn targets(&self) -> &TargetSlots<G::Target> {
        &self.targets
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    pub fn fault(&self) -> &FaultLatch {
        &self.fault
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }
}

impl<G: Game> Drop for FrameContext<G> {
    fn drop(&mut self) {
        self.targets.dispose_all();
    }
}
