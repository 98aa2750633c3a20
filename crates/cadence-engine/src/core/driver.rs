use crate::thread::ContextHandle;

/// Graphics-command subsystem as seen by the frame loop.
///
/// Every method has a no-op default so headless hosts only override what they
/// need.
pub trait GraphicsDriver: Send + 'static {
    /// Receives the context GPU work must be submitted on.
    ///
    /// Called once, before the platform is initialised.
    fn set_render_context(&mut self, ctx: ContextHandle) {
        let _ = ctx;
    }

    /// Called before layout at the start of every non-empty frame.
    fn begin_frame(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called after the draw pass, also when the frame failed.
    fn end_frame(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Whether the screen target must be cleared before compositing.
    fn needs_clearing_screen(&self) -> bool {
        false
    }

    /// Whether a forced redraw must be issued twice to refresh every buffer
    /// of a double-buffered swap chain.
    fn needs_double_forced_update(&self) -> bool {
        false
    }
}
