use crate::config::RunOptions;
use crate::input::InputHub;

/// Per-frame surface parameters reported by the platform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameParams {
    /// Window size in device-independent pixels. Zero during some transitions.
    pub outside_width: f64,
    pub outside_height: f64,
    pub device_scale_factor: f64,
}

impl FrameParams {
    pub const fn new(outside_width: f64, outside_height: f64, device_scale_factor: f64) -> Self {
        Self {
            outside_width,
            outside_height,
            device_scale_factor,
        }
    }
}

/// What the frame loop should do next.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FrameRequest {
    /// A regular frame, paced by the tick clock.
    Frame(FrameParams),
    /// A synchronous repaint (e.g. during a live resize): one update, always drawn.
    ForceRedraw(FrameParams),
    /// The platform is shutting down.
    Exit,
}

/// Windowing platform. All calls run on the main thread.
pub trait Platform: Send + 'static {
    /// One-time initialisation. `input` is where translated events go.
    fn init(&mut self, input: InputHub, options: &RunOptions) -> anyhow::Result<()>;

    /// Pumps platform events and reports the next frame to run.
    fn next_frame(&mut self) -> anyhow::Result<FrameRequest>;
}
