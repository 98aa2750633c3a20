//! Headless host for the cadence runtime.
//!
//! Runs a bouncing-box "game" against in-memory render targets for a fixed
//! number of frames and logs what the runtime did. Set
//! `CADENCE_SINGLE_THREAD=1` to run everything on one thread and `CADENCE_TPS`
//! to change the tick rate.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use cadence_engine::config::RunOptions;
use cadence_engine::coords::ScaleOffsets;
use cadence_engine::core::{FrameParams, FrameRequest, Game, GraphicsDriver, Platform};
use cadence_engine::input::{ButtonState, InputEvent, InputHub, InputSnapshot, Key};
use cadence_engine::logging::{LoggingConfig, init_logging};
use cadence_engine::target::{RenderTarget, TargetKind, WriteNotifier};
use cadence_engine::thread::{ContextHandle, Coordinator, call_on};

const DEFAULT_FRAMES: u64 = 240;
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

#[derive(Default)]
struct Stats {
    updates: AtomicU64,
    offscreen_draws: AtomicU64,
    composites: AtomicU64,
    render_jobs: AtomicU64,
    targets_created: AtomicU64,
}

impl Stats {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// RGBA pixels in memory.
struct Canvas {
    width: u32,
    height: u32,
    kind: TargetKind,
    pixels: Vec<u32>,
    writes: Option<WriteNotifier>,
}

impl Canvas {
    fn new(width: u32, height: u32, kind: TargetKind) -> Self {
        Self {
            width,
            height,
            kind,
            pixels: vec![0; (width * height) as usize],
            writes: None,
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: u32) {
        for row in y..(y + h).min(self.height) {
            let start = (row * self.width + x) as usize;
            let end = (row * self.width + (x + w).min(self.width)) as usize;
            self.pixels[start..end].fill(color);
        }
        if let Some(writes) = &self.writes {
            writes.notify();
        }
    }
}

impl RenderTarget for Canvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn kind(&self) -> TargetKind {
        self.kind
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn flush(&mut self) {}

    fn observe_writes(&mut self, notifier: WriteNotifier) {
        self.writes = Some(notifier);
    }

    fn dispose(self) {
        log::debug!("disposing {}x{} {:?} canvas", self.width, self.height, self.kind);
    }
}

struct BouncingBox {
    stats: Arc<Stats>,
    pos: (i32, i32),
    vel: (i32, i32),
    paused: bool,
    moved: bool,
}

impl BouncingBox {
    const LOGICAL: (u32, u32) = (320, 180);
    const SIZE: u32 = 16;

    fn new(stats: Arc<Stats>) -> Self {
        Self {
            stats,
            pos: (10, 10),
            vel: (3, 2),
            paused: false,
            moved: true,
        }
    }
}

impl Game for BouncingBox {
    type Target = Canvas;

    fn layout(&mut self, _outside_width: f64, _outside_height: f64) -> (f64, f64) {
        (Self::LOGICAL.0 as f64, Self::LOGICAL.1 as f64)
    }

    fn update(&mut self, input: &InputSnapshot) -> anyhow::Result<()> {
        Stats::bump(&self.stats.updates);

        if input.key_just_pressed(Key::Space) {
            self.paused = !self.paused;
            log::info!("box {}", if self.paused { "paused" } else { "resumed" });
        }
        if self.paused {
            return Ok(());
        }

        let max_x = (Self::LOGICAL.0 - Self::SIZE) as i32;
        let max_y = (Self::LOGICAL.1 - Self::SIZE) as i32;
        self.pos.0 += self.vel.0;
        self.pos.1 += self.vel.1;
        if self.pos.0 <= 0 || self.pos.0 >= max_x {
            self.vel.0 = -self.vel.0;
        }
        if self.pos.1 <= 0 || self.pos.1 >= max_y {
            self.vel.1 = -self.vel.1;
        }
        self.pos = (self.pos.0.clamp(0, max_x), self.pos.1.clamp(0, max_y));
        self.moved = true;
        Ok(())
    }

    fn draw_offscreen(&mut self, offscreen: &mut Canvas) -> anyhow::Result<()> {
        Stats::bump(&self.stats.offscreen_draws);

        // Persistent targets keep the last frame; only redraw on change.
        if offscreen.kind == TargetKind::Persistent && !self.moved {
            return Ok(());
        }
        if offscreen.kind == TargetKind::Persistent {
            offscreen.clear();
        }
        offscreen.fill_rect(self.pos.0 as u32, self.pos.1 as u32, Self::SIZE, Self::SIZE, 0xff_66_cc_ff);
        self.moved = false;
        Ok(())
    }

    fn draw_final_screen(&mut self, screen: &mut Canvas, offscreen: &Canvas, transform: ScaleOffsets) {
        Stats::bump(&self.stats.composites);

        // Nearest-neighbour blit with letterboxing.
        for sy in 0..screen.height {
            for sx in 0..screen.width {
                let lx = (sx as f64 - transform.offset_x) / transform.scale;
                let ly = (sy as f64 - transform.offset_y) / transform.scale;
                let inside = lx >= 0.0 && ly >= 0.0 && lx < offscreen.width as f64 && ly < offscreen.height as f64;
                let color = if inside {
                    offscreen.pixels[(ly as u32 * offscreen.width + lx as u32) as usize]
                } else {
                    0
                };
                screen.pixels[(sy * screen.width + sx) as usize] = color;
            }
        }
    }

    fn new_offscreen_target(&mut self, width: u32, height: u32, kind: TargetKind) -> Canvas {
        Stats::bump(&self.stats.targets_created);
        self.moved = true;
        Canvas::new(width, height, kind)
    }

    fn new_screen_target(&mut self, width: u32, height: u32) -> Canvas {
        Stats::bump(&self.stats.targets_created);
        Canvas::new(width, height, TargetKind::Screen)
    }
}

/// Scripted "window": paces frames, resizes once, and presses space now and then.
struct HeadlessPlatform {
    frames: u64,
    served: u64,
    input: Option<InputHub>,
    next_deadline: Instant,
    size: (f64, f64),
}

impl HeadlessPlatform {
    fn new(frames: u64) -> Self {
        Self {
            frames,
            served: 0,
            input: None,
            next_deadline: Instant::now(),
            size: (640.0, 360.0),
        }
    }
}

impl Platform for HeadlessPlatform {
    fn init(&mut self, input: InputHub, options: &RunOptions) -> anyhow::Result<()> {
        log::info!(
            "headless platform up: {}x{}, tick rate {:?}",
            self.size.0,
            self.size.1,
            options.tick_rate
        );
        self.input = Some(input);
        self.next_deadline = Instant::now();
        Ok(())
    }

    fn next_frame(&mut self) -> anyhow::Result<FrameRequest> {
        if self.served >= self.frames {
            return Ok(FrameRequest::Exit);
        }

        let now = Instant::now();
        if self.next_deadline > now {
            std::thread::sleep(self.next_deadline - now);
        }
        self.next_deadline += FRAME_INTERVAL;
        self.served += 1;

        if let Some(input) = &self.input {
            if self.served % 90 == 0 {
                input.extend([
                    InputEvent::Key { key: Key::Space, state: ButtonState::Pressed },
                    InputEvent::Key { key: Key::Space, state: ButtonState::Released },
                ]);
            }
        }

        // A live resize halfway through: repaint synchronously.
        if self.served == self.frames / 2 {
            self.size = (800.0, 600.0);
            log::info!("resized to {}x{}", self.size.0, self.size.1);
            return Ok(FrameRequest::ForceRedraw(FrameParams::new(self.size.0, self.size.1, 1.0)));
        }

        Ok(FrameRequest::Frame(FrameParams::new(self.size.0, self.size.1, 1.0)))
    }
}

/// Pretends to submit a command buffer per frame on the render context.
struct HeadlessDriver {
    render: Option<ContextHandle>,
    stats: Arc<Stats>,
}

impl GraphicsDriver for HeadlessDriver {
    fn set_render_context(&mut self, ctx: ContextHandle) {
        log::info!("render context: {}", ctx.name());
        self.render = Some(ctx);
    }

    fn end_frame(&mut self) -> anyhow::Result<()> {
        let Some(render) = &self.render else {
            return Ok(());
        };
        let stats = self.stats.clone();
        call_on(render.as_ref(), move || {
            Stats::bump(&stats.render_jobs);
            Ok(())
        })
        .context("submitting frame")?;
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let frames = match std::env::args().nth(1) {
        Some(raw) => raw.parse().with_context(|| format!("invalid frame count {raw:?}"))?,
        None => DEFAULT_FRAMES,
    };

    let options = RunOptions::default().with_env_overrides();
    let mode = if options.is_cooperative() { "single-thread" } else { "multi-thread" };
    log::info!("running {frames} frames in {mode} mode");

    let stats = Arc::new(Stats::default());
    let coordinator = Coordinator::new();
    let started = Instant::now();

    coordinator.run(
        BouncingBox::new(stats.clone()),
        HeadlessPlatform::new(frames),
        HeadlessDriver { render: None, stats: stats.clone() },
        options,
    )?;

    let elapsed = started.elapsed().as_secs_f64();
    let settings = coordinator.settings();
    log::info!(
        "done in {elapsed:.2}s: {frames} frames, {} updates ({:.1} TPS), {} composites ({:.1} FPS)",
        stats.updates.load(Ordering::Relaxed),
        settings.actual_tps(),
        stats.composites.load(Ordering::Relaxed),
        settings.actual_fps(),
    );
    log::info!(
        "offscreen draws: {}, render jobs: {}, targets created: {}",
        stats.offscreen_draws.load(Ordering::Relaxed),
        stats.render_jobs.load(Ordering::Relaxed),
        stats.targets_created.load(Ordering::Relaxed),
    );
    Ok(())
}
