use std::time::Duration;

use crate::time::{TickClock, TickRate};

/// Environment variable forcing the threading strategy (`1`/`true`, `0`/`false`).
pub const ENV_SINGLE_THREAD: &str = "CADENCE_SINGLE_THREAD";

/// Environment variable overriding the tick rate (a number, or `per-frame`).
pub const ENV_TPS: &str = "CADENCE_TPS";

/// Options for [`Coordinator::run`](crate::thread::Coordinator::run).
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Run every execution context cooperatively on the calling thread.
    pub single_thread: bool,
    pub tick_rate: TickRate,
    /// Initial value of the "clear the offscreen every frame" policy.
    pub screen_cleared_every_frame: bool,
    /// Longest gap between frames that is still caught up tick by tick.
    pub max_gap: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            single_thread: false,
            tick_rate: TickRate::DEFAULT,
            screen_cleared_every_frame: true,
            max_gap: TickClock::DEFAULT_MAX_GAP,
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single_thread(mut self, v: bool) -> Self {
        self.single_thread = v;
        self
    }

    pub fn tick_rate(mut self, rate: TickRate) -> Self {
        self.tick_rate = rate;
        self
    }

    pub fn screen_cleared_every_frame(mut self, v: bool) -> Self {
        self.screen_cleared_every_frame = v;
        self
    }

    pub fn max_gap(mut self, gap: Duration) -> Self {
        self.max_gap = gap;
        self
    }

    /// Applies `CADENCE_SINGLE_THREAD` and `CADENCE_TPS` from the process
    /// environment.
    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_SINGLE_THREAD) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.single_thread = true,
                "0" | "false" | "no" => self.single_thread = false,
                other => log::warn!("ignoring {ENV_SINGLE_THREAD}={other:?}"),
            }
        }

        if let Some(raw) = lookup(ENV_TPS) {
            let raw = raw.trim();
            if raw.eq_ignore_ascii_case("per-frame") {
                self.tick_rate = TickRate::PerFrame;
            } else {
                match raw.parse::<u32>() {
                    Ok(n) => self.tick_rate = TickRate::Fixed(n),
                    Err(e) => log::warn!("ignoring {ENV_TPS}={raw:?}: {e}"),
                }
            }
        }

        self
    }

    /// Whether the cooperative strategy must be used.
    ///
    /// Targets without OS threads and builds with the `single-thread` feature
    /// force it regardless of `single_thread`.
    pub fn is_cooperative(&self) -> bool {
        self.single_thread || cfg!(feature = "single-thread") || cfg!(target_arch = "wasm32")
    }
}
