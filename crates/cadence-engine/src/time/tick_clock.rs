use std::time::{Duration, Instant};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Target rate of logical updates.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickRate {
    /// `n` logical updates per second of wall-clock time. `Fixed(0)` pauses updates.
    Fixed(u32),
    /// Exactly one logical update per frame, whatever the frame rate.
    PerFrame,
}

impl TickRate {
    pub const DEFAULT: TickRate = TickRate::Fixed(60);

    pub(crate) fn to_raw(self) -> u32 {
        match self {
            TickRate::Fixed(n) => n.min(u32::MAX - 1),
            TickRate::PerFrame => u32::MAX,
        }
    }

    pub(crate) fn from_raw(raw: u32) -> Self {
        if raw == u32::MAX {
            TickRate::PerFrame
        } else {
            TickRate::Fixed(raw)
        }
    }
}

impl Default for TickRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Logical tick accounting for one frame loop.
///
/// Ticks are derived from the time elapsed since an anchor instant rather than
/// from per-frame deltas, so rounding never accumulates: after any sequence of
/// calls the total returned equals `floor(elapsed * tps)`.
///
/// Gaps longer than `max_gap` between two calls (system sleep, a debugger
/// pause) re-anchor the clock instead of replaying the whole gap.
#[derive(Debug, Clone)]
pub struct TickClock {
    rate: TickRate,
    max_gap: Duration,

    anchor: Option<Instant>,
    consumed: u64,
    last: Option<Instant>,

    window_start: Option<Instant>,
    frames_in_window: u32,
    ticks_in_window: u64,
    actual_fps: f64,
    actual_tps: f64,
}

impl TickClock {
    pub const DEFAULT_MAX_GAP: Duration = Duration::from_secs(5);

    pub fn new(rate: TickRate) -> Self {
        Self::with_max_gap(rate, Self::DEFAULT_MAX_GAP)
    }

    pub fn with_max_gap(rate: TickRate, max_gap: Duration) -> Self {
        Self {
            rate,
            max_gap,
            anchor: None,
            consumed: 0,
            last: None,
            window_start: None,
            frames_in_window: 0,
            ticks_in_window: 0,
            actual_fps: 0.0,
            actual_tps: 0.0,
        }
    }

    #[inline]
    pub fn rate(&self) -> TickRate {
        self.rate
    }

    /// Changes the tick rate.
    ///
    /// Time already elapsed at the old rate is discarded; accounting restarts
    /// from the most recent sample.
    pub fn set_rate(&mut self, rate: TickRate) {
        if rate == self.rate {
            return;
        }
        log::debug!("tick rate changed: {:?} -> {:?}", self.rate, rate);
        self.rate = rate;
        self.anchor = self.last;
        self.consumed = 0;
    }

    /// Returns the number of logical updates due since the previous call.
    ///
    /// The first call only anchors the clock and returns 0.
    pub fn ticks_owed(&mut self, now: Instant) -> u32 {
        let ticks = self.compute(now);
        self.last = Some(now);
        self.record(now, ticks);
        ticks
    }

    /// Average frames per second over the last completed one-second window.
    pub fn actual_fps(&self) -> f64 {
        self.actual_fps
    }

    /// Average logical ticks per second over the last completed one-second window.
    pub fn actual_tps(&self) -> f64 {
        self.actual_tps
    }

    fn compute(&mut self, now: Instant) -> u32 {
        let tps = match self.rate {
            TickRate::PerFrame => {
                self.anchor = Some(now);
                return 1;
            }
            TickRate::Fixed(0) => {
                self.anchor = Some(now);
                self.consumed = 0;
                return 0;
            }
            TickRate::Fixed(tps) => tps,
        };

        let Some(anchor) = self.anchor else {
            self.anchor = Some(now);
            self.consumed = 0;
            return 0;
        };

        if let Some(last) = self.last {
            let gap = now.saturating_duration_since(last);
            if gap > self.max_gap {
                log::warn!(
                    "tick clock re-anchored after a {:.2}s gap",
                    gap.as_secs_f64()
                );
                self.anchor = Some(now);
                self.consumed = 0;
                return 1;
            }
        }

        let elapsed = now.saturating_duration_since(anchor).as_nanos();
        let due = (elapsed * tps as u128 / NANOS_PER_SEC) as u64;
        let owed = due.saturating_sub(self.consumed);
        self.consumed = self.consumed.max(due);

        owed.min(u32::MAX as u64) as u32
    }

    fn record(&mut self, now: Instant, ticks: u32) {
        let start = *self.window_start.get_or_insert(now);
        self.frames_in_window += 1;
        self.ticks_in_window += ticks as u64;

        let span = now.saturating_duration_since(start);
        if span >= Duration::from_secs(1) {
            let secs = span.as_secs_f64();
            self.actual_fps = self.frames_in_window as f64 / secs;
            self.actual_tps = self.ticks_in_window as f64 / secs;
            self.window_start = Some(now);
            self.frames_in_window = 0;
            self.ticks_in_window = 0;
        }
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(TickRate::DEFAULT)
    }
}
