use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use super::RunOptions;
use crate::time::TickRate;

/// Settings that may be changed from any thread while frames are running.
///
/// Changes take effect at the next frame boundary. The frame loop publishes
/// its measured rates here so other threads can read them.
#[derive(Debug)]
pub struct RuntimeSettings {
    screen_cleared_every_frame: AtomicBool,
    tick_rate: AtomicU32,
    // f64 bits.
    actual_fps: AtomicU64,
    actual_tps: AtomicU64,
}

impl RuntimeSettings {
    pub fn new(options: &RunOptions) -> Self {
        Self {
            screen_cleared_every_frame: AtomicBool::new(options.screen_cleared_every_frame),
            tick_rate: AtomicU32::new(options.tick_rate.to_raw()),
            actual_fps: AtomicU64::new(0),
            actual_tps: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn is_screen_cleared_every_frame(&self) -> bool {
        self.screen_cleared_every_frame.load(Ordering::Relaxed)
    }

    pub fn set_screen_cleared_every_frame(&self, v: bool) {
        self.screen_cleared_every_frame.store(v, Ordering::Relaxed);
    }

    #[inline]
    pub fn tick_rate(&self) -> TickRate {
        TickRate::from_raw(self.tick_rate.load(Ordering::Relaxed))
    }

    pub fn set_tick_rate(&self, rate: TickRate) {
        self.tick_rate.store(rate.to_raw(), Ordering::Relaxed);
    }

    /// Frames per second over the last completed one-second window.
    pub fn actual_fps(&self) -> f64 {
        f64::from_bits(self.actual_fps.load(Ordering::Relaxed))
    }

    /// Logical ticks per second over the last completed one-second window.
    pub fn actual_tps(&self) -> f64 {
        f64::from_bits(self.actual_tps.load(Ordering::Relaxed))
    }

    pub(crate) fn publish_rates(&self, fps: f64, tps: f64) {
        self.actual_fps.store(fps.to_bits(), Ordering::Relaxed);
        self.actual_tps.store(tps.to_bits(), Ordering::Relaxed);
    }
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self::new(&RunOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_from_options_and_mutable() {
        let s = RuntimeSettings::new(
            &RunOptions::new()
                .screen_cleared_every_frame(false)
                .tick_rate(TickRate::Fixed(30)),
        );
        assert!(!s.is_screen_cleared_every_frame());
        assert_eq!(s.tick_rate(), TickRate::Fixed(30));

        s.set_screen_cleared_every_frame(true);
        s.set_tick_rate(TickRate::PerFrame);
        assert!(s.is_screen_cleared_every_frame());
        assert_eq!(s.tick_rate(), TickRate::PerFrame);
    }

    #[test]
    fn measured_rates_start_at_zero_and_publish() {
        let s = RuntimeSettings::default();
        assert_eq!((s.actual_fps(), s.actual_tps()), (0.0, 0.0));

        s.publish_rates(59.5, 60.0);
        assert_eq!((s.actual_fps(), s.actual_tps()), (59.5, 60.0));
    }
}
