/// Consecutive clean frames after which a composite is issued anyway.
///
/// Some platforms only notice transitions (e.g. leaving fullscreen) when the
/// swap chain is presented, so presentation never stops entirely.
pub const MAX_SKIP_COUNT: u32 = 180;

/// Frame-skip bookkeeping for the final composite.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SkipCounter {
    count: u32,
}

impl SkipCounter {
    /// Records one draw pass and returns whether the composite must run.
    ///
    /// `needs_redraw` is true for forced draws, clear-every-frame mode, or a
    /// dirty offscreen target. Clean frames skip the composite, except every
    /// `MAX_SKIP_COUNT`th one, which is composited anyway.
    pub fn record(&mut self, needs_redraw: bool) -> bool {
        if needs_redraw {
            self.count = 0;
            return true;
        }

        self.count = (self.count + 1).min(MAX_SKIP_COUNT);
        if self.count == MAX_SKIP_COUNT {
            self.count = 0;
            return true;
        }
        false
    }

    /// Clean frames skipped since the last composite.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirty_frames_always_composite() {
        let mut s = SkipCounter::default();
        for _ in 0..500 {
            assert!(s.record(true));
            assert_eq!(s.count(), 0);
        }
    }

    #[test]
    fn clean_frames_skip_until_the_cap() {
        let mut s = SkipCounter::default();
        let composited: Vec<u32> = (1..=MAX_SKIP_COUNT * 3)
            .filter(|_| s.record(false))
            .collect();
        assert_eq!(composited, vec![180, 360, 540]);
    }

    #[test]
    fn dirty_frame_restarts_the_count() {
        let mut s = SkipCounter::default();
        for _ in 0..100 {
            s.record(false);
        }
        assert_eq!(s.count(), 100);
        assert!(s.record(true));
        assert_eq!(s.count(), 0);
        assert!(!s.record(false));
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn count_never_exceeds_cap() {
        let mut s = SkipCounter::default();
        for _ in 0..10_000 {
            s.record(false);
            assert!(s.count() < MAX_SKIP_COUNT);
        }
    }
}
