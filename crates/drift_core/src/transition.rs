//! Timed scale transitions
//!
//! Progress is computed from absolute wall-clock time, never from frame
//! counts, so a transition finishes on schedule even when frames are
//! skipped or the field is frozen.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransition {
    from: f32,
    to: f32,
    started_at: Duration,
    duration: Duration,
}

impl ScaleTransition {
    pub fn new(from: f32, to: f32, started_at: Duration, duration: Duration) -> Self {
        Self {
            from: from.clamp(0.0, 1.0),
            to: to.clamp(0.0, 1.0),
            started_at,
            duration,
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Earliest time at which the transition has reached its target
    pub fn finishes_at(&self) -> Duration {
        self.started_at + self.duration
    }

    /// Progress in [0, 1]
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Scale at `now`, linear in time. Exactly the target once finished.
    pub fn scale_at(&self, now: Duration) -> f32 {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return self.to;
        }
        let scale = self.from + (self.to - self.from) * progress;
        scale.clamp(self.from.min(self.to), self.from.max(self.to))
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.finishes_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn grows_linearly_then_holds_target() {
        let t = ScaleTransition::new(0.0, 1.0, ms(1000), ms(500));
        assert_eq!(t.scale_at(ms(1000)), 0.0);
        assert!((t.scale_at(ms(1250)) - 0.5).abs() < 1e-6);
        assert_eq!(t.scale_at(ms(1500)), 1.0);
        assert_eq!(t.scale_at(ms(9000)), 1.0);
        assert!(t.is_finished(ms(1500)));
        assert!(!t.is_finished(ms(1499)));
    }

    #[test]
    fn intermediate_values_stay_between_endpoints() {
        let t = ScaleTransition::new(0.8, 0.0, ms(0), ms(500));
        for step in 0..=60 {
            let s = t.scale_at(ms(step * 10));
            assert!((0.0..=0.8).contains(&s), "{s} out of range");
        }
        assert_eq!(t.scale_at(ms(500)), 0.0);
    }

    #[test]
    fn time_before_start_counts_as_zero_progress() {
        let t = ScaleTransition::new(1.0, 0.0, ms(1000), ms(500));
        assert_eq!(t.progress(ms(10)), 0.0);
        assert_eq!(t.scale_at(ms(10)), 1.0);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let t = ScaleTransition::new(0.0, 1.0, ms(0), Duration::ZERO);
        assert_eq!(t.scale_at(ms(0)), 1.0);
        assert!(t.is_finished(ms(0)));
    }
}
