//! Drift Metrics - frame timing and simulation counters
//!
//! Everything here compiles to no-op stubs unless the `metrics` feature is
//! enabled, so release builds carry no instrumentation cost.
//!
//! # Usage
//!
//! ```ignore
//! use drift_metrics::{FrameTimer, SimStats};
//!
//! let mut timer = FrameTimer::new(120);
//! let mut stats = SimStats::new();
//! timer.tick(std::time::Instant::now());
//! stats.record_frame(true, 0);
//! println!("{:.1} fps, {} frames stepped", timer.fps(), stats.snapshot().frames_stepped);
//! ```

#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod ring_buffer;
#[cfg(feature = "metrics")]
mod sim_stats;

#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;
#[cfg(feature = "metrics")]
pub use sim_stats::SimStats;

/// Counter values at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub frames_stepped: u64,
    pub frames_frozen: u64,
    pub spawns: u64,
    pub retirements: u64,
}

/// Execute code only when metrics are enabled
#[macro_export]
macro_rules! metrics {
    ($($tt:tt)*) => {
        #[cfg(feature = "metrics")]
        {
            $($tt)*
        }
    };
}

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn tick(&mut self, _now: std::time::Instant) {}
    pub fn fps(&self) -> f64 { 0.0 }
    pub fn frame_time_ms(&self) -> f64 { 0.0 }
    pub fn frame_time_range_ms(&self) -> (f64, f64) { (0.0, 0.0) }
}

#[cfg(not(feature = "metrics"))]
pub struct RingBuffer<T>(std::marker::PhantomData<T>);

#[cfg(not(feature = "metrics"))]
impl<T> RingBuffer<T> {
    pub fn new(_capacity: usize) -> Self { Self(std::marker::PhantomData) }
    pub fn push(&mut self, _value: T) {}
    pub fn len(&self) -> usize { 0 }
    pub fn is_empty(&self) -> bool { true }
}

#[cfg(not(feature = "metrics"))]
pub struct SimStats;

#[cfg(not(feature = "metrics"))]
impl SimStats {
    pub fn new() -> Self { Self }
    pub fn record_spawns(&mut self, _count: usize) {}
    pub fn record_frame(&mut self, _stepped: bool, _replaced: usize) {}
    pub fn snapshot(&self) -> StatsSnapshot { StatsSnapshot::default() }
}

#[cfg(not(feature = "metrics"))]
impl Default for SimStats {
    fn default() -> Self { Self }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_compiles_without_metrics() {
        let mut timer = super::FrameTimer::new(60);
        timer.tick(std::time::Instant::now());
        let mut _buffer = super::RingBuffer::<f64>::new(10);
        let mut stats = super::SimStats::new();
        stats.record_frame(true, 0);
        let _ = stats.snapshot();
    }
}
