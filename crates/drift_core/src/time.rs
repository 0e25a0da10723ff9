//! Simulation time
//!
//! Physics advances by a fixed 60Hz step regardless of how much wall-clock
//! time passed between frames. Wall-clock time is handed in by the host as a
//! monotonic `Duration` since start and only drives timed work (scale
//! transitions, deferred removals, lifecycle ticks).

use std::time::Duration;

/// Fixed simulation tick rate
pub const TICK_RATE_HZ: u32 = 60;
/// Fixed physics step in seconds
pub const FIXED_TIMESTEP: f32 = 1.0 / TICK_RATE_HZ as f32;

/// Counts fixed steps and the simulated time they add up to
#[derive(Debug, Clone, Default)]
pub struct SimulationTime {
    tick_count: u64,
    simulated_secs: f64,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn advance_tick(&mut self, dt: f32) {
        self.tick_count += 1;
        self.simulated_secs += dt as f64;
    }

    pub fn simulated_time(&self) -> Duration {
        Duration::from_secs_f64(self.simulated_secs)
    }
}

/// Convert configured seconds to a `Duration`.
///
/// Negative, NaN and values too large for a `Duration` become zero; the
/// config validation rejects the latter before they get here.
pub fn secs(value: f32) -> Duration {
    if value > 0.0 {
        Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}
