//! Running counters for the simulation loop

use crate::StatsSnapshot;

#[derive(Default)]
pub struct SimStats {
    current: StatsSnapshot,
}

impl SimStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_spawns(&mut self, count: usize) {
        self.current.spawns += count as u64;
    }

    /// Fold one frame's outcome into the counters.
    ///
    /// Each replacement is one retirement completed and one sphere spawned.
    pub fn record_frame(&mut self, stepped: bool, replaced: usize) {
        if stepped {
            self.current.frames_stepped += 1;
        } else {
            self.current.frames_frozen += 1;
        }
        self.current.retirements += replaced as u64;
        self.current.spawns += replaced as u64;
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_split_by_focus() {
        let mut stats = SimStats::new();
        stats.record_spawns(30);
        stats.record_frame(true, 0);
        stats.record_frame(false, 1);
        stats.record_frame(true, 0);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.frames_stepped, 2);
        assert_eq!(snapshot.frames_frozen, 1);
        assert_eq!(snapshot.retirements, 1);
        assert_eq!(snapshot.spawns, 31);
    }
}
