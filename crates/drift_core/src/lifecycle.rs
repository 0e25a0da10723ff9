//! Lifecycle scheduler: periodic shrink-and-replace
//!
//! Every period one sphere (chosen uniformly among those not already
//! leaving) starts shrinking to zero. Its removal is a deferred task keyed
//! by the absolute time the shrink finishes; when a frame observes that
//! deadline, the sphere is released and a replacement spawns at scale 0.

use crate::registry::{EntityId, Registry};
use crate::spawner::Spawner;
use crate::transition::ScaleTransition;
use rand::Rng;
use std::time::Duration;

/// What the lifecycle did during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifecycleReport {
    /// Sphere that started shrinking this frame
    pub retiring: Option<EntityId>,
    /// `(removed, replacement)` pairs completed this frame
    pub replaced: Vec<(EntityId, EntityId)>,
}

#[derive(Debug, Clone)]
pub struct LifecycleScheduler {
    period: Duration,
    shrink: Duration,
    next_tick: Duration,
}

impl LifecycleScheduler {
    /// First tick fires one `period` after `start`.
    pub fn new(period: Duration, shrink: Duration, start: Duration) -> Self {
        Self {
            period,
            shrink,
            next_tick: start + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_tick(&self) -> Duration {
        self.next_tick
    }

    /// Consume the tick due at `now`, if any.
    ///
    /// At most one tick fires per call. A host that stalls for several
    /// periods does not get a burst of replacements afterwards: the schedule
    /// re-anchors on `now`.
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.period.is_zero() || now < self.next_tick {
            return false;
        }
        self.next_tick += self.period;
        if self.next_tick <= now {
            self.next_tick = now + self.period;
        }
        true
    }

    /// Pick a random sphere and start its scale-out. No-op on an empty
    /// registry or when every sphere is already leaving.
    pub fn retire_random<R: Rng + ?Sized>(
        &self,
        registry: &mut Registry,
        rng: &mut R,
        now: Duration,
    ) -> Option<EntityId> {
        let candidates: Vec<EntityId> = registry
            .iter()
            .filter(|e| !e.is_retiring())
            .map(|e| e.id())
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let id = candidates[rng.gen_range(0..candidates.len())];
        let entity = registry.get_mut(id)?;
        let transition = ScaleTransition::new(entity.scale(), 0.0, now, self.shrink);
        entity.start_transition(transition);
        entity.mark_retiring(transition.finishes_at());

        tracing::debug!(%id, remove_at = ?transition.finishes_at(), "sphere retiring");
        Some(id)
    }
}

/// Remove every sphere whose shrink has finished by `now` and spawn a
/// replacement for each at scale 0.
pub fn complete_retirements<R: Rng + ?Sized>(
    registry: &mut Registry,
    spawner: &Spawner,
    rng: &mut R,
    now: Duration,
) -> Vec<(EntityId, EntityId)> {
    let due: Vec<EntityId> = registry
        .iter()
        .filter(|e| e.retire_at().is_some_and(|at| at <= now))
        .map(|e| e.id())
        .collect();

    let mut replaced = Vec::with_capacity(due.len());
    for id in due {
        if !registry.remove(id) {
            continue;
        }
        let replacement = spawner.spawn(registry, rng, 0.0, now);
        tracing::debug!(removed = %id, %replacement, "sphere replaced");
        replaced.push((id, replacement));
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::math::sim_rng;
    use crate::physics::PhysicsWorld;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn populated(count: usize) -> (Registry, Spawner) {
        let config = SimulationConfig::default();
        let mut registry = Registry::new(PhysicsWorld::new(&config.physics));
        let spawner = Spawner::new(&config, config.camera.position);
        let mut rng = sim_rng(Some(5));
        for _ in 0..count {
            spawner.spawn(&mut registry, &mut rng, 1.0, Duration::ZERO);
        }
        (registry, spawner)
    }

    #[test]
    fn ticks_follow_the_period() {
        let mut scheduler = LifecycleScheduler::new(ms(1000), ms(500), Duration::ZERO);
        assert!(!scheduler.poll(ms(999)));
        assert!(scheduler.poll(ms(1000)));
        assert!(!scheduler.poll(ms(1500)));
        assert!(scheduler.poll(ms(2016)));
        assert_eq!(scheduler.next_tick(), ms(3000));
    }

    #[test]
    fn stalled_host_gets_one_tick_then_reanchors() {
        let mut scheduler = LifecycleScheduler::new(ms(1000), ms(500), Duration::ZERO);
        assert!(scheduler.poll(ms(5500)));
        assert!(!scheduler.poll(ms(5600)));
        assert_eq!(scheduler.next_tick(), ms(6500));
    }

    #[test]
    fn empty_registry_is_a_no_op() {
        let (mut registry, _) = populated(0);
        let scheduler = LifecycleScheduler::new(ms(1000), ms(500), Duration::ZERO);
        assert!(scheduler
            .retire_random(&mut registry, &mut sim_rng(Some(1)), ms(1000))
            .is_none());
    }

    #[test]
    fn retiring_sphere_is_replaced_after_shrink() {
        let (mut registry, spawner) = populated(5);
        let scheduler = LifecycleScheduler::new(ms(1000), ms(500), Duration::ZERO);
        let mut rng = sim_rng(Some(2));

        let id = scheduler.retire_random(&mut registry, &mut rng, ms(1000)).unwrap();
        assert_eq!(registry.get(id).unwrap().retire_at(), Some(ms(1500)));

        // Not yet due: population unchanged, sphere still present.
        assert!(complete_retirements(&mut registry, &spawner, &mut rng, ms(1499)).is_empty());
        assert!(registry.get(id).is_some());
        assert_eq!(registry.len(), 5);

        let replaced = complete_retirements(&mut registry, &spawner, &mut rng, ms(1500));
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced[0].0, id);
        assert!(registry.get(id).is_none());
        assert_eq!(registry.len(), 5);
        assert!(registry.is_consistent());

        let replacement = registry.get(replaced[0].1).unwrap();
        assert_eq!(replacement.scale(), 0.0);
        assert_eq!(replacement.transition().unwrap().target(), 1.0);
    }

    #[test]
    fn all_retiring_means_no_new_pick() {
        let (mut registry, _) = populated(2);
        let scheduler = LifecycleScheduler::new(ms(100), ms(500), Duration::ZERO);
        let mut rng = sim_rng(Some(8));
        let a = scheduler.retire_random(&mut registry, &mut rng, ms(100)).unwrap();
        let b = scheduler.retire_random(&mut registry, &mut rng, ms(200)).unwrap();
        assert_ne!(a, b);
        assert!(scheduler.retire_random(&mut registry, &mut rng, ms(300)).is_none());
    }
}
