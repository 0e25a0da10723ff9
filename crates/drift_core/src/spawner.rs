//! Spawner: places new spheres and starts their scale-in
//!
//! Positions are drawn uniformly from a cube around the origin and
//! rejection-sampled against a minimum distance from the viewpoint. After
//! `max_attempts` draws the last sample is accepted as-is.

use crate::config::SimulationConfig;
use crate::math::{point_in_cube, symmetric, Quat, Vec3};
use crate::physics::BodyDesc;
use crate::registry::{EntityId, Registry};
use crate::scene::{Hsl, Visual};
use crate::transition::ScaleTransition;
use rand::Rng;
use std::time::Duration;

/// Result of a spawn-position search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub attempts: u32,
    /// False when the retry budget ran out and the last sample was kept
    pub satisfied: bool,
}

#[derive(Debug, Clone)]
pub struct Spawner {
    half_extent: f32,
    distance_threshold: Option<f32>,
    max_attempts: u32,
    impulse: f32,
    saturation: f32,
    lightness: f32,
    radius: f32,
    mass: f32,
    linear_damping: f32,
    angular_damping: f32,
    transition: Duration,
    viewpoint: Vec3,
}

impl Spawner {
    pub fn new(config: &SimulationConfig, viewpoint: Vec3) -> Self {
        Self {
            half_extent: config.spawn.half_extent,
            distance_threshold: config.spawn.distance_threshold,
            max_attempts: config.spawn.max_attempts.max(1),
            impulse: config.spawn.impulse,
            saturation: config.spawn.saturation,
            lightness: config.spawn.lightness,
            radius: config.sphere_radius,
            mass: config.sphere_mass,
            linear_damping: config.linear_damping,
            angular_damping: config.angular_damping,
            transition: config.transition_duration(),
            viewpoint,
        }
    }

    /// Draw a position that keeps its distance from the viewpoint.
    pub fn place<R: Rng + ?Sized>(&self, rng: &mut R) -> Placement {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let position = point_in_cube(rng, self.half_extent);
            let satisfied = match self.distance_threshold {
                Some(threshold) => position.distance(self.viewpoint) >= threshold,
                None => true,
            };
            if satisfied || attempts >= self.max_attempts {
                return Placement {
                    position,
                    attempts,
                    satisfied,
                };
            }
        }
    }

    /// Create a sphere at `initial_scale` and register it.
    ///
    /// Spheres starting below full size immediately scale in to 1.
    pub fn spawn<R: Rng + ?Sized>(
        &self,
        registry: &mut Registry,
        rng: &mut R,
        initial_scale: f32,
        now: Duration,
    ) -> EntityId {
        let placement = self.place(rng);
        if !placement.satisfied {
            tracing::warn!(
                attempts = placement.attempts,
                position = ?placement.position,
                "spawn distance constraint not met, keeping last sample"
            );
        }

        let hue = rng.gen::<f32>() * 360.0;
        let color = Hsl::new(hue, self.saturation, self.lightness).to_linear();
        let visual = Visual {
            position: placement.position,
            orientation: Quat::IDENTITY,
            scale: initial_scale,
            radius: self.radius,
            color,
        };
        let body = BodyDesc {
            position: placement.position,
            mass: self.mass,
            radius: self.radius,
            linear_damping: self.linear_damping,
            angular_damping: self.angular_damping,
        };

        let id = registry.insert(body, visual, initial_scale);

        let impulse = Vec3::new(
            symmetric(rng, self.impulse),
            symmetric(rng, self.impulse),
            symmetric(rng, self.impulse),
        );
        if let Some(entity) = registry.get(id) {
            let body = entity.body();
            registry.physics_mut().apply_impulse(body, impulse, Vec3::ZERO);
        }

        if initial_scale < 1.0 {
            if let Some(entity) = registry.get_mut(id) {
                entity.start_transition(ScaleTransition::new(
                    entity.scale(),
                    1.0,
                    now,
                    self.transition,
                ));
            }
        }

        tracing::debug!(%id, hue, position = ?placement.position, "spawned sphere");
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::sim_rng;
    use crate::physics::PhysicsWorld;

    fn registry(config: &SimulationConfig) -> Registry {
        Registry::new(PhysicsWorld::new(&config.physics))
    }

    #[test]
    fn placements_respect_viewpoint_distance() {
        let config = SimulationConfig::default();
        let spawner = Spawner::new(&config, config.camera.position);
        let mut rng = sim_rng(Some(3));
        for _ in 0..500 {
            let placement = spawner.place(&mut rng);
            assert!(placement.satisfied);
            assert!(placement.position.distance(config.camera.position) >= 8.0);
            assert!(placement.position.abs().max_element() <= 25.0);
        }
    }

    #[test]
    fn impossible_threshold_falls_back_after_budget() {
        let mut config = SimulationConfig::default();
        config.spawn.distance_threshold = Some(1_000.0);
        config.spawn.max_attempts = 5;
        let spawner = Spawner::new(&config, config.camera.position);
        let mut rng = sim_rng(Some(3));
        let placement = spawner.place(&mut rng);
        assert!(!placement.satisfied);
        assert_eq!(placement.attempts, 5);
        assert!(placement.position.is_finite());
    }

    #[test]
    fn no_threshold_accepts_first_sample() {
        let mut config = SimulationConfig::default();
        config.spawn.distance_threshold = None;
        let spawner = Spawner::new(&config, config.camera.position);
        let placement = spawner.place(&mut sim_rng(Some(9)));
        assert_eq!(placement.attempts, 1);
    }

    #[test]
    fn full_size_spawn_has_no_transition() {
        let config = SimulationConfig::default();
        let mut registry = registry(&config);
        let spawner = Spawner::new(&config, config.camera.position);
        let id = spawner.spawn(&mut registry, &mut sim_rng(Some(1)), 1.0, Duration::ZERO);

        let entity = registry.get(id).unwrap();
        assert_eq!(entity.scale(), 1.0);
        assert!(entity.transition().is_none());
        assert_eq!(registry.scene().get(entity.visual()).unwrap().scale, 1.0);
        assert!(registry.is_consistent());
    }

    #[test]
    fn zero_scale_spawn_scales_in() {
        let config = SimulationConfig::default();
        let mut registry = registry(&config);
        let spawner = Spawner::new(&config, config.camera.position);
        let now = Duration::from_secs(3);
        let id = spawner.spawn(&mut registry, &mut sim_rng(Some(1)), 0.0, now);

        let transition = *registry.get(id).unwrap().transition().unwrap();
        assert_eq!(transition.target(), 1.0);
        assert_eq!(transition.finishes_at(), now + Duration::from_millis(500));
        assert_eq!(registry.scene().get(registry.get(id).unwrap().visual()).unwrap().scale, 0.0);
    }

    #[test]
    fn spawn_seeds_bounded_drift() {
        let config = SimulationConfig::default();
        let mut registry = registry(&config);
        let spawner = Spawner::new(&config, config.camera.position);
        let mut rng = sim_rng(Some(11));
        for _ in 0..20 {
            spawner.spawn(&mut registry, &mut rng, 1.0, Duration::ZERO);
        }
        // Impulse bounded by 500 per axis on a 300 kg body.
        let bound = 500.0 / 300.0 * 3f32.sqrt() + 1e-4;
        let mut moving = 0;
        for (_, body) in registry.physics().iter() {
            let speed = body.velocity.length();
            assert!(speed <= bound);
            if speed > 0.0 {
                moving += 1;
            }
        }
        assert_eq!(moving, 20);
    }
}
