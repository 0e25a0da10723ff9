//! Simulation context and the per-frame step loop
//!
//! `SimulationContext` owns everything the field needs: registry (physics
//! world + scene), camera, pointer target, focus flag, RNG and the
//! lifecycle schedule. The host calls [`SimulationContext::frame`] once per
//! display refresh with the current wall-clock time.
//!
//! Per frame:
//! 1. Advance scale transitions (always, wall-clock driven)
//! 2. Complete due retirements and fire the lifecycle tick (always)
//! 3. If unfocused, stop here: no physics, no render
//! 4. Step physics by the fixed timestep, apply forces, clamp speed, sync visuals
//! 5. Render once

use crate::camera::{pointer_target, Camera};
use crate::config::{ConfigError, SimulationConfig};
use crate::force::ForceModel;
use crate::lifecycle::{complete_retirements, LifecycleReport, LifecycleScheduler};
use crate::math::{sim_rng, Vec2, Vec3};
use crate::physics::PhysicsWorld;
use crate::registry::{EntityId, Registry};
use crate::scene::Renderer;
use crate::spawner::Spawner;
use crate::time::SimulationTime;
use rand::rngs::StdRng;
use std::time::Duration;

/// Summary of one call to [`SimulationContext::frame`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Physics advanced and a render was issued
    pub stepped: bool,
    pub lifecycle: LifecycleReport,
}

pub struct SimulationContext {
    config: SimulationConfig,
    registry: Registry,
    spawner: Spawner,
    forces: ForceModel,
    camera: Camera,
    pointer: Vec3,
    focused: bool,
    rng: StdRng,
    time: SimulationTime,
    lifecycle: Option<LifecycleScheduler>,
}

impl SimulationContext {
    /// Build the context and spawn the initial population at full size.
    ///
    /// `now` is the host's wall-clock time at startup; the first lifecycle
    /// tick fires one period later.
    pub fn new(config: SimulationConfig, now: Duration) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.spawn_threshold_unreachable() {
            tracing::warn!(
                threshold = ?config.spawn.distance_threshold,
                half_extent = config.spawn.half_extent,
                "spawn distance threshold exceeds the spawn cube; placements will fall back"
            );
        }

        let camera = Camera::from_config(&config.camera);
        let registry = Registry::new(PhysicsWorld::new(&config.physics));
        let spawner = Spawner::new(&config, camera.position);
        let forces = ForceModel::new(&config.forces);
        let lifecycle = config
            .lifecycle_period()
            .map(|period| LifecycleScheduler::new(period, config.transition_duration(), now));

        let mut context = Self {
            rng: sim_rng(config.seed),
            config,
            registry,
            spawner,
            forces,
            camera,
            pointer: Vec3::ZERO,
            focused: true,
            time: SimulationTime::new(),
            lifecycle,
        };

        for _ in 0..context.config.sphere_count {
            context
                .spawner
                .spawn(&mut context.registry, &mut context.rng, 1.0, now);
        }

        tracing::info!(
            spheres = context.registry.len(),
            radius = context.config.sphere_radius,
            lifecycle = context.lifecycle.is_some(),
            "simulation context ready"
        );
        Ok(context)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn pointer(&self) -> Vec3 {
        self.pointer
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn time(&self) -> &SimulationTime {
        &self.time
    }

    pub fn forces(&self) -> &ForceModel {
        &self.forces
    }

    /// Set the attraction target directly in world space.
    pub fn set_pointer_target(&mut self, target: Vec3) {
        if target.is_finite() {
            self.pointer = target;
        }
    }

    /// Set the attraction target from normalized device coordinates.
    pub fn set_pointer_ndc(&mut self, ndc: Vec2) {
        self.set_pointer_target(pointer_target(ndc, self.config.pointer_scale));
    }

    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            tracing::debug!(focused, "focus changed");
        }
        self.focused = focused;
    }

    /// Track a viewport resize. Returns `false` for zero-sized viewports.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.camera.set_viewport(width, height)
    }

    /// Spawn one extra sphere outside the lifecycle (population grows by one).
    pub fn spawn(&mut self, initial_scale: f32, now: Duration) -> EntityId {
        self.spawner
            .spawn(&mut self.registry, &mut self.rng, initial_scale, now)
    }

    /// Run one frame at wall-clock time `now`.
    pub fn frame<R: Renderer>(
        &mut self,
        now: Duration,
        renderer: &mut R,
    ) -> Result<FrameReport, R::Error> {
        self.advance_transitions(now);
        let lifecycle = self.run_lifecycle(now);

        if !self.focused {
            return Ok(FrameReport {
                stepped: false,
                lifecycle,
            });
        }

        self.step();
        renderer.render(self.registry.scene(), &self.camera)?;

        Ok(FrameReport {
            stepped: true,
            lifecycle,
        })
    }

    /// One fixed physics step followed by forces, speed clamp and visual sync.
    ///
    /// Forces applied here are integrated by the next step.
    pub fn step(&mut self) {
        let dt = self.config.fixed_timestep;
        self.registry.physics_mut().step(dt);
        self.time.advance_tick(dt);

        let pointer = self.pointer;
        let viewpoint = self.camera.position;
        let (entities, physics, scene) = self.registry.parts_mut();
        for entity in entities.iter() {
            let Some(body) = physics.body(entity.body()) else {
                continue;
            };

            let force = self.forces.compute(body.position, pointer, viewpoint);
            physics.apply_force(entity.body(), force, Vec3::ZERO);
            let velocity = self.forces.clamp_velocity(body.velocity);
            if velocity != body.velocity {
                physics.set_velocity(entity.body(), velocity);
            }

            if let Some(visual) = scene.get_mut(entity.visual()) {
                visual.position = body.position;
                visual.orientation = body.orientation;
            }
        }
    }

    fn advance_transitions(&mut self, now: Duration) {
        let (entities, _, scene) = self.registry.parts_mut();
        for entity in entities.iter_mut() {
            if let Some(scale) = entity.advance_transition(now) {
                if let Some(visual) = scene.get_mut(entity.visual()) {
                    visual.scale = scale;
                }
            }
        }
    }

    fn run_lifecycle(&mut self, now: Duration) -> LifecycleReport {
        let replaced = complete_retirements(&mut self.registry, &self.spawner, &mut self.rng, now);

        let mut retiring = None;
        if let Some(scheduler) = self.lifecycle.as_mut() {
            if scheduler.poll(now) {
                retiring = scheduler.retire_random(&mut self.registry, &mut self.rng, now);
            }
        }

        LifecycleReport { retiring, replaced }
    }
}
