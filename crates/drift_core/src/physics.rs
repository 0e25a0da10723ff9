//! Rigid-body world for the sphere field
//!
//! A thin wrapper over a rapier3d pipeline. Each sphere is one dynamic body
//! with a single ball collider. Callers only ever see glam types and
//! [`BodyHandle`]s; rapier's nalgebra types stay inside this module.
//!
//! User forces persist in rapier until reset, so [`PhysicsWorld::step`]
//! clears them after every step: a force applied between two steps is
//! integrated exactly once.

use std::num::NonZeroUsize;

use rapier3d::prelude::{
    CCDSolver, ColliderBuilder, ColliderSet, DefaultBroadPhase, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline, Point,
    QueryPipeline, Real, RigidBody, RigidBodyBuilder, RigidBodyHandle, RigidBodySet, Rotation,
    Vector,
};

use crate::config::PhysicsConfig;
use crate::math::{Quat, Vec3};

/// Handle to a body in a [`PhysicsWorld`]. Stale after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// Creation parameters for a dynamic sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub position: Vec3,
    pub mass: f32,
    pub radius: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

/// Kinematic state of a body at the last step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

pub struct PhysicsWorld {
    gravity: Vector<Real>,
    friction: f32,
    restitution: f32,
    integration: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    queries: QueryPipeline,
}

impl PhysicsWorld {
    pub fn new(config: &PhysicsConfig) -> Self {
        let mut integration = IntegrationParameters::default();
        integration.dt = crate::time::FIXED_TIMESTEP;
        integration.num_solver_iterations =
            NonZeroUsize::new(config.solver_iterations as usize).unwrap_or(NonZeroUsize::MIN);

        Self {
            gravity: to_vector(config.gravity),
            friction: config.friction,
            restitution: config.restitution,
            integration,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            queries: QueryPipeline::new(),
        }
    }

    pub fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(desc.position))
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .can_sleep(false)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::ball(desc.radius)
            .mass(desc.mass)
            .restitution(self.restitution)
            .friction(self.friction)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        // Mass properties must be current before the first impulse.
        if let Some(body) = self.bodies.get_mut(handle) {
            body.recompute_mass_properties_from_colliders(&self.colliders);
        }
        BodyHandle(handle)
    }

    /// Remove a body and its collider. Returns `false` for stale handles.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.bodies
            .remove(
                handle.0,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<BodyState> {
        self.bodies.get(handle.0).map(state_of)
    }

    /// Apply `force` at `relative_point` (world-space offset from the
    /// center) for the next step only.
    pub fn apply_force(
        &mut self,
        handle: BodyHandle,
        force: Vec3,
        relative_point: Vec3,
    ) -> bool {
        let Some(body) = self.bodies.get_mut(handle.0) else {
            return false;
        };
        let point = Point::from(body.translation() + to_vector(relative_point));
        body.add_force_at_point(to_vector(force), point, true);
        true
    }

    /// Instantaneous change of momentum at `relative_point`.
    pub fn apply_impulse(
        &mut self,
        handle: BodyHandle,
        impulse: Vec3,
        relative_point: Vec3,
    ) -> bool {
        let Some(body) = self.bodies.get_mut(handle.0) else {
            return false;
        };
        let point = Point::from(body.translation() + to_vector(relative_point));
        body.apply_impulse_at_point(to_vector(impulse), point, true);
        true
    }

    /// Overwrite the linear velocity, e.g. after a speed clamp.
    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec3) -> bool {
        let Some(body) = self.bodies.get_mut(handle.0) else {
            return false;
        };
        body.set_linvel(to_vector(velocity), true);
        true
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, BodyState)> + '_ {
        self.bodies
            .iter()
            .map(|(handle, body)| (BodyHandle(handle), state_of(body)))
    }

    /// Advance the world by `dt` seconds. Non-finite or non-positive steps
    /// are ignored.
    pub fn step(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        self.integration.dt = dt;

        self.pipeline.step(
            &self.gravity,
            &self.integration,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            Some(&mut self.queries),
            &(),
            &(),
        );

        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
            body.reset_torques(false);
        }
    }
}

fn state_of(body: &RigidBody) -> BodyState {
    BodyState {
        position: to_vec3(body.translation()),
        orientation: to_quat(body.rotation()),
        velocity: to_vec3(body.linvel()),
        angular_velocity: to_vec3(body.angvel()),
    }
}

fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn to_quat(rotation: &Rotation<Real>) -> Quat {
    let q = rotation.quaternion();
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}
