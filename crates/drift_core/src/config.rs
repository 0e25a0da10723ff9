//! Simulation configuration
//!
//! Every tunable of the field lives here. Defaults reproduce the reference
//! look: 30 spheres of radius 2.5 drifting in a 50-unit cube, pulled toward
//! the pointer and pushed away from the camera.

use crate::math::Vec3;
use crate::time::secs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors reported by [`SimulationConfig::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("'{field}' must be finite and greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("'{field}' must be finite and not negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("'{field}' must lie in [0, 1] (got {value})")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("'{field}' must be finite")]
    NotFinite { field: &'static str },

    #[error("'{field}' must not exceed {max} seconds (got {value})")]
    TooLong {
        field: &'static str,
        value: f32,
        max: f32,
    },

    #[error("spawn.max_attempts must be at least 1")]
    NoSpawnAttempts,
}

/// Longest accepted transition or lifecycle period, in seconds
pub const MAX_DURATION_SECS: f32 = 1.0e6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Steady-state population
    pub sphere_count: usize,
    pub sphere_radius: f32,
    pub sphere_mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub spawn: SpawnConfig,
    pub forces: ForceConfig,
    /// Physics step in seconds, independent of frame timing
    pub fixed_timestep: f32,
    /// Length of scale-in and scale-out transitions in seconds
    pub transition_secs: f32,
    /// `None` disables periodic replacement
    pub lifecycle: Option<LifecycleConfig>,
    /// World units per NDC unit when mapping the pointer onto the z = 0 plane
    pub pointer_scale: f32,
    pub camera: CameraConfig,
    pub physics: PhysicsConfig,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sphere_count: 30,
            sphere_radius: 2.5,
            sphere_mass: 300.0,
            linear_damping: 0.01,
            angular_damping: 0.2,
            spawn: SpawnConfig::default(),
            forces: ForceConfig::default(),
            fixed_timestep: crate::time::FIXED_TIMESTEP,
            transition_secs: 0.5,
            lifecycle: Some(LifecycleConfig::default()),
            pointer_scale: 5.0,
            camera: CameraConfig::default(),
            physics: PhysicsConfig::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Half the side of the spawn cube centered on the origin
    pub half_extent: f32,
    /// Minimum distance from the viewpoint; `None` accepts any point
    pub distance_threshold: Option<f32>,
    /// Rejection-sampling budget before the last sample is accepted
    pub max_attempts: u32,
    /// Per-axis bound of the random initial impulse
    pub impulse: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            half_extent: 25.0,
            distance_threshold: Some(8.0),
            max_attempts: 64,
            impulse: 500.0,
            saturation: 1.0,
            lightness: 0.7,
        }
    }
}

/// Gain applied to the pointer offset `(pointer - position)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attraction {
    /// `gain` regardless of distance
    Constant { gain: f32 },
    /// `min(gain / distance, max_gain)`; bounded near the pointer
    InverseDistance { gain: f32, max_gain: f32 },
}

impl Default for Attraction {
    fn default() -> Self {
        Attraction::Constant { gain: 10.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepulsionConfig {
    /// Distance from the viewpoint below which the push applies
    pub threshold: f32,
    /// Constant magnitude of the push
    pub strength: f32,
}

impl Default for RepulsionConfig {
    fn default() -> Self {
        Self {
            threshold: 10.0,
            strength: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    pub attraction: Attraction,
    pub repulsion: Option<RepulsionConfig>,
    /// Hard post-step speed clamp
    pub max_speed: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            attraction: Attraction::default(),
            repulsion: Some(RepulsionConfig::default()),
            max_speed: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Wall-clock seconds between replacements
    pub period_secs: f32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self { period_secs: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Viewpoint used by spawn rejection and repulsion
    pub position: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 15.0),
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    pub friction: f32,
    pub restitution: f32,
    /// Velocity passes over the contact set per step
    pub solver_iterations: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::ZERO,
            friction: 0.0,
            restitution: 0.4,
            solver_iterations: 4,
        }
    }
}

impl SimulationConfig {
    /// Check every numeric field for values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("sphere_radius", self.sphere_radius)?;
        positive("sphere_mass", self.sphere_mass)?;
        unit("linear_damping", self.linear_damping)?;
        unit("angular_damping", self.angular_damping)?;

        positive("spawn.half_extent", self.spawn.half_extent)?;
        if let Some(threshold) = self.spawn.distance_threshold {
            non_negative("spawn.distance_threshold", threshold)?;
        }
        if self.spawn.max_attempts == 0 {
            return Err(ConfigError::NoSpawnAttempts);
        }
        non_negative("spawn.impulse", self.spawn.impulse)?;
        unit("spawn.saturation", self.spawn.saturation)?;
        unit("spawn.lightness", self.spawn.lightness)?;

        match self.forces.attraction {
            Attraction::Constant { gain } => non_negative("forces.attraction.gain", gain)?,
            Attraction::InverseDistance { gain, max_gain } => {
                non_negative("forces.attraction.gain", gain)?;
                non_negative("forces.attraction.max_gain", max_gain)?;
            }
        }
        if let Some(repulsion) = &self.forces.repulsion {
            non_negative("forces.repulsion.threshold", repulsion.threshold)?;
            non_negative("forces.repulsion.strength", repulsion.strength)?;
        }
        positive("forces.max_speed", self.forces.max_speed)?;

        positive("fixed_timestep", self.fixed_timestep)?;
        duration("transition_secs", self.transition_secs)?;
        if let Some(lifecycle) = &self.lifecycle {
            duration("lifecycle.period_secs", lifecycle.period_secs)?;
        }
        non_negative("pointer_scale", self.pointer_scale)?;

        if !self.camera.position.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "camera.position",
            });
        }
        positive("camera.fov_y_degrees", self.camera.fov_y_degrees)?;
        positive("camera.near", self.camera.near)?;
        positive("camera.far", self.camera.far)?;

        if !self.physics.gravity.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "physics.gravity",
            });
        }
        non_negative("physics.friction", self.physics.friction)?;
        unit("physics.restitution", self.physics.restitution)?;
        Ok(())
    }

    pub fn transition_duration(&self) -> Duration {
        secs(self.transition_secs)
    }

    pub fn lifecycle_period(&self) -> Option<Duration> {
        self.lifecycle.map(|l| secs(l.period_secs))
    }

    /// True when the spawn threshold reaches the cube corners, where
    /// rejection sampling can only succeed by luck or not at all.
    pub fn spawn_threshold_unreachable(&self) -> bool {
        let Some(threshold) = self.spawn.distance_threshold else {
            return false;
        };
        let half_diagonal = self.spawn.half_extent * 3f32.sqrt();
        threshold >= half_diagonal
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn duration(field: &'static str, value: f32) -> Result<(), ConfigError> {
    positive(field, value)?;
    if value <= MAX_DURATION_SECS {
        Ok(())
    } else {
        Err(ConfigError::TooLong {
            field,
            value,
            max: MAX_DURATION_SECS,
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}
