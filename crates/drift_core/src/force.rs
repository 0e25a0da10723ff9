//! Force model: pointer attraction, viewpoint repulsion, speed clamp
//!
//! Attraction is `(pointer - position) * gain` where the gain is either
//! constant or `min(k / distance, max_gain)`. Repulsion pushes along the
//! viewpoint-to-sphere direction with constant magnitude while the sphere
//! is closer than the threshold. Both act at the center of mass.

use crate::config::{Attraction, ForceConfig, RepulsionConfig};
use crate::math::{clamp_length, Vec3};

/// Below this distance a direction cannot be formed and the term is skipped
const MIN_DISTANCE: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct ForceModel {
    attraction: Attraction,
    repulsion: Option<RepulsionConfig>,
    max_speed: f32,
}

impl ForceModel {
    pub fn new(config: &ForceConfig) -> Self {
        Self {
            attraction: config.attraction,
            repulsion: config.repulsion,
            max_speed: config.max_speed,
        }
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Gain applied to the pointer offset at `distance`.
    pub fn attraction_gain(&self, distance: f32) -> f32 {
        match self.attraction {
            Attraction::Constant { gain } => gain,
            Attraction::InverseDistance { gain, max_gain } => {
                if distance <= MIN_DISTANCE {
                    max_gain
                } else {
                    (gain / distance).min(max_gain)
                }
            }
        }
    }

    pub fn attraction(&self, position: Vec3, pointer: Vec3) -> Vec3 {
        let offset = pointer - position;
        offset * self.attraction_gain(offset.length())
    }

    /// Push away from the viewpoint; zero outside the threshold and when
    /// the sphere sits exactly on the viewpoint.
    pub fn repulsion(&self, position: Vec3, viewpoint: Vec3) -> Vec3 {
        let Some(repulsion) = self.repulsion else {
            return Vec3::ZERO;
        };
        let away = position - viewpoint;
        let distance = away.length();
        if distance >= repulsion.threshold || distance <= MIN_DISTANCE {
            return Vec3::ZERO;
        }
        away / distance * repulsion.strength
    }

    /// Total force on a sphere at `position`.
    pub fn compute(&self, position: Vec3, pointer: Vec3, viewpoint: Vec3) -> Vec3 {
        self.attraction(position, pointer) + self.repulsion(position, viewpoint)
    }

    /// Hard speed limit: rescale to exactly `max_speed` when above it.
    pub fn clamp_velocity(&self, velocity: Vec3) -> Vec3 {
        clamp_length(velocity, self.max_speed)
    }
}
