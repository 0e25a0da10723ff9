//! Perspective camera and pointer mapping

use crate::config::CameraConfig;
use crate::math::{Mat4, Vec2, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Viewpoint used for spawn rejection and repulsion
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: config.position,
            target: Vec3::ZERO,
            fov_y_degrees: config.fov_y_degrees,
            aspect: 16.0 / 9.0,
            near: config.near,
            far: config.far,
        }
    }

    /// Update the aspect ratio for a new viewport. Zero-sized viewports
    /// (minimized windows) are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect = width as f32 / height as f32;
        true
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

/// Convert a window pixel position to normalized device coordinates
/// (x right, y up, both in [-1, 1]).
pub fn pointer_ndc(x: f64, y: f64, width: u32, height: u32) -> Option<Vec2> {
    if width == 0 || height == 0 {
        return None;
    }
    let nx = (x / width as f64) * 2.0 - 1.0;
    let ny = -(y / height as f64) * 2.0 + 1.0;
    Some(Vec2::new(nx as f32, ny as f32))
}

/// Map NDC onto the z = 0 plane, `scale` world units per NDC unit.
pub fn pointer_target(ndc: Vec2, scale: f32) -> Vec3 {
    Vec3::new(ndc.x * scale, ndc.y * scale, 0.0)
}
