//! Visual scene and the render surface seam
//!
//! The scene is what a renderer draws: one `Visual` per sphere with its
//! transform, uniform scale and color. Renderers only ever read it.

use crate::camera::Camera;
use crate::handle::{Arena, Handle};
use crate::math::{Quat, Vec3};

pub type VisualHandle = Handle<Visual>;

/// Linear RGB color in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Hue in degrees, saturation and lightness in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    pub fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Convert to sRGB-encoded RGB.
    pub fn to_srgb(self) -> Rgb {
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let s = self.saturation.clamp(0.0, 1.0);
        let l = self.lightness.clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        Rgb {
            r: r + m,
            g: g + m,
            b: b + m,
        }
    }

    /// Convert to linear RGB for shading.
    pub fn to_linear(self) -> Rgb {
        let srgb = self.to_srgb();
        Rgb {
            r: srgb_to_linear(srgb.r),
            g: srgb_to_linear(srgb.g),
            b: srgb_to_linear(srgb.b),
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Renderable sphere
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub position: Vec3,
    pub orientation: Quat,
    /// Uniform scale factor applied to the base radius
    pub scale: f32,
    /// Base radius before scaling
    pub radius: f32,
    pub color: Rgb,
}

#[derive(Default)]
pub struct Scene {
    visuals: Arena<Visual>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, visual: Visual) -> VisualHandle {
        self.visuals.insert(visual)
    }

    /// Remove a visual. Returns `false` for stale handles.
    pub fn remove(&mut self, handle: VisualHandle) -> bool {
        self.visuals.remove(handle).is_some()
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&Visual> {
        self.visuals.get(handle)
    }

    pub fn get_mut(&mut self, handle: VisualHandle) -> Option<&mut Visual> {
        self.visuals.get_mut(handle)
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (VisualHandle, &Visual)> {
        self.visuals.iter()
    }
}

/// A surface that can draw the scene.
pub trait Renderer {
    type Error;

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), Self::Error>;
}

/// Renderer that draws nothing and counts frames (headless hosts, tests)
#[derive(Debug, Default)]
pub struct NullRenderer {
    frames: u64,
    last_visible: usize,
}

impl NullRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Visuals with non-zero scale in the last rendered frame
    pub fn last_visible(&self) -> usize {
        self.last_visible
    }
}

impl Renderer for NullRenderer {
    type Error = std::convert::Infallible;

    fn render(&mut self, scene: &Scene, _camera: &Camera) -> Result<(), Self::Error> {
        self.frames += 1;
        self.last_visible = scene.iter().filter(|(_, v)| v.scale > 0.0).count();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn primary_hues_convert() {
        let red = Hsl::new(0.0, 1.0, 0.5).to_srgb();
        assert_abs_diff_eq!(red.r, 1.0);
        assert_abs_diff_eq!(red.g, 0.0);
        assert_abs_diff_eq!(red.b, 0.0);

        let green = Hsl::new(120.0, 1.0, 0.5).to_srgb();
        assert_abs_diff_eq!(green.g, 1.0);
        assert_abs_diff_eq!(green.r, 0.0);

        let blue = Hsl::new(240.0, 1.0, 0.5).to_srgb();
        assert_abs_diff_eq!(blue.b, 1.0);
    }

    #[test]
    fn pastel_lightness_stays_in_range() {
        for hue in (0..360).step_by(15) {
            let c = Hsl::new(hue as f32, 1.0, 0.7).to_srgb();
            for channel in c.to_array() {
                assert!((0.4 - 1e-5..=1.0 + 1e-5).contains(&channel));
            }
        }
    }

    #[test]
    fn full_circle_wraps() {
        assert_eq!(Hsl::new(360.0, 1.0, 0.5).to_srgb(), Hsl::new(0.0, 1.0, 0.5).to_srgb());
    }

    #[test]
    fn null_renderer_counts_visible() {
        let mut scene = Scene::new();
        let visual = Visual {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: 1.0,
            radius: 1.0,
            color: Hsl::new(0.0, 1.0, 0.5).to_srgb(),
        };
        scene.add(visual.clone());
        scene.add(Visual {
            scale: 0.0,
            ..visual
        });

        let mut renderer = NullRenderer::new();
        renderer.render(&scene, &Camera::default()).unwrap();
        assert_eq!(renderer.frames(), 1);
        assert_eq!(renderer.last_visible(), 1);
    }
}
