//! Drift Core
//!
//! Simulation core of the sphere field:
//! - Rigid-body world and visual scene, paired by the body registry
//! - Spawner, scale transitions and the lifecycle scheduler
//! - Force model (pointer attraction, viewpoint repulsion, speed clamp)
//! - Fixed-step simulation context driven once per frame

pub mod camera;
pub mod config;
pub mod context;
pub mod force;
mod handle;
pub mod lifecycle;
pub mod math;
pub mod physics;
pub mod registry;
pub mod scene;
pub mod spawner;
pub mod time;
pub mod transition;

pub use glam;

pub use camera::Camera;
pub use config::{ConfigError, SimulationConfig};
pub use context::{FrameReport, SimulationContext};
pub use handle::Handle;
pub use registry::{Entity, EntityId, Registry};
pub use scene::{NullRenderer, Renderer, Scene, Visual};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
