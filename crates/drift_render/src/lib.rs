//! Drift Render
//!
//! Window helpers and the instanced wgpu sphere renderer

pub mod mesh;
pub mod renderer;
pub mod window;

pub use renderer::{RenderError, SphereRenderer};

pub use wgpu;
pub use winit;
