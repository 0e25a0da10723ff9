//! Drift Services Layer
//!
//! Host-facing plumbing around the simulation core: settings files and the
//! input source (pointer, focus and resize events).

pub mod input;
pub mod settings;

pub use input::{InputEvent, InputState};
pub use settings::{Settings, SettingsError, WindowSettings};
