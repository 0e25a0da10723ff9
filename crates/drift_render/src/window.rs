//! Window management
//!
//! Cross-platform window creation via winit

use winit::{
    error::EventLoopError,
    event_loop::{ControlFlow, EventLoop},
    window::Window,
};

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Driftfield".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Create window attributes from config
pub fn window_attributes(config: &WindowConfig) -> winit::window::WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
}

/// Event loop that keeps polling so the field animates every refresh.
///
/// In winit 0.30+ windows must be created inside `ApplicationHandler::resumed`.
pub fn create_event_loop() -> Result<EventLoop<()>, EventLoopError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    Ok(event_loop)
}
