//! Input source: pointer, focus and resize events
//!
//! Window-system agnostic. The runtime translates its native events into
//! [`InputEvent`]s; `InputState` remembers the viewport so pointer pixels can
//! be mapped to normalized device coordinates.

use drift_core::camera::pointer_ndc;
use drift_core::math::Vec2;
use drift_core::SimulationContext;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer position in window pixels, origin top-left
    PointerMoved { x: f64, y: f64 },
    FocusChanged(bool),
    Resized { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputState {
    pub width: u32,
    pub height: u32,
    /// Last pointer position in NDC, if the pointer has moved at all
    pub pointer: Option<Vec2>,
    pub focused: bool,
}

impl InputState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pointer: None,
            focused: true,
        }
    }

    /// Record `event` and forward its effect to the simulation.
    pub fn apply(&mut self, event: InputEvent, context: &mut SimulationContext) {
        match event {
            InputEvent::PointerMoved { x, y } => {
                if let Some(ndc) = pointer_ndc(x, y, self.width, self.height) {
                    self.pointer = Some(ndc);
                    context.set_pointer_ndc(ndc);
                }
            }
            InputEvent::FocusChanged(focused) => {
                self.focused = focused;
                context.set_focused(focused);
            }
            InputEvent::Resized { width, height } => {
                if context.resize(width, height) {
                    self.width = width;
                    self.height = height;
                } else {
                    tracing::debug!(width, height, "ignoring zero-sized viewport");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::math::Vec3;
    use drift_core::SimulationConfig;
    use std::time::Duration;

    fn context() -> SimulationContext {
        let config = SimulationConfig {
            sphere_count: 3,
            seed: Some(1),
            ..Default::default()
        };
        SimulationContext::new(config, Duration::ZERO).unwrap()
    }

    #[test]
    fn pointer_pixels_become_world_target() {
        let mut context = context();
        let mut input = InputState::new(800, 600);
        input.apply(InputEvent::PointerMoved { x: 800.0, y: 0.0 }, &mut context);
        assert_eq!(input.pointer, Some(Vec2::new(1.0, 1.0)));
        assert_eq!(context.pointer(), Vec3::new(5.0, 5.0, 0.0));
    }

    #[test]
    fn focus_toggles_simulation() {
        let mut context = context();
        let mut input = InputState::new(800, 600);
        input.apply(InputEvent::FocusChanged(false), &mut context);
        assert!(!context.is_focused());
        input.apply(InputEvent::FocusChanged(true), &mut context);
        assert!(context.is_focused());
    }

    #[test]
    fn resize_changes_pointer_mapping() {
        let mut context = context();
        let mut input = InputState::new(800, 600);
        input.apply(InputEvent::Resized { width: 400, height: 400 }, &mut context);
        input.apply(InputEvent::PointerMoved { x: 200.0, y: 200.0 }, &mut context);
        assert_eq!(context.pointer(), Vec3::ZERO);
        assert_eq!(context.camera().aspect, 1.0);

        input.apply(InputEvent::Resized { width: 0, height: 0 }, &mut context);
        assert_eq!((input.width, input.height), (400, 400));
    }
}
