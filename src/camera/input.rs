use glam::Vec2;
use winit::{
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::PhysicalKey,
};

use crate::{
    camera::fly::{FlyCamera, MovementState},
    input::KeyAction,
    options::KeybindingOptions,
};

/// Maps window events onto a [`FlyCamera`].
///
/// Movement keys are held state consumed by [`FlyCamera::step`]; mouse
/// look applies immediately while the left button is down.
pub struct InputHandler {
    last_mouse_pos: Option<Vec2>,
    looking: bool,
    movement: MovementState,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Handler with nothing held.
    pub fn new() -> Self {
        Self {
            last_mouse_pos: None,
            looking: false,
            movement: MovementState::default(),
        }
    }

    /// Movement keys currently held.
    pub fn movement(&self) -> &MovementState {
        &self.movement
    }

    /// Feed one window event.
    ///
    /// Returns the bound action for a key press that is not movement
    /// (reset, quit), for the caller to execute.
    pub fn handle_event(
        &mut self,
        camera: &mut FlyCamera,
        bindings: &KeybindingOptions,
        event: &WindowEvent,
    ) -> Option<KeyAction> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                let action = bindings.lookup(&format!("{code:?}"))?;
                let pressed = event.state == ElementState::Pressed;
                if self.movement.apply(action, pressed)
                    || !pressed
                    || event.repeat
                {
                    None
                } else {
                    Some(action)
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.looking = *state == ElementState::Pressed;
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                let current_pos =
                    Vec2::new(position.x as f32, position.y as f32);
                if let Some(last) = self.last_mouse_pos.replace(current_pos) {
                    if self.looking {
                        camera.look(current_pos - last);
                    }
                }
                None
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_mouse_pos = None;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                camera.adjust_speed(notches);
                None
            }
            WindowEvent::Focused(false) => {
                self.movement = MovementState::default();
                self.looking = false;
                None
            }
            _ => None,
        }
    }
}
