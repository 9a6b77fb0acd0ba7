use glam::Vec2;

use crate::action::{Action, InputEvent, LogicalKey};

/// Held input state, updated by event handlers and sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub dragging: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a raw event. Returns the one-shot action it triggers, if any.
    ///
    /// Pointer movement only becomes a drag while a pointer button is down.
    pub fn apply(&mut self, event: &InputEvent) -> Option<Action> {
        match *event {
            InputEvent::KeyDown(key) => {
                self.set_key(key, true);
                None
            }
            InputEvent::KeyUp(key) => {
                self.set_key(key, false);
                None
            }
            InputEvent::PointerDown => {
                self.dragging = true;
                None
            }
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.dragging = false;
                None
            }
            InputEvent::PointerMove { dx, dy } => {
                if self.dragging {
                    Some(Action::Drag(Vec2::new(dx, dy)))
                } else {
                    None
                }
            }
            InputEvent::Wheel(delta) => Some(Action::Zoom(delta)),
            InputEvent::Resize { width, height } => Some(Action::Resize { width, height }),
        }
    }

    /// Net rotation direction: +1 left, -1 right, 0 for none or both.
    pub fn rotation_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.rotate_left {
            axis += 1.0;
        }
        if self.rotate_right {
            axis -= 1.0;
        }
        axis
    }

    fn set_key(&mut self, key: LogicalKey, down: bool) {
        tracing::trace!(?key, down, "key state");
        match key {
            LogicalKey::RotateLeft => self.rotate_left = down,
            LogicalKey::RotateRight => self.rotate_right = down,
        }
    }
}
