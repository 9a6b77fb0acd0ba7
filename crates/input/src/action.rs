use glam::Vec2;

/// Logical keys the game reacts to. Everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    RotateLeft,
    RotateRight,
}

impl LogicalKey {
    /// Map a platform key name (`"a"`, `"ArrowLeft"`, ...) to a logical key.
    /// Matching is case-insensitive.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a" | "arrowleft" => Some(Self::RotateLeft),
            "d" | "arrowright" => Some(Self::RotateRight),
            _ => None,
        }
    }
}

/// A raw event delivered by the input source.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown(LogicalKey),
    KeyUp(LogicalKey),
    PointerDown,
    /// Pointer movement since the previous move event. Missing deltas are zero.
    PointerMove { dx: f32, dy: f32 },
    PointerUp,
    PointerLeave,
    /// Wheel delta; positive zooms out.
    Wheel(f32),
    Resize { width: u32, height: u32 },
}

impl InputEvent {
    /// Build a key-down event from a key name, if the key is bound.
    pub fn key_down(name: &str) -> Option<Self> {
        LogicalKey::from_key_name(name).map(Self::KeyDown)
    }

    /// Build a key-up event from a key name, if the key is bound.
    pub fn key_up(name: &str) -> Option<Self> {
        LogicalKey::from_key_name(name).map(Self::KeyUp)
    }

    /// Build a pointer-move event; absent deltas count as zero.
    pub fn pointer_move(dx: Option<f32>, dy: Option<f32>) -> Self {
        Self::PointerMove {
            dx: dx.unwrap_or(0.0),
            dy: dy.unwrap_or(0.0),
        }
    }
}

/// A discrete action produced by an input event.
///
/// Held state (rotation keys, dragging) lives in `InputState`; actions are the
/// one-shot effects the session applies immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Screen-space drag of the player by a pointer delta.
    Drag(Vec2),
    /// Change the camera distance by a wheel delta.
    Zoom(f32),
    /// The output surface changed size.
    Resize { width: u32, height: u32 },
}
