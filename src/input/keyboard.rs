use serde::{Deserialize, Serialize};

/// Viewer actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML files stay readable:
/// ```toml
/// [keybindings.bindings]
/// move_forward = "KeyW"
/// reset_camera = "KeyR"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Fly along the view direction.
    MoveForward,
    /// Fly against the view direction.
    MoveBack,
    /// Strafe left.
    MoveLeft,
    /// Strafe right.
    MoveRight,
    /// Rise along world up.
    MoveUp,
    /// Sink along world up.
    MoveDown,
    /// Return to the framed view.
    ResetCamera,
    /// Close the viewer.
    Quit,
}

impl KeyAction {
    /// Whether the action is held (movement) rather than triggered once.
    #[must_use]
    pub const fn is_movement(self) -> bool {
        matches!(
            self,
            Self::MoveForward
                | Self::MoveBack
                | Self::MoveLeft
                | Self::MoveRight
                | Self::MoveUp
                | Self::MoveDown
        )
    }
}
