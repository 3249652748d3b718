use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Background and shading.
pub struct DisplayOptions {
    /// Clear color, linear RGB.
    pub background: [f32; 3],
    /// Ambient light fraction in `[0, 1]`.
    pub ambient: f32,
    /// Specular exponent of the headlight.
    pub shininess: f32,
    /// Wait for vertical sync when presenting.
    pub vsync: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            background: [0.05, 0.05, 0.08],
            ambient: 0.25,
            shininess: 32.0,
            vsync: true,
        }
    }
}
