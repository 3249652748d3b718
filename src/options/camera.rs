use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection and fly-control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance. Framing a structure may push it out.
    pub zfar: f32,
    /// Fly speed in scene units per second.
    pub move_speed: f32,
    /// Mouse-look degrees per pixel.
    pub look_sensitivity: f32,
    /// Speed multiplier per scroll-wheel notch.
    pub speed_step: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 0.1,
            zfar: 2000.0,
            move_speed: 20.0,
            look_sensitivity: 0.15,
            speed_step: 1.2,
        }
    }
}
