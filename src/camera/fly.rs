use glam::{Vec2, Vec3};

use crate::{
    camera::core::{Camera, CameraUniform},
    chem::InstanceDescriptor,
    input::KeyAction,
    options::CameraOptions,
};

/// Pitch stays short of straight up/down so `look_at` keeps a valid up.
const MAX_PITCH: f32 = 1.553_343; // 89 degrees
const MIN_SPEED: f32 = 0.1;
const MAX_SPEED: f32 = 1000.0;

/// Movement keys currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementState {
    /// Along the view direction.
    pub forward: bool,
    /// Against the view direction.
    pub back: bool,
    /// Strafe left.
    pub left: bool,
    /// Strafe right.
    pub right: bool,
    /// World up.
    pub up: bool,
    /// World down.
    pub down: bool,
}

impl MovementState {
    /// Record a press/release of a movement action.
    ///
    /// Returns `false` for actions that are not movement.
    pub fn apply(&mut self, action: KeyAction, pressed: bool) -> bool {
        let flag = match action {
            KeyAction::MoveForward => &mut self.forward,
            KeyAction::MoveBack => &mut self.back,
            KeyAction::MoveLeft => &mut self.left,
            KeyAction::MoveRight => &mut self.right,
            KeyAction::MoveUp => &mut self.up,
            KeyAction::MoveDown => &mut self.down,
            _ => return false,
        };
        *flag = pressed;
        true
    }

    /// Whether any movement key is held.
    pub fn is_moving(&self) -> bool {
        self.forward
            || self.back
            || self.left
            || self.right
            || self.up
            || self.down
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}

/// Free-fly camera: WASD-style translation plus yaw/pitch mouse look.
pub struct FlyCamera {
    /// Camera derived from position/yaw/pitch after every change.
    pub camera: Camera,
    position: Vec3,
    yaw: f32,
    pitch: f32,
    move_speed: f32,
    look_sensitivity: f32,
    speed_step: f32,
    home: (Vec3, f32, f32),
}

impl FlyCamera {
    /// Camera at `position` looking down -Z.
    pub fn new(options: &CameraOptions, position: Vec3, aspect: f32) -> Self {
        let yaw = -90.0_f32.to_radians();
        let mut fly = Self {
            camera: Camera {
                eye: position,
                target: position - Vec3::Z,
                up: Vec3::Y,
                aspect,
                fovy: options.fovy,
                znear: options.znear,
                zfar: options.zfar,
            },
            position,
            yaw,
            pitch: 0.0,
            move_speed: options.move_speed,
            look_sensitivity: options.look_sensitivity,
            speed_step: options.speed_step,
            home: (position, yaw, 0.0),
        };
        fly.update_camera();
        fly
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
    }

    /// Unit strafe direction.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    /// Eye position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Pitch in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// World units per second.
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    fn update_camera(&mut self) {
        self.camera.eye = self.position;
        self.camera.target = self.position + self.forward();
        self.camera.up = Vec3::Y;
    }

    /// Integrate held movement keys over `dt` seconds.
    pub fn step(&mut self, dt: f32, movement: &MovementState) {
        let direction = self.forward()
            * axis(movement.forward, movement.back)
            + self.right() * axis(movement.right, movement.left)
            + Vec3::Y * axis(movement.up, movement.down);

        if let Some(direction) = direction.try_normalize() {
            self.position += direction * self.move_speed * dt;
            self.update_camera();
        }
    }

    /// Turn by a mouse delta in pixels.
    pub fn look(&mut self, delta: Vec2) {
        let scale = self.look_sensitivity.to_radians();
        self.yaw += delta.x * scale;
        self.pitch =
            (self.pitch - delta.y * scale).clamp(-MAX_PITCH, MAX_PITCH);
        self.update_camera();
    }

    /// Multiply the movement speed by `speed_step` per wheel notch.
    pub fn adjust_speed(&mut self, notches: f32) {
        self.move_speed = (self.move_speed * self.speed_step.powf(notches))
            .clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Place the camera so every instance is in view, and make that the
    /// reset position.
    pub fn frame_instances(&mut self, instances: &[InstanceDescriptor]) {
        let Some((center, radius)) = bounding_sphere(instances) else {
            return;
        };

        // Set distance to fit the bounding sphere in view, with padding.
        let fovy_rad = self.camera.fovy.to_radians();
        let distance = radius / (fovy_rad / 2.0).tan() * 1.5;

        self.position = center + Vec3::Z * distance;
        self.yaw = -90.0_f32.to_radians();
        self.pitch = 0.0;
        self.camera.zfar = self.camera.zfar.max((distance + radius) * 2.0);
        self.home = (self.position, self.yaw, self.pitch);
        self.update_camera();
    }

    /// Return to the framed (or initial) viewpoint.
    pub fn reset(&mut self) {
        (self.position, self.yaw, self.pitch) = self.home;
        self.update_camera();
    }

    /// Viewport size changed.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }

    /// Copy the current view into `uniform`.
    pub fn write_uniform(&self, uniform: &mut CameraUniform) {
        uniform.update_view_proj(&self.camera);
    }
}

/// Centroid and enclosing radius (sphere radii included) of `instances`.
#[must_use]
pub fn bounding_sphere(
    instances: &[InstanceDescriptor],
) -> Option<(Vec3, f32)> {
    if instances.is_empty() {
        return None;
    }
    let centroid = instances.iter().map(|i| i.position).sum::<Vec3>()
        / instances.len() as f32;
    let radius = instances
        .iter()
        .map(|i| (i.position - centroid).length() + i.radius)
        .fold(0.0_f32, f32::max);
    Some((centroid, radius))
}
