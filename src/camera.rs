//! Perspective camera and orbital motion.

use glam::{Quat, Vec2, Vec3};

const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 100.0;
const MAX_ELEVATION: f32 = 1.5;

/// Camera for viewing the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(2.0, 1.5, 2.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: 45.0,
        }
    }
}

/// Per-frame orbit controls.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitInput {
    /// Mouse drag in pixels while the orbit button is held.
    pub drag: Vec2,
    /// Scroll delta, positive toward the target.
    pub scroll: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Default::default()
        }
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Orbital update: spin around the target about the up axis at `speed`
    /// radians per second, then apply mouse drag (scaled by `sensitivity`
    /// radians per pixel) and scroll zoom.
    pub fn orbit(&mut self, dt: f32, speed: f32, sensitivity: f32, input: &OrbitInput) {
        let offset = self.position - self.target;
        if offset.length_squared() <= f32::EPSILON {
            return;
        }

        let distance = offset.length();
        let mut azimuth = offset.x.atan2(offset.z);
        let mut elevation = (offset.y / distance).clamp(-1.0, 1.0).asin();

        azimuth += speed * dt - input.drag.x * sensitivity;
        elevation = (elevation + input.drag.y * sensitivity).clamp(-MAX_ELEVATION, MAX_ELEVATION);
        let distance = (distance - input.scroll).clamp(MIN_DISTANCE, MAX_DISTANCE);

        let rotation = Quat::from_rotation_y(azimuth) * Quat::from_rotation_x(-elevation);
        self.position = self.target + rotation * Vec3::new(0.0, 0.0, distance);
    }
}
