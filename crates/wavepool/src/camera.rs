use glam::{Mat4, Vec3};

use crate::constants::{
    CAMERA_ANGLE_X, CAMERA_ANGLE_Y, CAMERA_DISTANCE, CAMERA_FAR, CAMERA_FOV, CAMERA_NEAR,
    CAMERA_PITCH_LIMIT,
};
use crate::math::transform_point;

/// Orbit camera around the pool, angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    /// Pitch; clamped to avoid flipping over the pole.
    pub angle_x: f32,
    /// Yaw.
    pub angle_y: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            angle_x: CAMERA_ANGLE_X,
            angle_y: CAMERA_ANGLE_Y,
        }
    }
}

impl OrbitCamera {
    pub fn new(angle_x: f32, angle_y: f32) -> Self {
        Self {
            angle_x: angle_x.clamp(-CAMERA_PITCH_LIMIT, CAMERA_PITCH_LIMIT),
            angle_y,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE))
            * Mat4::from_rotation_x(-self.angle_x.to_radians())
            * Mat4::from_rotation_y(-self.angle_y.to_radians())
            * Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0))
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(CAMERA_FOV, aspect, CAMERA_NEAR, CAMERA_FAR)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// World-space eye position.
    pub fn eye(&self) -> Vec3 {
        transform_point(&self.view_matrix().inverse(), Vec3::ZERO)
    }

    /// Apply a pointer drag in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.angle_y -= dx;
        self.angle_x = (self.angle_x - dy).clamp(-CAMERA_PITCH_LIMIT, CAMERA_PITCH_LIMIT);
    }
}
