//! Rigid sphere floating in the pool.
//!
//! The sphere is either kinematic (dragged by the pointer, velocity held at
//! zero) or integrated under gravity with a crude buoyancy and drag model
//! driven by how much of it sits below the rest level.

use glam::Vec3;

use crate::constants::{BUOYANCY, FLOOR_RESTITUTION, SPHERE_MAX_HEIGHT};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereBody {
    pub center: Vec3,
    /// Position at the last fluid coupling.
    pub old_center: Vec3,
    pub radius: f32,
    pub velocity: Vec3,
}

/// Fraction of the sphere below the rest level, in `[0, 1]`.
pub fn submersion(center_y: f32, radius: f32) -> f32 {
    ((radius - center_y) / (2.0 * radius)).clamp(0.0, 1.0)
}

/// Keep a sphere center inside the pool walls and below the drag ceiling.
pub fn clamp_to_pool(center: Vec3, radius: f32) -> Vec3 {
    Vec3::new(
        center.x.clamp(radius - 1.0, 1.0 - radius),
        center.y.clamp(radius - 1.0, SPHERE_MAX_HEIGHT),
        center.z.clamp(radius - 1.0, 1.0 - radius),
    )
}

impl SphereBody {
    /// # Panics
    /// If `radius` is not positive.
    pub fn new(center: Vec3, radius: f32) -> Self {
        assert!(radius > 0.0, "sphere radius must be positive, got {radius}");
        Self {
            center,
            old_center: center,
            radius,
            velocity: Vec3::ZERO,
        }
    }

    pub fn submersion(&self) -> f32 {
        submersion(self.center.y, self.radius)
    }

    /// Advance one physics step. Returns true if the sphere hit the floor.
    pub fn integrate(&mut self, gravity: Vec3, dt: f32) -> bool {
        let under = self.submersion();

        self.velocity += gravity * (dt - BUOYANCY * dt * under);
        let speed_sq = self.velocity.length_squared();
        self.velocity -= self.velocity.normalize_or_zero() * (under * dt * speed_sq);
        self.center += self.velocity * dt;

        let floor = self.radius - 1.0;
        if self.center.y < floor {
            self.center.y = floor;
            self.velocity.y = self.velocity.y.abs() * FLOOR_RESTITUTION;
            return true;
        }
        false
    }

    /// Kinematic move by `delta`, clamped to the pool.
    pub fn translate_clamped(&mut self, delta: Vec3) {
        self.center = clamp_to_pool(self.center + delta, self.radius);
    }

    /// Freeze the sphere while it is being dragged.
    pub fn hold(&mut self) {
        self.velocity = Vec3::ZERO;
    }

    /// Record the current position as coupled into the fluid.
    pub fn commit_position(&mut self) {
        self.old_center = self.center;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAVITY: Vec3 = Vec3::new(0.0, -4.0, 0.0);
    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_submersion_range() {
        assert_eq!(submersion(1.0, 0.25), 0.0);
        assert_eq!(submersion(-1.0, 0.25), 1.0);
        assert!((submersion(0.0, 0.25) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_free_fall_in_air() {
        let mut sphere = SphereBody::new(Vec3::new(0.0, 5.0, 0.0), 0.25);
        sphere.integrate(GRAVITY, DT);
        // No drag above water: plain explicit Euler
        assert!((sphere.velocity.y - GRAVITY.y * DT).abs() < 1e-6);
        assert!(sphere.center.y < 5.0);
    }

    #[test]
    fn test_resting_sphere_has_no_nan() {
        let mut sphere = SphereBody::new(Vec3::ZERO, 0.25);
        // Exactly neutral: gravity scaled to zero is not needed, zero velocity must stay finite
        sphere.integrate(Vec3::ZERO, DT);
        assert!(sphere.velocity.is_finite());
        assert!(sphere.center.is_finite());
    }

    #[test]
    fn test_first_floor_contact_clamps_and_bounces() {
        let mut sphere = SphereBody::new(Vec3::new(0.0, 5.0, 0.0), 0.25);
        let mut contact = false;
        for _ in 0..2000 {
            if sphere.integrate(GRAVITY, DT) {
                contact = true;
                break;
            }
        }
        assert!(contact, "sphere never reached the floor: {:?}", sphere.center);
        assert_eq!(sphere.center.y, sphere.radius - 1.0);
        assert!(sphere.velocity.y >= 0.0);
    }

    #[test]
    fn test_submerged_sphere_floats_to_equilibrium() {
        let mut sphere = SphereBody::new(Vec3::new(0.0, -0.75, 0.0), 0.25);
        for _ in 0..12_000 {
            sphere.integrate(GRAVITY, DT);
            assert!(sphere.center.y >= sphere.radius - 1.0);
        }
        // Buoyancy balances gravity where submersion = 1 / 1.1
        let expected = 0.25 - 2.0 * 0.25 / BUOYANCY;
        assert!(
            (sphere.center.y - expected).abs() < 0.1,
            "settled at {}, expected ~{}",
            sphere.center.y,
            expected
        );
    }

    #[test]
    fn test_translate_clamped_to_walls() {
        let mut sphere = SphereBody::new(Vec3::new(0.5, 0.0, 0.0), 0.25);
        sphere.translate_clamped(Vec3::new(1.0, 20.0, -3.0));
        assert_eq!(sphere.center.x, 1.0 - 0.25);
        assert_eq!(sphere.center.y, SPHERE_MAX_HEIGHT);
        assert_eq!(sphere.center.z, 0.25 - 1.0);
    }

    #[test]
    #[should_panic(expected = "radius must be positive")]
    fn test_negative_radius_panics() {
        SphereBody::new(Vec3::ZERO, -1.0);
    }
}
