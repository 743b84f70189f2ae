//! Vector helpers layered over `glam`.
//!
//! `glam::Vec3` already covers arithmetic with both vector and scalar
//! operands (`v + w`, `v + 1.0`), dot/cross, length and lerp. The functions
//! here fill the gaps the raytracer and the optics code need.

use glam::{Mat4, Vec3};

/// Direction from spherical angles (radians): `theta` around Y, `phi` up.
pub fn from_angles(theta: f32, phi: f32) -> Vec3 {
    Vec3::new(phi.cos() * theta.cos(), phi.sin(), phi.cos() * theta.sin())
}

/// Unit vector, or zero for a zero input.
#[inline]
pub fn unit(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

/// Smallest component.
#[inline]
pub fn min_component(v: Vec3) -> f32 {
    v.min_element()
}

/// Largest component.
#[inline]
pub fn max_component(v: Vec3) -> f32 {
    v.max_element()
}

/// `a + (b - a) * t`, unclamped so callers may extrapolate.
#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Transform a point, dividing by the resulting `w`.
///
/// A `w` of exactly zero is treated as one, matching how unprojection
/// libraries behave for affine matrices.
pub fn transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    let v = *m * p.extend(1.0);
    let w = if v.w == 0.0 { 1.0 } else { v.w };
    v.truncate() / w
}

/// GLSL-style refraction. Returns zero on total internal reflection.
pub fn refract(incident: Vec3, normal: Vec3, eta: f32) -> Vec3 {
    let cos_i = normal.dot(incident);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        Vec3::ZERO
    } else {
        incident * eta - normal * (eta * cos_i + k.sqrt())
    }
}

/// Slab test against an axis-aligned box. Returns `(t_near, t_far)`;
/// the ray misses when `t_near > t_far`.
pub fn intersect_cube(origin: Vec3, ray: Vec3, cube_min: Vec3, cube_max: Vec3) -> (f32, f32) {
    let t_min = (cube_min - origin) / ray;
    let t_max = (cube_max - origin) / ray;
    let t1 = t_min.min(t_max);
    let t2 = t_min.max(t_max);
    (max_component(t1), min_component(t2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_angles_axes() {
        let v = from_angles(0.0, 0.0);
        assert!((v - Vec3::X).length() < 1e-6);

        let up = from_angles(0.0, std::f32::consts::FRAC_PI_2);
        assert!((up - Vec3::Y).length() < 1e-6);

        let z = from_angles(std::f32::consts::FRAC_PI_2, 0.0);
        assert!((z - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_scalar_and_vector_operands() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v + 1.0, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(v + Vec3::ONE, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(v * Vec3::new(2.0, 0.0, 1.0), Vec3::new(2.0, 0.0, 3.0));
        assert_eq!(v / 2.0, Vec3::new(0.5, 1.0, 1.5));
        assert_eq!(min_component(v), 1.0);
        assert_eq!(max_component(v), 3.0);
    }

    #[test]
    fn test_unit_of_zero_is_zero() {
        assert_eq!(unit(Vec3::ZERO), Vec3::ZERO);
        assert!((unit(Vec3::new(0.0, 3.0, 4.0)).length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lerp_extrapolates() {
        let a = Vec3::ZERO;
        let b = Vec3::X;
        assert_eq!(lerp(a, b, 0.5), Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(lerp(a, b, 2.0), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_refract_straight_through() {
        let down = Vec3::new(0.0, -1.0, 0.0);
        let r = refract(down, Vec3::Y, 1.0 / 1.333);
        assert!((r - down).length() < 1e-5);
    }

    #[test]
    fn test_refract_bends_towards_normal() {
        let incident = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = refract(incident, Vec3::Y, 1.0 / 1.333);
        // Entering denser medium: steeper than the incident ray
        assert!(r.x.abs() < incident.x.abs());
        assert!((r.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_intersect_cube() {
        let (near, far) = intersect_cube(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::Z,
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert!((near - 4.0).abs() < 1e-5);
        assert!((far - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_transform_point_divides_by_w() {
        let m = Mat4::from_cols_array(&[
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 2.0,
        ]);
        let p = transform_point(&m, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
    }
}
