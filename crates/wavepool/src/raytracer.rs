//! Screen-to-world ray generation and analytic sphere hit testing.
//!
//! A [`Raytracer`] is built from one view/projection/viewport triple and is
//! only valid for that triple; rebuild it whenever the camera or the window
//! changes.

use glam::{Mat4, Vec3};

use crate::math::{lerp, transform_point};

/// Pixel rectangle `(x, y, width, height)` the projection maps onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport anchored at the origin.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Fractional position of a pixel inside the viewport (unclamped).
    fn fraction(&self, px: f32, py: f32) -> (f32, f32) {
        ((px - self.x) / self.width, (py - self.y) / self.height)
    }
}

/// Nearest intersection of a ray with a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitTest {
    /// Ray parameter at the hit.
    pub t: f32,
    /// `origin + t * ray`.
    pub hit: Vec3,
    /// Outward unit normal at the hit.
    pub normal: Vec3,
}

/// Per-camera ray generator.
#[derive(Clone, Debug)]
pub struct Raytracer {
    /// World-space camera position.
    pub eye: Vec3,
    viewport: Viewport,
    inv_view_proj: Mat4,
    ray00: Vec3,
    ray10: Vec3,
    ray01: Vec3,
    ray11: Vec3,
}

impl Raytracer {
    /// Precompute the eye and the four far-plane corner rays.
    ///
    /// # Panics
    /// If `view` or `projection * view` cannot be inverted.
    pub fn new(view: Mat4, projection: Mat4, viewport: Viewport) -> Self {
        let inv_view = view.inverse();
        assert!(inv_view.is_finite(), "view matrix is singular");
        let eye = transform_point(&inv_view, Vec3::ZERO);

        let inv_view_proj = (projection * view).inverse();
        assert!(inv_view_proj.is_finite(), "view-projection matrix is singular");

        let min_x = viewport.x;
        let min_y = viewport.y;
        let max_x = viewport.x + viewport.width;
        let max_y = viewport.y + viewport.height;

        let mut tracer = Self {
            eye,
            viewport,
            inv_view_proj,
            ray00: Vec3::ZERO,
            ray10: Vec3::ZERO,
            ray01: Vec3::ZERO,
            ray11: Vec3::ZERO,
        };
        tracer.ray00 = tracer.unproject(min_x, min_y, 1.0) - eye;
        tracer.ray10 = tracer.unproject(max_x, min_y, 1.0) - eye;
        tracer.ray01 = tracer.unproject(min_x, max_y, 1.0) - eye;
        tracer.ray11 = tracer.unproject(max_x, max_y, 1.0) - eye;
        tracer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Corner rays in `[top-left, top-right, bottom-left, bottom-right]` order.
    pub fn corner_rays(&self) -> [Vec3; 4] {
        [self.ray00, self.ray10, self.ray01, self.ray11]
    }

    /// Window coordinates plus depth to world space.
    pub fn unproject(&self, win_x: f32, win_y: f32, win_z: f32) -> Vec3 {
        let (u, v) = self.viewport.fraction(win_x, win_y);
        let ndc = Vec3::new(u * 2.0 - 1.0, (1.0 - v) * 2.0 - 1.0, win_z);
        transform_point(&self.inv_view_proj, ndc)
    }

    /// Unit world-space direction through a pixel.
    ///
    /// Pixels outside the viewport extrapolate the corner interpolation.
    pub fn ray_for_pixel(&self, px: f32, py: f32) -> Vec3 {
        let (u, v) = self.viewport.fraction(px, py);
        let top = lerp(self.ray00, self.ray10, u);
        let bottom = lerp(self.ray01, self.ray11, u);
        lerp(top, bottom, v).normalize()
    }

    /// Nearest entry point of `origin + t * ray` into a sphere.
    ///
    /// Tangent rays (zero discriminant) miss, as do spheres behind the origin
    /// (`t <= 0`). The far root is never reported, so callers are expected to
    /// be outside the sphere.
    pub fn hit_test_sphere(origin: Vec3, ray: Vec3, center: Vec3, radius: f32) -> Option<HitTest> {
        let offset = origin - center;
        let a = ray.dot(ray);
        let b = 2.0 * ray.dot(offset);
        let c = offset.dot(offset) - radius * radius;
        let discriminant = b * b - 4.0 * a * c;

        if discriminant <= 0.0 {
            return None;
        }

        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        if t <= 0.0 {
            return None;
        }
        let hit = origin + ray * t;
        let normal = (hit - center) / radius;
        Some(HitTest { t, hit, normal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;

    fn tracer() -> Raytracer {
        let camera = OrbitCamera::default();
        let viewport = Viewport::from_size(800.0, 600.0);
        Raytracer::new(
            camera.view_matrix(),
            camera.projection_matrix(viewport.aspect()),
            viewport,
        )
    }

    #[test]
    fn test_corner_pixels_return_corner_rays() {
        let tracer = tracer();
        let [r00, r10, r01, r11] = tracer.corner_rays();
        let cases = [
            (0.0, 0.0, r00),
            (800.0, 0.0, r10),
            (0.0, 600.0, r01),
            (800.0, 600.0, r11),
        ];
        for (px, py, corner) in cases {
            let ray = tracer.ray_for_pixel(px, py);
            assert!(
                (ray - corner.normalize()).length() < 1e-5,
                "pixel ({px}, {py}) gave {ray:?}, expected {:?}",
                corner.normalize()
            );
        }
    }

    #[test]
    fn test_center_ray_points_at_look_target() {
        let tracer = tracer();
        let ray = tracer.ray_for_pixel(400.0, 300.0);
        // Camera orbits the point (0, -0.5, 0)
        let to_target = (Vec3::new(0.0, -0.5, 0.0) - tracer.eye).normalize();
        assert!((ray - to_target).length() < 1e-4);
    }

    #[test]
    fn test_eye_distance_from_target() {
        let tracer = tracer();
        let dist = (tracer.eye - Vec3::new(0.0, -0.5, 0.0)).length();
        assert!((dist - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_ray_through_center_hits_front() {
        let origin = Vec3::new(0.0, 0.0, -5.0);
        let center = Vec3::new(0.0, 0.0, 1.0);
        let ray = (center - origin).normalize();
        let hit = Raytracer::hit_test_sphere(origin, ray, center, 0.5).expect("should hit");

        assert!((hit.t - 5.5).abs() < 1e-5);
        assert!((hit.hit - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-5);
        assert!((hit.normal - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_tangent_ray_misses() {
        // Ray grazes the sphere at exactly one point: discriminant is 0
        let origin = Vec3::new(-5.0, 1.0, 0.0);
        let hit = Raytracer::hit_test_sphere(origin, Vec3::X, Vec3::ZERO, 1.0);
        assert!(hit.is_none());
    }

    #[test]
    fn test_miss_returns_none() {
        let hit = Raytracer::hit_test_sphere(Vec3::new(0.0, 5.0, 0.0), Vec3::X, Vec3::ZERO, 1.0);
        assert!(hit.is_none());
    }

    #[test]
    fn test_sphere_behind_origin_misses() {
        // Both roots negative: the sphere sits behind the ray
        let origin = Vec3::new(0.0, 3.5, 0.0);
        let ray = Vec3::new(0.0, -1.0, 0.0);
        let hit = Raytracer::hit_test_sphere(origin, ray, Vec3::new(0.0, 10.0, 0.0), 0.25);
        assert!(hit.is_none());
    }

    #[test]
    #[should_panic(expected = "singular")]
    fn test_singular_view_panics() {
        Raytracer::new(Mat4::ZERO, Mat4::IDENTITY, Viewport::from_size(10.0, 10.0));
    }
}
