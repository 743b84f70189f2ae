//! Pointer picking and drag routing.
//!
//! A pointer press picks, in order, the sphere, then the water surface, then
//! falls back to orbiting the camera. The chosen mode sticks until release.

use glam::Vec3;

use crate::camera::OrbitCamera;
use crate::constants::{DROP_RADIUS, DROP_STRENGTH};
use crate::raytracer::{Raytracer, Viewport};
use crate::sphere::SphereBody;
use crate::water::Water;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    None,
    OrbitCamera,
    MoveSphere,
    AddDrops,
}

/// Everything the controller remembers between pointer events.
#[derive(Clone, Debug)]
pub struct InteractionState {
    pub mode: InteractionMode,
    pub camera: OrbitCamera,
    pub drop_radius: f32,
    pub drop_strength: f32,
    last_pointer: (f32, f32),
    /// Last point on the drag plane (MoveSphere).
    prev_hit: Vec3,
    /// Drag plane normal, facing the camera (MoveSphere).
    plane_normal: Vec3,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new(OrbitCamera::default())
    }
}

/// Objects a pointer gesture can act on.
pub struct PointerTargets<'a> {
    pub water: &'a mut Water,
    pub sphere: &'a mut SphereBody,
}

impl InteractionState {
    pub fn new(camera: OrbitCamera) -> Self {
        Self {
            mode: InteractionMode::None,
            camera,
            drop_radius: DROP_RADIUS,
            drop_strength: DROP_STRENGTH,
            last_pointer: (0.0, 0.0),
            prev_hit: Vec3::ZERO,
            plane_normal: Vec3::ZERO,
        }
    }

    pub fn is_dragging_sphere(&self) -> bool {
        self.mode == InteractionMode::MoveSphere
    }

    fn tracer(&self, viewport: Viewport) -> Raytracer {
        Raytracer::new(
            self.camera.view_matrix(),
            self.camera.projection_matrix(viewport.aspect()),
            viewport,
        )
    }
}

/// Where a ray meets the rest plane `y = 0`, if that lies inside the pool.
pub fn pick_water_plane(eye: Vec3, ray: Vec3) -> Option<Vec3> {
    let t = -eye.y / ray.y;
    if !t.is_finite() || t <= 0.0 {
        return None;
    }
    let point = eye + ray * t;
    // Inclusive: a pick exactly on the rim still lands a drop on the edge cells
    (point.x.abs() <= 1.0 && point.z.abs() <= 1.0).then_some(point)
}

/// Start a gesture at pixel `(x, y)`.
pub fn pointer_down(
    state: &mut InteractionState,
    targets: PointerTargets<'_>,
    viewport: Viewport,
    x: f32,
    y: f32,
) -> InteractionMode {
    state.last_pointer = (x, y);
    let tracer = state.tracer(viewport);
    let ray = tracer.ray_for_pixel(x, y);

    let sphere = &*targets.sphere;
    if let Some(hit) = Raytracer::hit_test_sphere(tracer.eye, ray, sphere.center, sphere.radius) {
        let (cx, cy) = viewport.center();
        state.mode = InteractionMode::MoveSphere;
        state.prev_hit = hit.hit;
        state.plane_normal = -tracer.ray_for_pixel(cx, cy);
        log::debug!("pointer down: grabbed sphere at {:?}", hit.hit);
        return state.mode;
    }

    if let Some(point) = pick_water_plane(tracer.eye, ray) {
        state.mode = InteractionMode::AddDrops;
        targets
            .water
            .add_drop(point.x, point.z, state.drop_radius, state.drop_strength);
        log::debug!("pointer down: drop at ({:.3}, {:.3})", point.x, point.z);
    } else {
        state.mode = InteractionMode::OrbitCamera;
        log::debug!("pointer down: orbit camera");
    }
    state.mode
}

/// Continue the active gesture with the pointer at `(x, y)`.
pub fn pointer_move(
    state: &mut InteractionState,
    targets: PointerTargets<'_>,
    viewport: Viewport,
    x: f32,
    y: f32,
) {
    match state.mode {
        InteractionMode::None => return,
        InteractionMode::OrbitCamera => {
            let (old_x, old_y) = state.last_pointer;
            state.camera.orbit(x - old_x, y - old_y);
        }
        InteractionMode::MoveSphere => {
            let tracer = state.tracer(viewport);
            let ray = tracer.ray_for_pixel(x, y);
            let denom = state.plane_normal.dot(ray);
            if denom.abs() > f32::EPSILON {
                let t = -state.plane_normal.dot(tracer.eye - state.prev_hit) / denom;
                let next_hit = tracer.eye + ray * t;
                targets.sphere.translate_clamped(next_hit - state.prev_hit);
                state.prev_hit = next_hit;
            }
        }
        InteractionMode::AddDrops => {
            let tracer = state.tracer(viewport);
            let ray = tracer.ray_for_pixel(x, y);
            if let Some(point) = pick_water_plane(tracer.eye, ray) {
                targets
                    .water
                    .add_drop(point.x, point.z, state.drop_radius, state.drop_strength);
            }
        }
    }
    state.last_pointer = (x, y);
}

/// End the gesture. Always returns to `None`.
pub fn pointer_up(state: &mut InteractionState) {
    if state.mode != InteractionMode::None {
        log::debug!("pointer up: leaving {:?}", state.mode);
    }
    state.mode = InteractionMode::None;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::from_size(800.0, 600.0)
    }

    /// Pixel where the given world point appears on screen.
    fn project_to_pixel(state: &InteractionState, p: Vec3) -> (f32, f32) {
        let vp = viewport();
        let clip = state.camera.view_projection(vp.aspect()) * p.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        (
            (ndc.x + 1.0) * 0.5 * vp.width,
            (1.0 - (ndc.y + 1.0) * 0.5) * vp.height,
        )
    }

    #[test]
    fn test_pick_water_plane_bounds() {
        let eye = Vec3::new(0.0, 2.0, 0.0);
        let inside = pick_water_plane(eye, Vec3::new(0.25, -1.0, 0.0)).expect("inside pool");
        assert!((inside - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);

        // Lands at x = 1.2
        assert!(pick_water_plane(eye, Vec3::new(0.6, -1.0, 0.0)).is_none());
        // Exactly on the rim counts as inside
        let rim = pick_water_plane(Vec3::new(1.0, 2.0, -1.0), Vec3::NEG_Y).expect("rim pick");
        assert_eq!(rim, Vec3::new(1.0, 0.0, -1.0));
        // Parallel and upward rays never reach the plane
        assert!(pick_water_plane(eye, Vec3::X).is_none());
        assert!(pick_water_plane(eye, Vec3::Y).is_none());
    }

    #[test]
    fn test_press_on_sphere_grabs_it() {
        let mut state = InteractionState::default();
        let mut water = Water::new(32, 32);
        let mut sphere = SphereBody::new(Vec3::new(0.0, 0.0, 0.0), 0.25);
        let (px, py) = project_to_pixel(&state, sphere.center);

        let mode = pointer_down(
            &mut state,
            PointerTargets { water: &mut water, sphere: &mut sphere },
            viewport(),
            px,
            py,
        );
        assert_eq!(mode, InteractionMode::MoveSphere);
        assert!(state.is_dragging_sphere());
        assert_eq!(water.max_abs_height(), 0.0);
    }

    #[test]
    fn test_press_on_water_adds_drop() {
        let mut state = InteractionState::default();
        let mut water = Water::new(32, 32);
        let mut sphere = SphereBody::new(Vec3::new(0.9, -0.75, 0.9), 0.05);
        let (px, py) = project_to_pixel(&state, Vec3::new(-0.3, 0.0, 0.3));

        let mode = pointer_down(
            &mut state,
            PointerTargets { water: &mut water, sphere: &mut sphere },
            viewport(),
            px,
            py,
        );
        assert_eq!(mode, InteractionMode::AddDrops);
        assert!(water.max_abs_height() > 0.0);
    }

    #[test]
    fn test_sphere_behind_camera_is_not_grabbed() {
        // Looking straight down with the sphere parked above the eye
        let mut state = InteractionState::new(OrbitCamera::new(-89.999, 0.0));
        let mut water = Water::new(32, 32);
        let mut sphere = SphereBody::new(Vec3::new(0.0, 10.0, 0.0), 0.25);
        assert!(state.camera.eye().y < sphere.center.y);

        let mode = pointer_down(
            &mut state,
            PointerTargets { water: &mut water, sphere: &mut sphere },
            viewport(),
            400.0,
            300.0,
        );
        assert_eq!(mode, InteractionMode::AddDrops);
        assert!(water.max_abs_height() > 0.0);
        assert_eq!(sphere.center, Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_press_on_sky_orbits_and_drag_rotates() {
        let mut state = InteractionState::default();
        let mut water = Water::new(32, 32);
        let mut sphere = SphereBody::new(Vec3::new(0.0, -0.75, 0.0), 0.25);
        let start = state.camera;

        // Top of the screen looks over the pool at the sky
        let mode = pointer_down(
            &mut state,
            PointerTargets { water: &mut water, sphere: &mut sphere },
            viewport(),
            400.0,
            1.0,
        );
        assert_eq!(mode, InteractionMode::OrbitCamera);

        pointer_move(
            &mut state,
            PointerTargets { water: &mut water, sphere: &mut sphere },
            viewport(),
            410.0,
            6.0,
        );
        assert_eq!(state.camera.angle_y, start.angle_y - 10.0);
        assert_eq!(state.camera.angle_x, start.angle_x - 5.0);

        pointer_up(&mut state);
        assert_eq!(state.mode, InteractionMode::None);
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut state = InteractionState::default();
        let mut water = Water::new(32, 32);
        let mut sphere = SphereBody::new(Vec3::ZERO, 0.25);
        let before = (state.camera, sphere.center);

        pointer_move(
            &mut state,
            PointerTargets { water: &mut water, sphere: &mut sphere },
            viewport(),
            100.0,
            100.0,
        );
        assert_eq!((state.camera, sphere.center), before);
        assert_eq!(water.max_abs_height(), 0.0);
    }
}
