//! Sphere-to-surface displacement.
//!
//! Moving the sphere through the rest plane pushes water out of the way. The
//! surface is raised by the volume the sphere vacated and lowered by the
//! volume it now occupies, which launches waves as it moves.

use glam::Vec3;
use rayon::prelude::*;

use super::Water;
use crate::constants::SPHERE_DISPLACEMENT_SCALE;

/// Beyond this many radii the footprint is numerically zero.
const FOOTPRINT_REACH: f32 = 2.0;

/// Height of sphere material above a plane point, scaled to a surface offset.
///
/// `point` lies on the rest plane (`y = 0`). Returns zero when the sphere
/// does not cross the plane.
pub fn volume_in_sphere(point: Vec3, center: Vec3, radius: f32) -> f32 {
    if center.y.abs() >= radius {
        return 0.0;
    }
    let to_center = Vec3::new(point.x, 0.0, point.z) - center;
    let t = to_center.length() / radius;
    let dy = (-(t * 1.5).powi(6)).exp();
    let y_min = (center.y - dy).min(0.0);
    let y_max = (center.y + dy).max(0.0).min(y_min + 2.0 * dy);
    (y_max - y_min) * SPHERE_DISPLACEMENT_SCALE
}

impl Water {
    /// Imprint the sphere's motion from `old_center` to `new_center`.
    pub fn move_sphere(&mut self, old_center: Vec3, new_center: Vec3, radius: f32) {
        assert!(radius > 0.0, "sphere radius must be positive, got {radius}");

        let crosses_old = old_center.y.abs() < radius;
        let crosses_new = new_center.y.abs() < radius;
        if !crosses_old && !crosses_new {
            return;
        }

        let width = self.width;
        let depth = self.depth;
        let reach = radius * FOOTPRINT_REACH;
        let near = |p: Vec3, c: Vec3| (p.x - c.x).abs() <= reach && (p.z - c.z).abs() <= reach;

        let current = self.current;
        let heights = &mut self.buffers[current].height;

        heights
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(z, row)| {
                let pz = (z as f32 + 0.5) / depth as f32 * 2.0 - 1.0;
                for (x, h) in row.iter_mut().enumerate() {
                    let px = (x as f32 + 0.5) / width as f32 * 2.0 - 1.0;
                    let p = Vec3::new(px, 0.0, pz);

                    let mut delta = 0.0;
                    if crosses_old && near(p, old_center) {
                        delta += volume_in_sphere(p, old_center, radius);
                    }
                    if crosses_new && near(p, new_center) {
                        delta -= volume_in_sphere(p, new_center, radius);
                    }
                    *h += delta;
                }
            });
    }
}
