//! Caustics projected onto the pool floor.
//!
//! Light refracts through each surface cell twice: once through a flat
//! surface (where it would land undisturbed) and once through the actual
//! displaced surface. Both rays are traced through the pool box onto the floor
//! plane; the ratio of the footprint areas gives the focusing factor. Samples
//! are indexed by source cell, whose undisturbed landing point is an affine
//! function of the cell position.

use glam::Vec3;
use rayon::prelude::*;

use super::Water;
use crate::constants::{CAUSTIC_BASE_INTENSITY, IOR_AIR, IOR_WATER, POOL_HEIGHT};
use crate::math::{intersect_cube, refract, unit};

/// Upper bound on focusing so folded wavefronts stay finite.
const MAX_FOCUS: f32 = 10.0;

/// Rim shadow sharpness.
const RIM_SHARPNESS: f32 = 200.0;

/// Height of the pool rim above the rest plane.
const RIM_HEIGHT: f32 = 2.0 / 12.0;

/// Light reaching one floor sample.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CausticSample {
    /// Focused intensity; `CAUSTIC_BASE_INTENSITY` for still water.
    pub intensity: f32,
    /// Sphere shadow factor, 1 = fully lit.
    pub shadow: f32,
}

impl Default for CausticSample {
    fn default() -> Self {
        Self {
            intensity: CAUSTIC_BASE_INTENSITY,
            shadow: 1.0,
        }
    }
}

fn pool_min() -> Vec3 {
    Vec3::new(-1.0, -POOL_HEIGHT, -1.0)
}

fn pool_max() -> Vec3 {
    Vec3::new(1.0, 2.0, 1.0)
}

/// Trace `ray` from `origin` out of the pool box, then along the flat
/// refracted light down to the floor plane `y = -1`.
fn project(origin: Vec3, ray: Vec3, refracted_light: Vec3) -> Vec3 {
    let (_, t_far) = intersect_cube(origin, ray, pool_min(), pool_max());
    let exit = origin + ray * t_far;
    let t_plane = (-exit.y - 1.0) / refracted_light.y;
    exit + refracted_light * t_plane
}

/// Attenuation for floor points the rim blocks from the light.
fn rim_factor(floor_point: Vec3, refracted_light: Vec3) -> f32 {
    let (t_near, t_far) = intersect_cube(floor_point, -refracted_light, pool_min(), pool_max());
    let exit_height = floor_point.y - refracted_light.y * t_far;
    let sharpness = -RIM_SHARPNESS / (1.0 + 10.0 * (t_far - t_near));
    1.0 / (1.0 + (sharpness * (exit_height - RIM_HEIGHT)).exp())
}

/// Soft shadow of the sphere along the refracted light.
fn sphere_shadow(floor_point: Vec3, refracted_light: Vec3, center: Vec3, radius: f32) -> f32 {
    let dir = (center - floor_point) / radius;
    let area = dir.cross(refracted_light);
    let dist = dir.dot(-refracted_light);
    let shadow = 1.0 + (area.dot(area) - 1.0) / (0.05 + dist * 0.025);
    let shadow = (1.0 / (1.0 + (-shadow).exp())).clamp(0.0, 1.0);
    1.0 + (shadow - 1.0) * (dist * 2.0).clamp(0.0, 1.0)
}

impl Water {
    /// Recompute the caustics buffer from the current heights and normals.
    ///
    /// `light` points towards the light source. Call after `update_normals`.
    pub fn update_caustics(&mut self, light: Vec3, sphere_center: Vec3, sphere_radius: f32) {
        let light = unit(light);
        let eta = IOR_AIR / IOR_WATER;
        let refracted_light = refract(-light, Vec3::Y, eta);

        // Light from below the horizon never reaches the floor
        if light.y <= 0.0 || refracted_light.y > -1e-4 {
            self.caustics.fill(CausticSample {
                intensity: 0.0,
                shadow: 1.0,
            });
            return;
        }

        let width = self.width;
        let depth = self.depth;
        let heights = &self.buffers[self.current].height;
        let normals = &self.normals;

        self.projected_old
            .par_iter_mut()
            .zip(self.projected_new.par_iter_mut())
            .enumerate()
            .for_each(|(idx, (old_pos, new_pos))| {
                let x = idx % width;
                let z = idx / width;
                let surface = Vec3::new(
                    (x as f32 + 0.5) / width as f32 * 2.0 - 1.0,
                    0.0,
                    (z as f32 + 0.5) / depth as f32 * 2.0 - 1.0,
                );
                let ray = refract(-light, normals[idx], eta);

                *old_pos = project(surface, refracted_light, refracted_light);
                *new_pos = project(surface + Vec3::Y * heights[idx], ray, refracted_light);
            });

        let projected_old = &self.projected_old;
        let projected_new = &self.projected_new;

        self.caustics
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(z, row)| {
                let z_back = z.saturating_sub(1) * width;
                let z_front = (z + 1).min(depth - 1) * width;
                let row_start = z * width;

                for (x, sample) in row.iter_mut().enumerate() {
                    let left = row_start + x.saturating_sub(1);
                    let right = row_start + (x + 1).min(width - 1);
                    let back = z_back + x;
                    let front = z_front + x;

                    let old_area = (projected_old[right] - projected_old[left]).length()
                        * (projected_old[front] - projected_old[back]).length();
                    let new_area = (projected_new[right] - projected_new[left]).length()
                        * (projected_new[front] - projected_new[back]).length();
                    let focus = (old_area / new_area).min(MAX_FOCUS);

                    let floor_point = projected_new[row_start + x];
                    let intensity = CAUSTIC_BASE_INTENSITY
                        * focus
                        * rim_factor(floor_point, refracted_light);

                    *sample = CausticSample {
                        intensity,
                        shadow: sphere_shadow(
                            floor_point,
                            refracted_light,
                            sphere_center,
                            sphere_radius,
                        ),
                    };
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIGHT: Vec3 = Vec3::new(2.0, 2.0, -1.0);
    const FAR_SPHERE: Vec3 = Vec3::new(0.0, 50.0, 0.0);

    #[test]
    fn test_still_water_has_base_intensity() {
        let mut water = Water::new(32, 32);
        water.update_normals();
        water.update_caustics(LIGHT, FAR_SPHERE, 0.25);

        let sample = water.caustic_at(16, 16);
        assert!(
            (sample.intensity - CAUSTIC_BASE_INTENSITY).abs() < 1e-3,
            "intensity {}",
            sample.intensity
        );
    }

    #[test]
    fn test_bump_focuses_and_defocuses() {
        let mut water = Water::new(64, 64);
        water.add_drop(0.0, 0.0, 0.15, 0.05);
        water.update_normals();
        water.update_caustics(LIGHT, FAR_SPHERE, 0.25);

        let (min, max) = water
            .caustics()
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), s| {
                (lo.min(s.intensity), hi.max(s.intensity))
            });
        assert!(max > CAUSTIC_BASE_INTENSITY * 1.01, "max {max}");
        assert!(min < CAUSTIC_BASE_INTENSITY * 0.99, "min {min}");
        assert!(water.caustics().iter().all(|s| s.intensity.is_finite()));
    }

    #[test]
    fn test_sphere_casts_shadow() {
        let mut water = Water::new(32, 32);
        water.update_normals();

        // Put the sphere on the floor right under the center cell's light path
        let refracted = refract(-LIGHT.normalize(), Vec3::Y, IOR_AIR / IOR_WATER);
        let floor = project(water.cell_position(16, 16), refracted, refracted);
        let center = floor - refracted * 0.3;
        water.update_caustics(LIGHT, center, 0.25);

        assert!(water.caustic_at(16, 16).shadow < 0.5);
        assert!(water.caustic_at(1, 30).shadow > 0.9);
    }

    #[test]
    fn test_light_from_below_is_dark() {
        let mut water = Water::new(16, 16);
        water.update_normals();
        water.update_caustics(Vec3::new(0.0, -1.0, 0.0), FAR_SPHERE, 0.25);
        assert!(water.caustics().iter().all(|s| s.intensity == 0.0));
    }
}
