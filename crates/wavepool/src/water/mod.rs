//! Height-field water surface.
//!
//! The surface covers the plane `x, z ∈ [-1, 1]`. Each cell stores a height
//! offset from the rest level plus a vertical velocity. Two buffers ping-pong:
//! the step reads the current buffer, writes the other, then flips the index,
//! so "current" is always the newest completed step.
//!
//! Derived fields (normals, caustics) are recomputed on demand from the
//! current buffer and must be refreshed after stepping.

mod caustics;
mod coupling;

pub use caustics::CausticSample;
pub use coupling::volume_in_sphere;

use glam::Vec3;
use rayon::prelude::*;

use crate::constants::WAVE_DAMPING;

/// One height/velocity grid.
#[derive(Clone, Debug)]
struct FieldBuffer {
    height: Vec<f32>,
    velocity: Vec<f32>,
}

impl FieldBuffer {
    fn new(cells: usize) -> Self {
        Self {
            height: vec![0.0; cells],
            velocity: vec![0.0; cells],
        }
    }
}

/// Double-buffered wave simulation.
#[derive(Clone, Debug)]
pub struct Water {
    pub width: usize,
    pub depth: usize,
    damping: f32,

    buffers: [FieldBuffer; 2],
    /// Index of the buffer holding the latest step.
    current: usize,

    normals: Vec<Vec3>,
    caustics: Vec<CausticSample>,

    // Caustics scratch (pre-allocated to avoid per-frame allocation)
    projected_old: Vec<Vec3>,
    projected_new: Vec<Vec3>,
}

impl Water {
    /// Flat water at rest.
    ///
    /// # Panics
    /// If either dimension is below 2.
    pub fn new(width: usize, depth: usize) -> Self {
        Self::with_damping(width, depth, WAVE_DAMPING)
    }

    pub fn with_damping(width: usize, depth: usize, damping: f32) -> Self {
        assert!(
            width >= 2 && depth >= 2,
            "water grid must be at least 2x2, got {width}x{depth}"
        );
        let cells = width * depth;
        Self {
            width,
            depth,
            damping,
            buffers: [FieldBuffer::new(cells), FieldBuffer::new(cells)],
            current: 0,
            normals: vec![Vec3::Y; cells],
            caustics: vec![CausticSample::default(); cells],
            projected_old: vec![Vec3::ZERO; cells],
            projected_new: vec![Vec3::ZERO; cells],
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, z: usize) -> usize {
        z * self.width + x
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.depth
    }

    /// Texture coordinate of a cell center, in `[0, 1]`.
    #[inline]
    pub fn cell_coord(&self, x: usize, z: usize) -> (f32, f32) {
        (
            (x as f32 + 0.5) / self.width as f32,
            (z as f32 + 0.5) / self.depth as f32,
        )
    }

    /// Plane position of a cell center at rest height.
    #[inline]
    pub fn cell_position(&self, x: usize, z: usize) -> Vec3 {
        let (u, v) = self.cell_coord(x, z);
        Vec3::new(u * 2.0 - 1.0, 0.0, v * 2.0 - 1.0)
    }

    /// Index of the buffer holding the latest step.
    pub fn current_buffer(&self) -> usize {
        self.current
    }

    pub fn heights(&self) -> &[f32] {
        &self.buffers[self.current].height
    }

    pub fn velocities(&self) -> &[f32] {
        &self.buffers[self.current].velocity
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn caustics(&self) -> &[CausticSample] {
        &self.caustics
    }

    pub fn height_at(&self, x: usize, z: usize) -> f32 {
        self.heights()[self.idx(x, z)]
    }

    pub fn velocity_at(&self, x: usize, z: usize) -> f32 {
        self.velocities()[self.idx(x, z)]
    }

    pub fn normal_at(&self, x: usize, z: usize) -> Vec3 {
        self.normals[self.idx(x, z)]
    }

    pub fn caustic_at(&self, x: usize, z: usize) -> CausticSample {
        self.caustics[self.idx(x, z)]
    }

    /// Largest absolute height in the current buffer.
    pub fn max_abs_height(&self) -> f32 {
        self.heights().iter().fold(0.0f32, |m, h| m.max(h.abs()))
    }

    /// Back to flat water at rest.
    pub fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.height.fill(0.0);
            buffer.velocity.fill(0.0);
        }
        self.current = 0;
        self.normals.fill(Vec3::Y);
        self.caustics.fill(CausticSample::default());
    }

    /// Current (read) and next (write) buffers.
    fn split_buffers(&mut self) -> (&FieldBuffer, &mut FieldBuffer) {
        let [a, b] = &mut self.buffers;
        if self.current == 0 {
            (&*a, b)
        } else {
            (&*b, a)
        }
    }

    /// Add a smooth radial bump centred on plane point `(x, z)`.
    ///
    /// `radius` is measured in texture space (`[0, 1]` across the pool).
    /// The change lands in the current buffer immediately.
    pub fn add_drop(&mut self, x: f32, z: f32, radius: f32, strength: f32) {
        if radius <= 0.0 {
            return;
        }
        let cu = x * 0.5 + 0.5;
        let cv = z * 0.5 + 0.5;

        let w = self.width as f32;
        let d = self.depth as f32;
        let x0 = (((cu - radius) * w - 0.5).floor() as i64).max(0);
        let x1 = (((cu + radius) * w - 0.5).ceil() as i64).min(self.width as i64 - 1);
        let z0 = (((cv - radius) * d - 0.5).floor() as i64).max(0);
        let z1 = (((cv + radius) * d - 0.5).ceil() as i64).min(self.depth as i64 - 1);
        if x0 > x1 || z0 > z1 {
            return;
        }

        let current = self.current;
        for gz in z0 as usize..=z1 as usize {
            for gx in x0 as usize..=x1 as usize {
                let (u, v) = self.cell_coord(gx, gz);
                let dist = ((u - cu).powi(2) + (v - cv).powi(2)).sqrt();
                let falloff = (1.0 - dist / radius).max(0.0);
                if falloff <= 0.0 {
                    continue;
                }
                let bump = 0.5 - (falloff * std::f32::consts::PI).cos() * 0.5;
                let idx = self.idx(gx, gz);
                self.buffers[current].height[idx] += bump * strength;
            }
        }
    }

    /// Advance the wave equation by one step.
    ///
    /// Edge cells see their own height in place of missing neighbours
    /// (reflective boundary).
    pub fn step_simulation(&mut self) {
        let width = self.width;
        let depth = self.depth;
        let damping = self.damping;
        let (src, dst) = self.split_buffers();

        dst.height
            .par_chunks_mut(width)
            .zip(dst.velocity.par_chunks_mut(width))
            .enumerate()
            .for_each(|(z, (height_row, velocity_row))| {
                let z_back = z.saturating_sub(1) * width;
                let z_front = (z + 1).min(depth - 1) * width;
                let row = z * width;

                for x in 0..width {
                    let idx = row + x;
                    let h = src.height[idx];
                    let left = src.height[row + x.saturating_sub(1)];
                    let right = src.height[row + (x + 1).min(width - 1)];
                    let back = src.height[z_back + x];
                    let front = src.height[z_front + x];

                    let average = (left + right + back + front) * 0.25;
                    let velocity = (src.velocity[idx] + (average - h) * 2.0) * damping;

                    velocity_row[x] = velocity;
                    height_row[x] = h + velocity;
                }
            });

        self.current = 1 - self.current;
    }

    /// Recompute surface normals from central differences of the height.
    pub fn update_normals(&mut self) {
        let width = self.width;
        let depth = self.depth;
        let dx = 2.0 / width as f32;
        let dz = 2.0 / depth as f32;
        let heights = &self.buffers[self.current].height;

        self.normals
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(z, normal_row)| {
                let z_back = z.saturating_sub(1);
                let z_front = (z + 1).min(depth - 1);
                let span_z = (z_front - z_back) as f32 * dz;

                for (x, normal) in normal_row.iter_mut().enumerate() {
                    let x_left = x.saturating_sub(1);
                    let x_right = (x + 1).min(width - 1);
                    let span_x = (x_right - x_left) as f32 * dx;

                    let dh_dx =
                        (heights[z * width + x_right] - heights[z * width + x_left]) / span_x;
                    let dh_dz =
                        (heights[z_front * width + x] - heights[z_back * width + x]) / span_z;

                    *normal = Vec3::new(-dh_dx, 1.0, -dh_dz).normalize();
                }
            });
    }
}
