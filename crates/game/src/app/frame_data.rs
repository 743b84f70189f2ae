//! Per-frame texture payloads.
//!
//! The water texture stores `(height, velocity, normal.x, normal.z)` per
//! texel and the caustics texture `(intensity, shadow)`. Both are rebuilt
//! from the scene after every frame and handed to the renderer as raw bytes.

use bytemuck::{Pod, Zeroable};
use wavepool::{CausticSample, Scene, Viewport, Water};

use super::uniforms::{LightUniforms, SphereUniforms, ViewUniforms};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WaterTexel {
    pub height: f32,
    pub velocity: f32,
    pub normal_x: f32,
    pub normal_z: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct CausticTexel {
    pub intensity: f32,
    pub shadow: f32,
}

impl From<CausticSample> for CausticTexel {
    fn from(sample: CausticSample) -> Self {
        Self {
            intensity: sample.intensity,
            shadow: sample.shadow,
        }
    }
}

/// Everything the renderer uploads for one frame.
pub struct FrameData {
    pub width: usize,
    pub depth: usize,
    pub view: ViewUniforms,
    pub light: LightUniforms,
    pub sphere: SphereUniforms,
    pub water: Vec<WaterTexel>,
    pub caustics: Vec<CausticTexel>,
}

impl FrameData {
    pub fn capture(scene: &Scene, viewport: Viewport) -> Self {
        let mut data = Self {
            width: 0,
            depth: 0,
            view: ViewUniforms::zeroed(),
            light: LightUniforms::zeroed(),
            sphere: SphereUniforms::zeroed(),
            water: Vec::new(),
            caustics: Vec::new(),
        };
        data.update(scene, viewport);
        data
    }

    /// Refill in place, reusing the texel allocations.
    pub fn update(&mut self, scene: &Scene, viewport: Viewport) {
        self.width = scene.water.width;
        self.depth = scene.water.depth;
        self.view = ViewUniforms::from_camera(scene.camera(), viewport.aspect());
        self.light = LightUniforms::new(scene.light);
        self.sphere = SphereUniforms::from_sphere(&scene.sphere);
        pack_water(&scene.water, &mut self.water);

        self.caustics.clear();
        self.caustics
            .extend(scene.water.caustics().iter().map(|&s| CausticTexel::from(s)));
    }

    pub fn water_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.water)
    }

    pub fn caustic_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.caustics)
    }
}

fn pack_water(water: &Water, out: &mut Vec<WaterTexel>) {
    out.clear();
    out.extend(
        water
            .heights()
            .iter()
            .zip(water.velocities())
            .zip(water.normals())
            .map(|((&height, &velocity), normal)| WaterTexel {
                height,
                velocity,
                normal_x: normal.x,
                normal_z: normal.z,
            }),
    );
}
