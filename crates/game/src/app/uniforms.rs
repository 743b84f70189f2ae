use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wavepool::{OrbitCamera, SphereBody};

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ViewUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _pad: f32,
}

impl ViewUniforms {
    pub fn from_camera(camera: &OrbitCamera, aspect: f32) -> Self {
        let view_proj = camera.view_projection(aspect);

        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera.eye().to_array(),
            _pad: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LightUniforms {
    /// Unit vector towards the light.
    pub direction: [f32; 3],
    pub _pad: f32,
}

impl LightUniforms {
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction: direction.normalize_or_zero().to_array(),
            _pad: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SphereUniforms {
    pub center: [f32; 3],
    pub radius: f32,
}

impl SphereUniforms {
    pub fn from_sphere(sphere: &SphereBody) -> Self {
        Self {
            center: sphere.center.to_array(),
            radius: sphere.radius,
        }
    }
}
