//! Render boundary: Pod structs and byte views a GPU backend uploads as-is.

pub mod frame_data;
pub mod uniforms;

pub use frame_data::{CausticTexel, FrameData, WaterTexel};
pub use uniforms::{LightUniforms, SphereUniforms, ViewUniforms};
