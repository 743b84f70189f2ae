//! Startup configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it changes.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Height-field cells per side.
    pub resolution: usize,
    /// Per-step velocity damping.
    pub damping: f32,
    /// Wave steps per frame.
    pub substeps: usize,

    pub sphere_radius: f32,
    pub sphere_start: Vec3,
    pub gravity: Vec3,
    /// Start with the sphere integrated rather than kinematic.
    pub sphere_physics: bool,

    /// Drop radius in texture space.
    pub drop_radius: f32,
    pub drop_strength: f32,
    /// Random drops seeded at startup.
    pub initial_drops: usize,
    /// Seed for the startup drops; `None` draws from the OS.
    pub seed: Option<u64>,

    pub light_direction: Vec3,
    pub camera_angle_x: f32,
    pub camera_angle_y: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            damping: WAVE_DAMPING,
            substeps: SUBSTEPS_PER_FRAME,
            sphere_radius: SPHERE_RADIUS,
            sphere_start: Vec3::from_array(SPHERE_START),
            gravity: Vec3::from_array(SPHERE_GRAVITY),
            sphere_physics: false,
            drop_radius: DROP_RADIUS,
            drop_strength: DROP_STRENGTH,
            initial_drops: INITIAL_DROPS,
            seed: None,
            light_direction: Vec3::from_array(LIGHT_DIRECTION),
            camera_angle_x: CAMERA_ANGLE_X,
            camera_angle_y: CAMERA_ANGLE_Y,
        }
    }
}

impl SimConfig {
    /// Save config to a JSON file.
    pub fn save_json(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load config from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot start from.
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution < 2 {
            return Err(format!("resolution must be at least 2, got {}", self.resolution));
        }
        if self.sphere_radius <= 0.0 || self.sphere_radius >= 1.0 {
            return Err(format!(
                "sphere_radius must be in (0, 1), got {}",
                self.sphere_radius
            ));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(format!("damping must be in [0, 1], got {}", self.damping));
        }
        Ok(())
    }
}
