//! Tick-owned simulation state and the per-frame pipeline.
//!
//! Stage order matters: the sphere moves first, its motion is imprinted on
//! the field, the field is stepped, and normals and caustics are rebuilt from
//! the post-step heights.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::camera::OrbitCamera;
use crate::config::SimConfig;
use crate::constants::MAX_FRAME_DT;
use crate::interaction::{self, InteractionMode, InteractionState, PointerTargets};
use crate::math::{from_angles, unit};
use crate::raytracer::Viewport;
use crate::sphere::SphereBody;
use crate::water::Water;

/// Named stages of one unpaused frame, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStage {
    SpherePhysics,
    SphereCoupling,
    WaveSteps,
    Normals,
    Caustics,
}

impl FrameStage {
    pub const ORDER: [FrameStage; 5] = [
        FrameStage::SpherePhysics,
        FrameStage::SphereCoupling,
        FrameStage::WaveSteps,
        FrameStage::Normals,
        FrameStage::Caustics,
    ];
}

/// Key toggles understood by the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneKey {
    /// Switch the sphere between kinematic and integrated.
    TogglePhysics,
    TogglePause,
    /// Aim the light along the current camera direction.
    LightFromCamera,
}

/// Summary of one call to [`Scene::frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// False when paused.
    pub advanced: bool,
    /// The sphere bounced off the floor this frame.
    pub floor_contact: bool,
}

pub struct Scene {
    pub water: Water,
    pub sphere: SphereBody,
    pub interaction: InteractionState,
    /// Direction towards the light (unit).
    pub light: Vec3,
    pub gravity: Vec3,
    pub substeps: usize,
    pub paused: bool,
    pub sphere_physics: bool,
    frame: u64,
}

impl Scene {
    pub fn new(config: &SimConfig) -> Self {
        let mut interaction =
            InteractionState::new(OrbitCamera::new(config.camera_angle_x, config.camera_angle_y));
        interaction.drop_radius = config.drop_radius;
        interaction.drop_strength = config.drop_strength;

        let mut scene = Self {
            water: Water::with_damping(config.resolution, config.resolution, config.damping),
            sphere: SphereBody::new(config.sphere_start, config.sphere_radius),
            interaction,
            light: unit(config.light_direction),
            gravity: config.gravity,
            substeps: config.substeps,
            paused: false,
            sphere_physics: config.sphere_physics,
            frame: 0,
        };

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        for i in 0..config.initial_drops {
            let strength = if i & 1 == 1 {
                config.drop_strength
            } else {
                -config.drop_strength
            };
            scene.water.add_drop(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                config.drop_radius,
                strength,
            );
        }
        scene.refresh_derived();

        log::info!(
            "Scene ready: {}x{} water, sphere r={} at {:?}, {} initial drops",
            scene.water.width,
            scene.water.depth,
            scene.sphere.radius,
            scene.sphere.center,
            config.initial_drops
        );
        scene
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.interaction.camera
    }

    pub fn mode(&self) -> InteractionMode {
        self.interaction.mode
    }

    /// Completed unpaused frames.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Advance the simulation by one rendered frame of `dt` seconds.
    ///
    /// Does nothing while paused; pointer input keeps working regardless.
    pub fn frame(&mut self, dt: f32) -> FrameReport {
        if self.paused {
            return FrameReport::default();
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        let mut report = FrameReport {
            advanced: true,
            floor_contact: false,
        };
        for stage in FrameStage::ORDER {
            report.floor_contact |= self.run_stage(stage, dt);
        }
        self.frame += 1;
        report
    }

    /// Run one stage. Returns true on a floor contact.
    fn run_stage(&mut self, stage: FrameStage, dt: f32) -> bool {
        match stage {
            FrameStage::SpherePhysics => {
                // Kinematic unless integrated and free
                if self.interaction.is_dragging_sphere() || !self.sphere_physics {
                    self.sphere.hold();
                } else if self.sphere.integrate(self.gravity, dt) {
                    log::debug!("frame {}: sphere hit the floor", self.frame);
                    return true;
                }
            }
            FrameStage::SphereCoupling => {
                self.water
                    .move_sphere(self.sphere.old_center, self.sphere.center, self.sphere.radius);
                self.sphere.commit_position();
            }
            FrameStage::WaveSteps => {
                for _ in 0..self.substeps {
                    self.water.step_simulation();
                }
            }
            FrameStage::Normals => self.water.update_normals(),
            FrameStage::Caustics => {
                self.water
                    .update_caustics(self.light, self.sphere.center, self.sphere.radius)
            }
        }
        false
    }

    /// Rebuild normals and caustics without stepping.
    pub fn refresh_derived(&mut self) {
        self.run_stage(FrameStage::Normals, 0.0);
        self.run_stage(FrameStage::Caustics, 0.0);
    }

    pub fn key(&mut self, key: SceneKey) {
        match key {
            SceneKey::TogglePhysics => {
                self.sphere_physics = !self.sphere_physics;
                log::info!("Sphere physics {}", on_off(self.sphere_physics));
            }
            SceneKey::TogglePause => {
                self.paused = !self.paused;
                log::info!("Simulation {}", if self.paused { "paused" } else { "resumed" });
            }
            SceneKey::LightFromCamera => {
                let camera = self.interaction.camera;
                self.light = from_angles(
                    (90.0 - camera.angle_y).to_radians(),
                    (-camera.angle_x).to_radians(),
                );
            }
        }
    }

    pub fn pointer_down(&mut self, viewport: Viewport, x: f32, y: f32) -> InteractionMode {
        interaction::pointer_down(
            &mut self.interaction,
            PointerTargets {
                water: &mut self.water,
                sphere: &mut self.sphere,
            },
            viewport,
            x,
            y,
        )
    }

    pub fn pointer_move(&mut self, viewport: Viewport, x: f32, y: f32) {
        interaction::pointer_move(
            &mut self.interaction,
            PointerTargets {
                water: &mut self.water,
                sphere: &mut self.sphere,
            },
            viewport,
            x,
            y,
        );
    }

    pub fn pointer_up(&mut self) {
        interaction::pointer_up(&mut self.interaction);
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
