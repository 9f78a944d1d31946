//! Explorer Configuration
//!
//! Every tunable of the explorer in one serde struct. `Default` matches the
//! built-in scene; a JSON file may override any subset of fields.

use std::path::Path;

use glam::Vec3;
use log::info;
use serde::{Deserialize, Serialize};

use super::animation::WarpConfig;
use super::belts::BeltConfig;
use super::params::GalaxyParameters;
use crate::error::{ExplorerError, ExplorerResult};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "COSMIC_EXPLORER_CONFIG";

/// Upper bound on sphere and ring tessellation. Keeps vertex counts and
/// indices within u32.
pub const MAX_MESH_SEGMENTS: u32 = 1024;

/// Camera rig settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub start_position: Vec3,
    pub auto_rotate_speed: f32,
    pub damping_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 100.0,
            start_position: Vec3::new(0.0, 3.0, 8.0),
            auto_rotate_speed: 0.2,
            damping_factor: 0.05,
        }
    }
}

/// Central dark sphere and its accretion ring.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskConfig {
    pub sphere_radius: f32,
    pub sphere_segments: u32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub ring_segments: u32,
    /// Packed 0xRRGGBB.
    pub inner_color: u32,
    pub outer_color: u32,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 1.5,
            sphere_segments: 64,
            inner_radius: 1.7,
            outer_radius: 3.5,
            ring_segments: 128,
            inner_color: 0xff8800,
            outer_color: 0xff0000,
        }
    }
}

/// Ship proxy orbit and bobbing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub orbit_radius: f32,
    pub height: f32,
    /// Orbital drift in radians per second.
    pub drift_speed: f32,
    pub bob_amplitude: f32,
    /// Bobbing angular frequency in radians per second.
    pub bob_frequency: f32,
    pub scale: f32,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            orbit_radius: 6.5,
            height: 1.2,
            drift_speed: 0.05,
            bob_amplitude: 0.08,
            bob_frequency: 1.3,
            scale: 0.25,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsConfig {
    /// Sprite size in world units (attenuated with distance).
    pub size: f32,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self { size: 0.01 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub initial_params: GalaxyParameters,
    pub warp: WarpConfig,
    pub camera: CameraConfig,
    pub belts: Vec<BeltConfig>,
    pub disk: DiskConfig,
    pub ship: ShipConfig,
    pub points: PointsConfig,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            initial_params: GalaxyParameters::default(),
            warp: WarpConfig::default(),
            camera: CameraConfig::default(),
            belts: BeltConfig::defaults(),
            disk: DiskConfig::default(),
            ship: ShipConfig::default(),
            points: PointsConfig::default(),
        }
    }
}

impl ExplorerConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ExplorerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(text: &str) -> ExplorerResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], or defaults when unset.
    pub fn from_env() -> ExplorerResult<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> ExplorerResult<()> {
        self.initial_params.validate()?;

        if !self.warp.duration_ms.is_finite() || self.warp.duration_ms <= 0.0 {
            return Err(invalid(format!(
                "warp.duration_ms must be positive, got {}",
                self.warp.duration_ms
            )));
        }
        if !self.warp.depth_stretch.is_finite() || !self.warp.fov_widen.is_finite() {
            return Err(invalid("warp stretch and fov widen must be finite".to_string()));
        }

        let cam = &self.camera;
        if !(cam.near > 0.0 && cam.far > cam.near && cam.far.is_finite()) {
            return Err(invalid(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                cam.near, cam.far
            )));
        }
        if !(cam.fov > 0.0 && cam.fov < 180.0) {
            return Err(invalid(format!("camera.fov must be in (0, 180), got {}", cam.fov)));
        }
        if cam.fov + self.warp.fov_widen >= 180.0 {
            return Err(invalid(format!(
                "camera.fov + warp.fov_widen must stay below 180, got {}",
                cam.fov + self.warp.fov_widen
            )));
        }
        if !cam.start_position.is_finite() || cam.start_position == Vec3::ZERO {
            return Err(invalid("camera.start_position must be finite and off the origin".to_string()));
        }

        let disk = &self.disk;
        if !(disk.sphere_radius > 0.0 && disk.inner_radius > 0.0 && disk.outer_radius > disk.inner_radius)
        {
            return Err(invalid(format!(
                "disk radii must satisfy sphere > 0 and 0 < inner < outer, got sphere={} inner={} outer={}",
                disk.sphere_radius, disk.inner_radius, disk.outer_radius
            )));
        }
        if disk.sphere_segments > MAX_MESH_SEGMENTS || disk.ring_segments > MAX_MESH_SEGMENTS {
            return Err(invalid(format!(
                "disk segments must be at most {MAX_MESH_SEGMENTS}, got sphere={} ring={}",
                disk.sphere_segments, disk.ring_segments
            )));
        }

        for (i, belt) in self.belts.iter().enumerate() {
            if !belt.radius_factor.is_finite() || belt.radius_factor <= 0.0 || !belt.speed.is_finite() {
                return Err(invalid(format!(
                    "belt {i} needs a positive radius factor and finite speed"
                )));
            }
        }

        if !(self.points.size > 0.0 && self.points.size.is_finite()) {
            return Err(invalid(format!("points.size must be positive, got {}", self.points.size)));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> ExplorerError {
    ExplorerError::InvalidConfig(msg)
}
