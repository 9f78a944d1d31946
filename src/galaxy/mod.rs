//! Galaxy
//!
//! Procedural galaxy content and the explorer that drives it: parameter
//! validation, spiral point-cloud generation, asteroid belts, the central
//! sphere and disk, the ship, the warp transition and camera presets.

pub mod animation;
pub mod belts;
pub mod camera_preset;
pub mod config;
pub mod explorer;
pub mod generator;
pub mod geometry;
pub mod params;

pub use animation::{
    FrameClock, FrameReport, MonotonicClock, TimeSource, WarpConfig, WarpEffect, WarpState,
    ease_out_quart,
};
pub use belts::{AsteroidBelt, AsteroidInstance, BeltConfig, generate_asteroid_belt};
pub use camera_preset::CameraPreset;
pub use config::{CONFIG_ENV_VAR, ExplorerConfig, MAX_MESH_SEGMENTS};
pub use explorer::{BLACK_HOLE_TAG, GalaxyExplorer, ObjectClickHandler, SHIP_TAG, SceneContext};
pub use generator::{GalaxyColors, generate_point_cloud};
pub use params::{
    GalaxyParameters, MAX_POINT_COUNT, MAX_RADIUS, MAX_RANDOMNESS, MAX_SPIN, random_parameters,
};
