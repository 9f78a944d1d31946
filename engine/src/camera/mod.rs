//! Camera Module
//!
//! Provides the orbit rig and picking rays for the engine.
//! This module is window-system agnostic - it only deals with camera state and math.

pub mod orbit_rig;
pub mod raycast;

pub use orbit_rig::{OrbitRig, DEFAULT_FOV};
pub use raycast::{
    Ray, get_ray_direction, intersect_annulus, intersect_sphere, ndc_from_pixels, ray_from_camera,
};
