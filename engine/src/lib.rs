//! Cosmic Explorer Engine
//!
//! Core of an interactive procedural galaxy explorer. The library owns the
//! scene graph, camera rig, input mapping and the renderer boundary; the
//! `galaxy` module builds the actual content on top of them.
//!
//! # Modules
//!
//! - [`render`] - Renderer trait, wgpu and headless implementations, GPU uniforms
//! - [`scene`] - Scene graph and the content manager that swaps regenerated visuals
//! - [`camera`] - Orbit rig and picking rays
//! - [`input`] - Pointer tracking and key bindings
//! - [`galaxy`] - Galaxy generation, asteroid belts, warp and the explorer itself
//!
//! # Example
//!
//! ```ignore
//! use cosmic_explorer_engine::galaxy::{ExplorerConfig, GalaxyExplorer, CameraPreset};
//! use cosmic_explorer_engine::render::HeadlessRenderer;
//! use rand::SeedableRng;
//!
//! let renderer = HeadlessRenderer::new(1280, 720)?;
//! let rng = rand::rngs::StdRng::seed_from_u64(7);
//! let mut explorer = GalaxyExplorer::new(renderer, ExplorerConfig::default(), rng, || 0.0)?;
//!
//! explorer.set_camera_position(CameraPreset::Top);
//! explorer.trigger_warp();
//! explorer.frame()?;
//! ```

pub mod camera;
pub mod error;
pub mod input;
pub mod render;
pub mod scene;

// Galaxy content (located in src/galaxy/ directory)
#[path = "../../src/galaxy/mod.rs"]
pub mod galaxy;

pub use error::{ExplorerError, ExplorerResult};
pub use galaxy::{CameraPreset, ExplorerConfig, GalaxyExplorer, GalaxyParameters};
pub use render::{SceneRenderer, WgpuRenderer};
