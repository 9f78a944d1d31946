//! Render Module
//!
//! The renderer boundary the explorer core draws through, plus its two
//! implementations: a CPU-only headless renderer and the wgpu renderer used
//! by the windowed binary.

pub mod backend;
pub mod gpu_context;
pub mod headless;
pub mod shaders;
pub mod uniforms;
pub mod vertex;
pub mod wgpu_renderer;

pub use backend::{
    DrawItem, FrameView, GeometryData, GeometryId, MaterialDesc, MaterialId, ResourceStats,
    SceneRenderer,
};
pub use gpu_context::{GpuContext, GpuContextConfig};
pub use headless::HeadlessRenderer;
pub use uniforms::rgb_from_hex;
pub use vertex::{MeshData, MeshVertex, PointVertex};
pub use wgpu_renderer::WgpuRenderer;
