//! GPU Uniform Structures
//!
//! `#[repr(C)]` mirrors of the WGSL uniform blocks in `shaders/`. Field order
//! keeps every vec3 paired with a trailing f32 so the Rust and WGSL layouts match.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Scene ambient light intensity.
pub const AMBIENT_INTENSITY: f32 = 0.2;
/// Directional light intensity.
pub const DIRECTIONAL_INTENSITY: f32 = 0.5;
/// Direction the directional light shines from.
pub const DIRECTIONAL_FROM: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Shading modes stored in `DrawUniforms::params.x`.
pub mod shading {
    pub const UNLIT: f32 = 0.0;
    pub const LIT: f32 = 1.0;
}

/// Per-frame camera and lighting block (group 0, binding 0).
///
/// Layout (176 bytes):
/// - view: mat4x4<f32>
/// - proj: mat4x4<f32>
/// - camera_pos: vec3<f32>, ambient: f32
/// - light_dir: vec3<f32>, light_intensity: f32
/// - viewport: vec2<f32> (pixels), _pad: vec2<f32>
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub ambient: f32,
    pub light_dir: [f32; 3],
    pub light_intensity: f32,
    pub viewport: [f32; 2],
    pub _pad: [f32; 2],
}

static_assertions::assert_eq_size!(CameraUniforms, [u8; 176]);

impl Default for CameraUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO, (1920, 1080))
    }
}

impl CameraUniforms {
    pub fn new(view: Mat4, proj: Mat4, camera_pos: Vec3, viewport: (u32, u32)) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            camera_pos: camera_pos.into(),
            ambient: AMBIENT_INTENSITY,
            light_dir: DIRECTIONAL_FROM.normalize().into(),
            light_intensity: DIRECTIONAL_INTENSITY,
            viewport: [viewport.0.max(1) as f32, viewport.1.max(1) as f32],
            _pad: [0.0; 2],
        }
    }
}

/// Per-draw block (group 0, binding 1, dynamic offset).
///
/// Layout (96 bytes):
/// - model: mat4x4<f32>
/// - color: vec4<f32> (material base color)
/// - params: vec4<f32> (x: shading mode, y: point size, z: roughness, w: metalness)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub params: [f32; 4],
}

static_assertions::assert_eq_size!(DrawUniforms, [u8; 96]);

impl Default for DrawUniforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0, 1.0, 1.0, 1.0],
            params: [shading::UNLIT, 0.0, 1.0, 0.0],
        }
    }
}

/// Dynamic uniform offsets must be multiples of this on every backend.
pub const DRAW_UNIFORM_STRIDE: u64 = 256;

/// Accretion disk block (group 1, binding 0).
///
/// Layout (32 bytes):
/// - color1: vec3<f32>, time: f32
/// - color2: vec3<f32>, _pad: f32
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct DiskUniforms {
    pub color1: [f32; 3],
    pub time: f32,
    pub color2: [f32; 3],
    pub _pad: f32,
}

static_assertions::assert_eq_size!(DiskUniforms, [u8; 32]);

impl DiskUniforms {
    pub fn new(color1: [f32; 3], color2: [f32; 3]) -> Self {
        Self {
            color1,
            time: 0.0,
            color2,
            _pad: 0.0,
        }
    }
}

/// Convert a packed `0xRRGGBB` color to floats in [0, 1].
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_uniforms_lighting_defaults() {
        let u = CameraUniforms::default();
        assert_eq!(u.ambient, 0.2);
        assert_eq!(u.light_intensity, 0.5);
        assert_eq!(u.light_dir, [0.0, 0.0, 1.0]);
        assert_eq!(u.viewport, [1920.0, 1080.0]);
    }

    #[test]
    fn test_draw_stride_fits_uniforms() {
        assert!(std::mem::size_of::<DrawUniforms>() as u64 <= DRAW_UNIFORM_STRIDE);
    }

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(rgb_from_hex(0xff0000), [1.0, 0.0, 0.0]);
        let orange = rgb_from_hex(0xff8800);
        assert_eq!(orange[0], 1.0);
        assert!((orange[1] - 136.0 / 255.0).abs() < 1e-6);
        assert_eq!(orange[2], 0.0);
    }
}
