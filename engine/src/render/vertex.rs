//! GPU Vertex Types
//!
//! Vertex layouts shared by the mesh generators and the renderers.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

// ============================================================================
// POINT CLOUD
// ============================================================================

/// One galaxy star: position and linear RGB color.
///
/// Layout (24 bytes): position vec3<f32>, color vec3<f32>. Uploaded as a
/// per-instance vertex buffer for camera-facing sprites.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

static_assertions::assert_eq_size!(PointVertex, [u8; 24]);

// ============================================================================
// MESH
// ============================================================================

/// Vertex for lit meshes and the accretion disk.
///
/// Layout (48 bytes): position, normal, color (rgba), uv.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 48]);

/// A mesh with vertices and indices
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: &MeshData) {
        let base_idx = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base_idx));
    }

    /// Apply a transform to every vertex (normals use the inverse transpose).
    pub fn transform(&mut self, matrix: Mat4) {
        let normal_matrix = matrix.inverse().transpose();
        for v in &mut self.vertices {
            let p = matrix.transform_point3(Vec3::from(v.position));
            let n = normal_matrix
                .transform_vector3(Vec3::from(v.normal))
                .normalize_or_zero();
            v.position = p.into();
            v.normal = n.into();
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Per-instance model matrix, four column vectors.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceTransform {
    pub columns: [[f32; 4]; 4],
}

impl From<Mat4> for InstanceTransform {
    fn from(m: Mat4) -> Self {
        Self {
            columns: m.to_cols_array_2d(),
        }
    }
}

impl InstanceTransform {
    pub const IDENTITY: Self = Self {
        columns: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };
}

static_assertions::assert_eq_size!(InstanceTransform, [u8; 64]);

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> MeshData {
        let v = |x: f32, y: f32| MeshVertex {
            position: [x, y, 0.0],
            normal: [0.0, 0.0, 1.0],
            color: [1.0; 4],
            uv: [0.0; 2],
        };
        MeshData {
            vertices: vec![v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = tri();
        a.merge(&tri());
        assert_eq!(a.vertices.len(), 6);
        assert_eq!(&a.indices[3..], &[3, 4, 5]);
        assert_eq!(a.triangle_count(), 2);
    }

    #[test]
    fn test_transform_rotates_normals() {
        let mut m = tri();
        m.transform(Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2));
        let n = Vec3::from(m.vertices[0].normal);
        assert!(n.abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn test_instance_identity_matches_glam() {
        assert_eq!(InstanceTransform::from(Mat4::IDENTITY), InstanceTransform::IDENTITY);
    }
}
