//! Renderer Boundary
//!
//! The core never talks to a graphics API directly. It creates geometry and
//! materials through [`SceneRenderer`], gets opaque ids back, and submits a
//! flattened draw list once per frame. Releasing an id is the only way GPU-side
//! memory is freed, which keeps ownership explicit in the scene content manager.

use glam::{Mat4, Vec3};

use super::vertex::{MeshData, PointVertex};
use crate::error::ExplorerResult;

// ============================================================================
// RESOURCE IDS
// ============================================================================

/// Opaque handle to a geometry owned by a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u64);

/// Opaque handle to a material owned by a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u64);

impl GeometryId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl MaterialId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Monotonic id source shared by renderer implementations. Ids are never reused.
#[derive(Debug, Default)]
pub struct ResourceIds {
    next: u64,
}

impl ResourceIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    fn bump(&mut self) -> u64 {
        let id = self.next.max(1);
        self.next = id + 1;
        id
    }

    pub fn next_geometry(&mut self) -> GeometryId {
        GeometryId(self.bump())
    }

    pub fn next_material(&mut self) -> MaterialId {
        MaterialId(self.bump())
    }
}

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// CPU-side geometry handed to the renderer for upload.
#[derive(Clone, Debug)]
pub enum GeometryData {
    /// Point cloud drawn as camera-facing sprites.
    Points(Vec<PointVertex>),
    /// Indexed triangle mesh.
    Mesh(MeshData),
    /// Indexed triangle mesh drawn once per instance transform.
    InstancedMesh { mesh: MeshData, instances: Vec<Mat4> },
}

impl GeometryData {
    /// Number of drawable primitives (points, or mesh instances).
    pub fn instance_count(&self) -> usize {
        match self {
            GeometryData::Points(points) => points.len(),
            GeometryData::Mesh(_) => 1,
            GeometryData::InstancedMesh { instances, .. } => instances.len(),
        }
    }
}

/// Surface appearance of a renderable.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialDesc {
    /// Vertex-colored sprites, additive blending, no depth writes.
    PointSprites { size: f32 },
    /// Lit opaque surface.
    Standard {
        color: [f32; 3],
        roughness: f32,
        metalness: f32,
    },
    /// Unlit opaque surface.
    Basic { color: [f32; 3] },
    /// Swirling additive ring driven by a time uniform.
    AccretionDisk {
        inner_color: [f32; 3],
        outer_color: [f32; 3],
    },
}

// ============================================================================
// FRAME
// ============================================================================

/// One draw: geometry + material at a world transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub model: Mat4,
}

/// Everything the renderer needs to draw one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub draws: &'a [DrawItem],
}

/// Live resource counts, used to detect leaks across regenerations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResourceStats {
    pub geometries: usize,
    pub materials: usize,
}

impl ResourceStats {
    pub fn total(&self) -> usize {
        self.geometries + self.materials
    }
}

// ============================================================================
// TRAIT
// ============================================================================

/// Capability set the explorer core needs from a 3D engine.
///
/// Disposing an id that is unknown or already disposed is a no-op.
pub trait SceneRenderer {
    fn create_geometry(&mut self, data: &GeometryData) -> GeometryId;
    fn create_material(&mut self, desc: &MaterialDesc) -> MaterialId;
    fn dispose_geometry(&mut self, id: GeometryId);
    fn dispose_material(&mut self, id: MaterialId);
    /// Feed elapsed seconds into an accretion-disk material's time uniform.
    fn set_disk_time(&mut self, material: MaterialId, time: f32);
    fn resize(&mut self, width: u32, height: u32);
    /// Current drawable size in pixels.
    fn surface_size(&self) -> (u32, u32);
    fn render(&mut self, frame: &FrameView<'_>) -> ExplorerResult<()>;
    fn resource_stats(&self) -> ResourceStats;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_across_kinds() {
        let mut ids = ResourceIds::new();
        let g = ids.next_geometry();
        let m = ids.next_material();
        let g2 = ids.next_geometry();
        assert_ne!(g.raw(), m.raw());
        assert_ne!(g, g2);
        assert!(g2.raw() > g.raw());
    }

    #[test]
    fn test_default_ids_never_zero() {
        let mut ids = ResourceIds::default();
        assert_eq!(ids.next_geometry().raw(), 1);
    }

    #[test]
    fn test_instance_count() {
        let points = GeometryData::Points(vec![
            PointVertex {
                position: [0.0; 3],
                color: [1.0; 3],
            };
            7
        ]);
        assert_eq!(points.instance_count(), 7);
        let mesh = GeometryData::InstancedMesh {
            mesh: MeshData::new(),
            instances: vec![Mat4::IDENTITY; 3],
        };
        assert_eq!(mesh.instance_count(), 3);
    }
}
