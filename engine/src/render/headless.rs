//! Headless Renderer
//!
//! A CPU-only [`SceneRenderer`] that tracks resource lifetimes and remembers
//! the last submitted frame. Used by tests and for running the explorer core
//! without a GPU.

use std::collections::HashMap;

use glam::Mat4;

use super::backend::{
    DrawItem, FrameView, GeometryData, GeometryId, MaterialDesc, MaterialId, ResourceIds,
    ResourceStats, SceneRenderer,
};
use crate::error::{ExplorerError, ExplorerResult};

/// Summary of a geometry kept by the headless renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeometryRecord {
    pub kind: GeometryKind,
    /// Points for clouds, instances for meshes.
    pub instances: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    Points,
    Mesh,
    InstancedMesh,
}

/// The last frame handed to [`SceneRenderer::render`].
#[derive(Clone, Debug, Default)]
pub struct SubmittedFrame {
    pub view: Mat4,
    pub projection: Mat4,
    pub draws: Vec<DrawItem>,
}

#[derive(Debug)]
pub struct HeadlessRenderer {
    ids: ResourceIds,
    geometries: HashMap<GeometryId, GeometryRecord>,
    materials: HashMap<MaterialId, MaterialDesc>,
    disk_times: HashMap<MaterialId, f32>,
    width: u32,
    height: u32,
    frames_rendered: u64,
    last_frame: Option<SubmittedFrame>,
    /// Draws that referenced a resource that was no longer alive.
    stale_draws: u64,
    created_total: u64,
    disposed_total: u64,
}

impl HeadlessRenderer {
    /// Acquire a headless surface. A zero-sized surface cannot be drawn to.
    pub fn new(width: u32, height: u32) -> ExplorerResult<Self> {
        if width == 0 || height == 0 {
            return Err(ExplorerError::RendererUnavailable(format!(
                "draw surface has no area ({width}x{height})"
            )));
        }
        Ok(Self {
            ids: ResourceIds::new(),
            geometries: HashMap::new(),
            materials: HashMap::new(),
            disk_times: HashMap::new(),
            width,
            height,
            frames_rendered: 0,
            last_frame: None,
            stale_draws: 0,
            created_total: 0,
            disposed_total: 0,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn last_frame(&self) -> Option<&SubmittedFrame> {
        self.last_frame.as_ref()
    }

    pub fn stale_draws(&self) -> u64 {
        self.stale_draws
    }

    /// Resources created and disposed over the renderer's lifetime.
    pub fn lifetime_totals(&self) -> (u64, u64) {
        (self.created_total, self.disposed_total)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&GeometryRecord> {
        self.geometries.get(&id)
    }

    pub fn material(&self, id: MaterialId) -> Option<&MaterialDesc> {
        self.materials.get(&id)
    }

    pub fn disk_time(&self, id: MaterialId) -> Option<f32> {
        self.disk_times.get(&id).copied()
    }

    /// Total live points across every point-cloud geometry.
    pub fn live_points(&self) -> usize {
        self.geometries
            .values()
            .filter(|g| g.kind == GeometryKind::Points)
            .map(|g| g.instances)
            .sum()
    }
}

impl SceneRenderer for HeadlessRenderer {
    fn create_geometry(&mut self, data: &GeometryData) -> GeometryId {
        let id = self.ids.next_geometry();
        let kind = match data {
            GeometryData::Points(_) => GeometryKind::Points,
            GeometryData::Mesh(_) => GeometryKind::Mesh,
            GeometryData::InstancedMesh { .. } => GeometryKind::InstancedMesh,
        };
        self.geometries.insert(
            id,
            GeometryRecord {
                kind,
                instances: data.instance_count(),
            },
        );
        self.created_total += 1;
        id
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> MaterialId {
        let id = self.ids.next_material();
        self.materials.insert(id, desc.clone());
        self.created_total += 1;
        id
    }

    fn dispose_geometry(&mut self, id: GeometryId) {
        if self.geometries.remove(&id).is_some() {
            self.disposed_total += 1;
        }
    }

    fn dispose_material(&mut self, id: MaterialId) {
        if self.materials.remove(&id).is_some() {
            self.disk_times.remove(&id);
            self.disposed_total += 1;
        }
    }

    fn set_disk_time(&mut self, material: MaterialId, time: f32) {
        if let Some(MaterialDesc::AccretionDisk { .. }) = self.materials.get(&material) {
            self.disk_times.insert(material, time);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
        }
    }

    fn surface_size(&self) -> (u32, u32) {
        self.size()
    }

    fn render(&mut self, frame: &FrameView<'_>) -> ExplorerResult<()> {
        let stale = frame
            .draws
            .iter()
            .filter(|d| {
                !self.geometries.contains_key(&d.geometry)
                    || !self.materials.contains_key(&d.material)
            })
            .count();
        self.stale_draws += stale as u64;
        self.frames_rendered += 1;
        self.last_frame = Some(SubmittedFrame {
            view: frame.view,
            projection: frame.projection,
            draws: frame.draws.to_vec(),
        });
        Ok(())
    }

    fn resource_stats(&self) -> ResourceStats {
        ResourceStats {
            geometries: self.geometries.len(),
            materials: self.materials.len(),
        }
    }
}
