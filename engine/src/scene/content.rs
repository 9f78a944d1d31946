//! Scene Content Manager
//!
//! Owns the lifecycle of regenerable visual groups. Each generator call returns
//! a [`ContentBundle`] listing every renderer resource it allocated; installing
//! a bundle into a slot removes the previous occupant's nodes and disposes its
//! resources directly from that list, never by walking the scene graph.
//!
//! Replacement happens between frames (the frame tick finishes before the
//! renderer draws), so a disposed resource is never referenced by a frame that
//! is being built.

use std::collections::BTreeMap;

use log::{debug, warn};

use super::graph::{NodeId, SceneGraph};
use crate::render::backend::{GeometryId, MaterialId, SceneRenderer};

/// Identifies one regenerable visual.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentSlot {
    Galaxy,
    Belt(usize),
    Ship,
    Disk,
}

/// Everything one generator call created: a detached node subtree plus the
/// renderer resources owned exclusively by it.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentBundle {
    pub root: NodeId,
    pub geometries: Vec<GeometryId>,
    pub materials: Vec<MaterialId>,
}

impl ContentBundle {
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            geometries: Vec::new(),
            materials: Vec::new(),
        }
    }

    pub fn resource_count(&self) -> usize {
        self.geometries.len() + self.materials.len()
    }

    /// Release the bundle's nodes and resources.
    fn release<R: SceneRenderer + ?Sized>(self, graph: &mut SceneGraph, renderer: &mut R) {
        if graph.remove_subtree(self.root).is_empty() {
            debug!("content root {:?} was already detached", self.root);
        }
        for geometry in self.geometries {
            renderer.dispose_geometry(geometry);
        }
        for material in self.materials {
            renderer.dispose_material(material);
        }
    }
}

#[derive(Debug, Default)]
pub struct SceneContentManager {
    slots: BTreeMap<ContentSlot, ContentBundle>,
    torn_down: bool,
}

impl SceneContentManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever occupies `slot` with `bundle` and attach it to the scene.
    ///
    /// The outgoing bundle is removed from the graph and its resources are
    /// disposed before the new root is attached.
    pub fn install<R: SceneRenderer + ?Sized>(
        &mut self,
        slot: ContentSlot,
        bundle: ContentBundle,
        graph: &mut SceneGraph,
        renderer: &mut R,
    ) {
        if self.torn_down {
            warn!("install into {slot:?} after teardown; releasing bundle");
            bundle.release(graph, renderer);
            return;
        }
        if let Some(old) = self.slots.remove(&slot) {
            debug!(
                "replacing {slot:?}: disposing {} resources",
                old.resource_count()
            );
            old.release(graph, renderer);
        }
        graph.attach(bundle.root);
        self.slots.insert(slot, bundle);
    }

    /// Remove and release a single slot. Empty slots are a no-op.
    pub fn clear<R: SceneRenderer + ?Sized>(
        &mut self,
        slot: ContentSlot,
        graph: &mut SceneGraph,
        renderer: &mut R,
    ) {
        if let Some(old) = self.slots.remove(&slot) {
            old.release(graph, renderer);
        }
    }

    /// Release every tracked slot. Later calls do nothing.
    pub fn teardown<R: SceneRenderer + ?Sized>(
        &mut self,
        graph: &mut SceneGraph,
        renderer: &mut R,
    ) {
        if self.torn_down {
            return;
        }
        let slots = std::mem::take(&mut self.slots);
        debug!("tearing down {} content slots", slots.len());
        for (_, bundle) in slots {
            bundle.release(graph, renderer);
        }
        self.torn_down = true;
    }

    pub fn get(&self, slot: ContentSlot) -> Option<&ContentBundle> {
        self.slots.get(&slot)
    }

    pub fn root(&self, slot: ContentSlot) -> Option<NodeId> {
        self.slots.get(&slot).map(|b| b.root)
    }

    pub fn slots(&self) -> impl Iterator<Item = ContentSlot> + '_ {
        self.slots.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Resources tracked across all slots.
    pub fn tracked_resources(&self) -> usize {
        self.slots.values().map(ContentBundle::resource_count).sum()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::{GeometryData, MaterialDesc};
    use crate::render::headless::HeadlessRenderer;
    use crate::render::vertex::MeshData;
    use crate::scene::graph::Renderable;

    fn make_bundle(graph: &mut SceneGraph, renderer: &mut HeadlessRenderer) -> ContentBundle {
        let root = graph.create_node("group");
        let child = graph.create_child(root, "mesh");
        let geometry = renderer.create_geometry(&GeometryData::Mesh(MeshData::new()));
        let material = renderer.create_material(&MaterialDesc::Basic { color: [1.0; 3] });
        graph.node_mut(child).unwrap().renderable = Some(Renderable { geometry, material });
        ContentBundle {
            root,
            geometries: vec![geometry],
            materials: vec![material],
        }
    }

    #[test]
    fn test_install_replaces_and_disposes() {
        let mut graph = SceneGraph::new();
        let mut renderer = HeadlessRenderer::new(4, 4).unwrap();
        let mut content = SceneContentManager::new();

        let first = make_bundle(&mut graph, &mut renderer);
        let first_root = first.root;
        content.install(ContentSlot::Galaxy, first, &mut graph, &mut renderer);
        assert!(graph.is_attached(first_root));

        let second = make_bundle(&mut graph, &mut renderer);
        content.install(ContentSlot::Galaxy, second, &mut graph, &mut renderer);

        assert!(!graph.contains(first_root));
        assert_eq!(renderer.resource_stats().total(), 2);
        assert_eq!(content.tracked_resources(), 2);
        assert_eq!(graph.draw_list().len(), 1);
    }

    #[test]
    fn test_repeated_install_is_bounded() {
        let mut graph = SceneGraph::new();
        let mut renderer = HeadlessRenderer::new(4, 4).unwrap();
        let mut content = SceneContentManager::new();
        for _ in 0..50 {
            let bundle = make_bundle(&mut graph, &mut renderer);
            content.install(ContentSlot::Belt(0), bundle, &mut graph, &mut renderer);
        }
        assert_eq!(renderer.resource_stats().total(), 2);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_externally_detached_root_is_tolerated() {
        let mut graph = SceneGraph::new();
        let mut renderer = HeadlessRenderer::new(4, 4).unwrap();
        let mut content = SceneContentManager::new();
        let bundle = make_bundle(&mut graph, &mut renderer);
        let root = bundle.root;
        content.install(ContentSlot::Ship, bundle, &mut graph, &mut renderer);
        graph.remove_subtree(root);

        content.clear(ContentSlot::Ship, &mut graph, &mut renderer);
        assert_eq!(renderer.resource_stats().total(), 0);
        content.clear(ContentSlot::Ship, &mut graph, &mut renderer);
    }

    #[test]
    fn test_teardown_releases_everything_once() {
        let mut graph = SceneGraph::new();
        let mut renderer = HeadlessRenderer::new(4, 4).unwrap();
        let mut content = SceneContentManager::new();
        for slot in [ContentSlot::Galaxy, ContentSlot::Disk, ContentSlot::Belt(1)] {
            let bundle = make_bundle(&mut graph, &mut renderer);
            content.install(slot, bundle, &mut graph, &mut renderer);
        }
        content.teardown(&mut graph, &mut renderer);
        assert!(content.is_empty());
        assert!(graph.is_empty());
        assert_eq!(renderer.resource_stats().total(), 0);

        content.teardown(&mut graph, &mut renderer);
        let late = make_bundle(&mut graph, &mut renderer);
        content.install(ContentSlot::Galaxy, late, &mut graph, &mut renderer);
        assert!(content.is_empty());
        assert_eq!(renderer.resource_stats().total(), 0);
    }
}
