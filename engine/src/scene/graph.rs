//! Scene Graph
//!
//! CPU-side node tree owned by the explorer context. Nodes carry a local
//! transform, an optional renderable and an optional pick shape. Nodes can be
//! built detached and linked under the root in one step, so half-built content
//! never shows up in a draw list.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

use crate::camera::raycast::{Ray, intersect_annulus, intersect_sphere};
use crate::render::backend::{DrawItem, GeometryId, MaterialId};

/// Handle to a node in a [`SceneGraph`]. Ids are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// Translation, rotation and scale of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// A drawable attached to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Renderable {
    pub geometry: GeometryId,
    pub material: MaterialId,
}

/// Shape used for picking, in node-local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PickShape {
    Sphere { radius: f32 },
    /// Flat ring in the local XY plane.
    Annulus { inner: f32, outer: f32 },
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    /// Object identifier reported by picking.
    pub tag: Option<String>,
    pub transform: Transform,
    pub renderable: Option<Renderable>,
    pub pick: Option<PickShape>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tag: None,
            transform: Transform::default(),
            renderable: None,
            pick: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A pick-shape intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Vec3,
}

#[derive(Debug)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::new("scene"));
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, including the root and detached nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Create a detached node.
    pub fn create_node(&mut self, name: &str) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(name));
        id
    }

    /// Create a node already parented under `parent`.
    pub fn create_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.create_node(name);
        self.add_child(parent, id);
        id
    }

    /// Re-parent `child` under `parent`. Unknown ids, the root, and cycles are ignored.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if child == self.root
            || !self.nodes.contains_key(&parent)
            || !self.nodes.contains_key(&child)
            || self.is_ancestor(child, parent)
        {
            return;
        }
        self.detach(child);
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(child);
        }
    }

    /// Link a node under the root so it is drawn and pickable.
    pub fn attach(&mut self, child: NodeId) {
        let root = self.root;
        self.add_child(root, child);
    }

    /// Unlink a node from its parent, keeping the subtree alive. Detached nodes are a no-op.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(&id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != id);
        }
    }

    /// Remove a node and all of its descendants. Returns the removed ids.
    ///
    /// Removing an unknown id (already removed) returns an empty list.
    pub fn remove_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        if id == self.root || !self.nodes.contains_key(&id) {
            return Vec::new();
        }
        self.detach(id);

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
                removed.push(current);
            }
        }
        removed
    }

    /// Whether `ancestor` appears on the parent chain of `node` (or is `node`).
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    /// Whether the node is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id) && self.is_ancestor(self.root, id)
    }

    /// Local-to-world matrix, composed up the parent chain.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.nodes.get(&id)?;
        let mut matrix = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = self.nodes.get(&parent)?;
            matrix = node.transform.matrix() * matrix;
        }
        Some(matrix)
    }

    /// First tag found walking from `id` up through its ancestors.
    pub fn tagged_ancestor(&self, id: NodeId) -> Option<&str> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(&node_id)?;
            if let Some(tag) = node.tag.as_deref() {
                return Some(tag);
            }
            current = node.parent;
        }
        None
    }

    /// Depth-first walk over attached nodes with their world matrices.
    fn visit_attached(&self, mut visit: impl FnMut(NodeId, &Node, Mat4)) {
        let mut stack = vec![(self.root, Mat4::IDENTITY)];
        while let Some((id, parent_matrix)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let world = parent_matrix * node.transform.matrix();
            visit(id, node, world);
            for child in node.children.iter().rev() {
                stack.push((*child, world));
            }
        }
    }

    /// Flatten attached renderables into draw items, parents before children.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut draws = Vec::new();
        self.visit_attached(|_, node, world| {
            if let Some(r) = node.renderable {
                draws.push(DrawItem {
                    geometry: r.geometry,
                    material: r.material,
                    model: world,
                });
            }
        });
        draws
    }

    /// Intersect a world-space ray with every attached pick shape, nearest first.
    pub fn intersect_ray(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits = Vec::new();
        self.visit_attached(|id, node, world| {
            let Some(shape) = node.pick else {
                return;
            };
            if let Some(hit) = pick_in_local_space(ray, world, shape) {
                hits.push(RayHit {
                    node: id,
                    distance: hit.0,
                    point: hit.1,
                });
            }
        });
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

/// Intersect in the node's local frame so scaled and rotated shapes pick correctly.
fn pick_in_local_space(ray: &Ray, world: Mat4, shape: PickShape) -> Option<(f32, Vec3)> {
    let det = world.determinant();
    if !det.is_finite() || det.abs() < 1e-12 {
        return None;
    }
    let inverse = world.inverse();
    let local_dir = inverse.transform_vector3(ray.direction);
    if local_dir.length_squared() < 1e-12 {
        return None;
    }
    let local_ray = Ray::new(inverse.transform_point3(ray.origin), local_dir);

    let t = match shape {
        PickShape::Sphere { radius } => intersect_sphere(&local_ray, Vec3::ZERO, radius)?,
        PickShape::Annulus { inner, outer } => {
            intersect_annulus(&local_ray, Vec3::ZERO, Vec3::Z, inner, outer)?
        }
    };

    let point = world.transform_point3(local_ray.at(t));
    Some(((point - ray.origin).length(), point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::ResourceIds;

    #[test]
    fn test_new_graph_has_only_root() {
        let graph = SceneGraph::new();
        assert_eq!(graph.len(), 1);
        assert!(graph.is_empty());
        assert!(graph.is_attached(graph.root()));
    }

    #[test]
    fn test_detached_nodes_are_not_drawn() {
        let mut graph = SceneGraph::new();
        let mut ids = ResourceIds::new();
        let node = graph.create_node("galaxy");
        graph.node_mut(node).unwrap().renderable = Some(Renderable {
            geometry: ids.next_geometry(),
            material: ids.next_material(),
        });
        assert!(graph.draw_list().is_empty());
        graph.attach(node);
        assert_eq!(graph.draw_list().len(), 1);
    }

    #[test]
    fn test_remove_subtree_removes_descendants_and_tolerates_repeat() {
        let mut graph = SceneGraph::new();
        let group = graph.create_node("belt");
        let a = graph.create_child(group, "a");
        let b = graph.create_child(a, "b");
        graph.attach(group);

        let removed = graph.remove_subtree(group);
        assert_eq!(removed.len(), 3);
        assert!(!graph.contains(b));
        assert!(graph.node(graph.root()).unwrap().children().is_empty());
        assert!(graph.remove_subtree(group).is_empty());
    }

    #[test]
    fn test_root_cannot_be_removed_or_reparented() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let n = graph.create_node("n");
        assert!(graph.remove_subtree(root).is_empty());
        graph.add_child(n, root);
        assert!(graph.node(root).unwrap().parent().is_none());
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node("a");
        let b = graph.create_child(a, "b");
        graph.add_child(b, a);
        assert_eq!(graph.node(a).unwrap().parent(), None);
    }

    #[test]
    fn test_world_matrix_composes_parents() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node("parent");
        graph.node_mut(parent).unwrap().transform = Transform::from_translation(Vec3::X);
        let child = graph.create_child(parent, "child");
        graph.node_mut(child).unwrap().transform = Transform::from_translation(Vec3::Y);
        let m = graph.world_matrix(child).unwrap();
        assert!(m.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn test_tagged_ancestor_walks_up() {
        let mut graph = SceneGraph::new();
        let group = graph.create_node("black-hole");
        graph.node_mut(group).unwrap().tag = Some("black-hole".to_string());
        let disk = graph.create_child(group, "disk");
        let lone = graph.create_node("lone");
        assert_eq!(graph.tagged_ancestor(disk), Some("black-hole"));
        assert_eq!(graph.tagged_ancestor(lone), None);
    }

    #[test]
    fn test_intersect_ray_sorted_nearest_first() {
        let mut graph = SceneGraph::new();
        let near = graph.create_node("near");
        graph.node_mut(near).unwrap().transform = Transform::from_translation(Vec3::new(0.0, 0.0, 3.0));
        graph.node_mut(near).unwrap().pick = Some(PickShape::Sphere { radius: 0.5 });
        let far = graph.create_node("far");
        graph.node_mut(far).unwrap().pick = Some(PickShape::Sphere { radius: 1.0 });
        graph.attach(far);
        graph.attach(near);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let hits = graph.intersect_ray(&ray);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, near);
        assert!((hits[0].distance - 6.5).abs() < 1e-4);
        assert_eq!(hits[1].node, far);
    }

    #[test]
    fn test_rotated_annulus_picks_in_xz_plane() {
        let mut graph = SceneGraph::new();
        let ring = graph.create_node("ring");
        let node = graph.node_mut(ring).unwrap();
        node.transform = Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2));
        node.pick = Some(PickShape::Annulus { inner: 1.7, outer: 3.5 });
        graph.attach(ring);

        let down = Ray::new(Vec3::new(2.5, 4.0, 0.0), Vec3::NEG_Y);
        let hits = graph.intersect_ray(&down);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - 4.0).abs() < 1e-4);

        let hole = Ray::new(Vec3::new(0.5, 4.0, 0.0), Vec3::NEG_Y);
        assert!(graph.intersect_ray(&hole).is_empty());
    }

    #[test]
    fn test_scaled_sphere_reports_world_distance() {
        let mut graph = SceneGraph::new();
        let s = graph.create_node("s");
        let node = graph.node_mut(s).unwrap();
        node.transform.scale = Vec3::splat(2.0);
        node.pick = Some(PickShape::Sphere { radius: 1.0 });
        graph.attach(s);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let hits = graph.intersect_ray(&ray);
        assert!((hits[0].distance - 8.0).abs() < 1e-4);
    }
}
