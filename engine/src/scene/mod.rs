//! Scene Module
//!
//! CPU-side scene graph and the content manager that swaps regenerated
//! visuals in and out of it.

pub mod content;
pub mod graph;

pub use content::{ContentBundle, ContentSlot, SceneContentManager};
pub use graph::{Node, NodeId, PickShape, RayHit, Renderable, SceneGraph, Transform};
