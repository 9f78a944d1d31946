//! WGSL sources, embedded at compile time.

/// Camera-facing point sprites for the galaxy cloud.
pub const POINTS_WGSL: &str = include_str!("../../../shaders/points.wgsl");
/// Instanced lit/unlit meshes.
pub const MESH_WGSL: &str = include_str!("../../../shaders/mesh.wgsl");
/// Animated accretion disk ring.
pub const DISK_WGSL: &str = include_str!("../../../shaders/disk.wgsl");

/// Every embedded shader with a display name, for validation passes.
pub const ALL: [(&str, &str); 3] = [
    ("points.wgsl", POINTS_WGSL),
    ("mesh.wgsl", MESH_WGSL),
    ("disk.wgsl", DISK_WGSL),
];
