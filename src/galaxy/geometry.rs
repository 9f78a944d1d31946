//! Mesh Generators
//!
//! Low-poly meshes for the central sphere, the accretion ring, asteroid
//! prototypes and the ship proxy. Vertex colors are white; materials supply
//! the color.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::render::vertex::{MeshData, MeshVertex};

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// UV sphere centered at the origin with smooth normals.
pub fn generate_sphere(radius: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity(((segments + 1) * (segments + 1)) as usize);
    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);

    for lat in 0..=segments {
        let theta = lat as f32 * PI / segments as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for lon in 0..=segments {
            let phi = lon as f32 * TAU / segments as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
            vertices.push(MeshVertex {
                position: (normal * radius).into(),
                normal: normal.into(),
                color: WHITE,
                uv: [lon as f32 / segments as f32, 1.0 - lat as f32 / segments as f32],
            });
        }
    }

    for lat in 0..segments {
        for lon in 0..segments {
            let first = lat * (segments + 1) + lon;
            let second = first + segments + 1;

            indices.extend_from_slice(&[first, second, first + 1]);
            indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    MeshData { vertices, indices }
}

/// Flat annulus in the XY plane facing +Z.
///
/// UVs map the outer radius to the unit square edges, so the center of the
/// ring is uv (0.5, 0.5) and the outer edge sits at uv distance 0.5.
pub fn generate_ring(inner_radius: f32, outer_radius: f32, theta_segments: u32) -> MeshData {
    let theta_segments = theta_segments.max(3);
    let outer = outer_radius.max(inner_radius);
    let mut vertices = Vec::with_capacity(2 * (theta_segments + 1) as usize);
    let mut indices = Vec::with_capacity(6 * theta_segments as usize);

    for r in [inner_radius, outer] {
        for i in 0..=theta_segments {
            let angle = i as f32 / theta_segments as f32 * TAU;
            let (sin, cos) = angle.sin_cos();
            let (x, y) = (cos * r, sin * r);
            vertices.push(MeshVertex {
                position: [x, y, 0.0],
                normal: [0.0, 0.0, 1.0],
                color: WHITE,
                uv: [(x / outer + 1.0) * 0.5, (y / outer + 1.0) * 0.5],
            });
        }
    }

    let row = theta_segments + 1;
    for i in 0..theta_segments {
        let a = i;
        let b = i + row;
        let c = i + row + 1;
        let d = i + 1;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    MeshData { vertices, indices }
}

/// Regular icosahedron with flat (per-face) normals.
pub fn generate_icosahedron(radius: f32) -> MeshData {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let corners = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .map(|c| c.normalize() * radius);

    const FACES: [[usize; 3]; 20] = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    flat_shaded(&corners, &FACES)
}

/// Dart-shaped ship proxy pointing along +Z, roughly unit sized.
pub fn generate_ship() -> MeshData {
    let corners = [
        Vec3::new(0.0, 0.0, 1.0),    // nose
        Vec3::new(-0.7, 0.0, -0.6),  // left wing
        Vec3::new(0.7, 0.0, -0.6),   // right wing
        Vec3::new(0.0, 0.25, -0.4),  // canopy
        Vec3::new(0.0, -0.15, -0.4), // keel
    ];
    const FACES: [[usize; 3]; 6] = [
        [0, 3, 1],
        [0, 2, 3],
        [0, 1, 4],
        [0, 4, 2],
        [1, 3, 2],
        [1, 2, 4],
    ];
    flat_shaded(&corners, &FACES)
}

/// Expand indexed faces into unshared vertices with face normals, wound
/// counter-clockwise when seen from outside the (convex, origin-centered) shape.
fn flat_shaded(corners: &[Vec3], faces: &[[usize; 3]]) -> MeshData {
    let centroid = corners.iter().copied().sum::<Vec3>() / corners.len().max(1) as f32;
    let mut mesh = MeshData::new();

    for face in faces {
        let [mut a, b, mut c] = face.map(|i| corners[i]);
        let mut normal = (b - a).cross(c - a).normalize_or_zero();
        let face_center = (a + b + c) / 3.0;
        if normal.dot(face_center - centroid) < 0.0 {
            std::mem::swap(&mut a, &mut c);
            normal = -normal;
        }

        let base = mesh.vertices.len() as u32;
        for p in [a, b, c] {
            mesh.vertices.push(MeshVertex {
                position: p.into(),
                normal: normal.into(),
                color: WHITE,
                uv: [0.0, 0.0],
            });
        }
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_valid(mesh: &MeshData) {
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_sphere_radius() {
        let mesh = generate_sphere(1.5, 64);
        assert_indices_valid(&mesh);
        for v in &mesh.vertices {
            assert!((Vec3::from(v.position).length() - 1.5).abs() < 1e-4);
        }
        assert_eq!(mesh.triangle_count(), 64 * 64 * 2);
    }

    #[test]
    fn test_ring_bounds_and_uv() {
        let mesh = generate_ring(1.7, 3.5, 128);
        assert_indices_valid(&mesh);
        assert_eq!(mesh.triangle_count(), 256);
        for v in &mesh.vertices {
            let r = Vec3::from(v.position).length();
            assert!(r > 1.69 && r < 3.51);
            assert_eq!(v.position[2], 0.0);
            let uv_r = ((v.uv[0] - 0.5).powi(2) + (v.uv[1] - 0.5).powi(2)).sqrt();
            assert!((uv_r - r / 3.5 * 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_icosahedron_flat_outward() {
        let mesh = generate_icosahedron(0.05);
        assert_indices_valid(&mesh);
        assert_eq!(mesh.triangle_count(), 20);
        assert_eq!(mesh.vertices.len(), 60);
        for tri in mesh.vertices.chunks(3) {
            let a = Vec3::from(tri[0].position);
            let b = Vec3::from(tri[1].position);
            let c = Vec3::from(tri[2].position);
            let n = Vec3::from(tri[0].normal);
            assert!(n.dot((a + b + c) / 3.0) > 0.0);
            // counter-clockwise from outside
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }

    #[test]
    fn test_ship_is_closed_and_small() {
        let mesh = generate_ship();
        assert_indices_valid(&mesh);
        assert_eq!(mesh.triangle_count(), 6);
        assert!(mesh.vertices.iter().all(|v| Vec3::from(v.position).length() <= 1.0));
    }
}
