//! Asteroid Belts
//!
//! A belt is a ring of asteroid instances scattered around a target orbital
//! radius. Every belt carries a small set of icosahedron prototypes; each
//! asteroid picks one at random and gets its own position and orientation.
//! Instances sharing a prototype are uploaded as one instanced mesh.

use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::generate_icosahedron;
use crate::render::backend::{GeometryData, MaterialDesc};
use crate::render::uniforms::rgb_from_hex;
use crate::render::vertex::MeshData;

/// Number of distinct asteroid shapes per belt.
pub const PROTOTYPE_COUNT: usize = 30;
/// Prototype radius range.
const PROTOTYPE_MIN_RADIUS: f32 = 0.02;
const PROTOTYPE_RADIUS_SPREAD: f32 = 0.05;
/// Total radial jitter around the belt radius.
const RADIAL_JITTER: f32 = 0.5;
/// Total vertical jitter around the disk plane.
const VERTICAL_JITTER: f32 = 0.1;

const ASTEROID_COLOR: u32 = 0x888888;
const ASTEROID_ROUGHNESS: f32 = 0.8;
const ASTEROID_METALNESS: f32 = 0.5;

/// One belt as configured: its radius relative to the galaxy radius, its
/// asteroid count and its rotation per frame (radians).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BeltConfig {
    pub radius_factor: f32,
    pub count: u32,
    pub speed: f32,
}

impl BeltConfig {
    /// The inner and outer belt.
    pub fn defaults() -> Vec<BeltConfig> {
        vec![
            BeltConfig {
                radius_factor: 1.2,
                count: 300,
                speed: 0.0005,
            },
            BeltConfig {
                radius_factor: 1.5,
                count: 400,
                speed: 0.0003,
            },
        ]
    }
}

/// A placed asteroid: prototype index plus its local transform in the belt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AsteroidInstance {
    pub prototype: usize,
    pub transform: Mat4,
}

#[derive(Clone, Debug)]
pub struct AsteroidBelt {
    pub radius: f32,
    pub speed: f32,
    pub prototypes: Vec<MeshData>,
    pub asteroids: Vec<AsteroidInstance>,
}

impl AsteroidBelt {
    /// Instanced meshes to upload, one per prototype that has asteroids.
    pub fn geometry(&self) -> Vec<GeometryData> {
        let mut buckets: Vec<Vec<Mat4>> = vec![Vec::new(); self.prototypes.len()];
        for asteroid in &self.asteroids {
            if let Some(bucket) = buckets.get_mut(asteroid.prototype) {
                bucket.push(asteroid.transform);
            }
        }
        self.prototypes
            .iter()
            .zip(buckets)
            .filter(|(_, instances)| !instances.is_empty())
            .map(|(mesh, instances)| GeometryData::InstancedMesh {
                mesh: mesh.clone(),
                instances,
            })
            .collect()
    }

    /// Shared material for every asteroid in the belt.
    pub fn material() -> MaterialDesc {
        MaterialDesc::Standard {
            color: rgb_from_hex(ASTEROID_COLOR),
            roughness: ASTEROID_ROUGHNESS,
            metalness: ASTEROID_METALNESS,
        }
    }
}

/// Scatter `count` asteroids around `radius`.
pub fn generate_asteroid_belt<R: Rng + ?Sized>(
    radius: f32,
    count: u32,
    speed: f32,
    rng: &mut R,
) -> AsteroidBelt {
    let prototypes: Vec<MeshData> = (0..PROTOTYPE_COUNT)
        .map(|_| {
            generate_icosahedron(rng.r#gen::<f32>() * PROTOTYPE_RADIUS_SPREAD + PROTOTYPE_MIN_RADIUS)
        })
        .collect();

    let asteroids = (0..count)
        .map(|_| {
            let prototype = rng.gen_range(0..PROTOTYPE_COUNT);
            let angle = rng.r#gen::<f32>() * TAU;
            let r = radius + (rng.r#gen::<f32>() - 0.5) * RADIAL_JITTER;
            let y = (rng.r#gen::<f32>() - 0.5) * VERTICAL_JITTER;
            let rotation = Quat::from_euler(
                EulerRot::XYZ,
                rng.r#gen::<f32>() * PI,
                rng.r#gen::<f32>() * PI,
                rng.r#gen::<f32>() * PI,
            );
            AsteroidInstance {
                prototype,
                transform: Mat4::from_rotation_translation(
                    rotation,
                    Vec3::new(angle.cos() * r, y, angle.sin() * r),
                ),
            }
        })
        .collect();

    AsteroidBelt {
        radius,
        speed,
        prototypes,
        asteroids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_belt_instances_within_band() {
        let mut rng = StdRng::seed_from_u64(11);
        let belt = generate_asteroid_belt(6.0, 300, 0.0005, &mut rng);
        assert_eq!(belt.prototypes.len(), PROTOTYPE_COUNT);
        assert_eq!(belt.asteroids.len(), 300);
        for a in &belt.asteroids {
            let p = a.transform.w_axis.truncate();
            let planar = Vec3::new(p.x, 0.0, p.z).length();
            assert!((planar - 6.0).abs() <= 0.25 + 1e-4);
            assert!(p.y.abs() <= 0.05 + 1e-6);
            assert!(a.prototype < PROTOTYPE_COUNT);
        }
    }

    #[test]
    fn test_geometry_covers_every_asteroid() {
        let mut rng = StdRng::seed_from_u64(5);
        let belt = generate_asteroid_belt(7.5, 400, 0.0003, &mut rng);
        let geometry = belt.geometry();
        assert!(geometry.len() <= PROTOTYPE_COUNT);
        let total: usize = geometry.iter().map(GeometryData::instance_count).sum();
        assert_eq!(total, 400);
    }

    #[test]
    fn test_empty_belt_has_no_geometry() {
        let mut rng = StdRng::seed_from_u64(5);
        let belt = generate_asteroid_belt(7.5, 0, 0.0003, &mut rng);
        assert!(belt.geometry().is_empty());
    }

    #[test]
    fn test_default_belts() {
        let belts = BeltConfig::defaults();
        assert_eq!(belts.len(), 2);
        assert_eq!(belts[0].count, 300);
        assert_eq!(belts[1].radius_factor, 1.5);
    }
}
