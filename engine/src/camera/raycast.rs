//! Raycast Module
//!
//! Builds picking rays from the camera through normalized screen coordinates
//! and intersects them with the simple shapes used for object picking.

use glam::Vec3;

/// Minimum ray parameter accepted as a hit (ignores self-intersections at the origin).
const MIN_HIT_DISTANCE: f32 = 0.001;

/// A ray in world space with a normalized direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point along the ray at parameter `t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Convert window pixel coordinates into normalized device coordinates.
///
/// The result has x pointing right and y pointing up, both in [-1, 1], which is
/// what [`get_ray_direction`] and the explorer's hit test expect.
pub fn ndc_from_pixels(x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
    let w = width.max(1.0);
    let h = height.max(1.0);
    ((x / w) * 2.0 - 1.0, -(y / h) * 2.0 + 1.0)
}

/// Calculate ray direction from normalized device coordinates.
///
/// # Arguments
/// * `camera_pos` - Camera position in world space
/// * `camera_target` - Point the camera is looking at
/// * `ndc` - Normalized device coordinates (-1..1, -1..1), y up
/// * `aspect_ratio` - Screen aspect ratio (width / height)
/// * `fov` - Vertical field of view in radians
///
/// # Returns
/// Normalized ray direction in world space
pub fn get_ray_direction(
    camera_pos: Vec3,
    camera_target: Vec3,
    ndc: (f32, f32),
    aspect_ratio: f32,
    fov: f32,
) -> Vec3 {
    let half_fov = (fov * 0.5_f32).tan();

    let forward = (camera_target - camera_pos).normalize();
    let up_world = Vec3::Y;

    // Looking straight up or down: use world X as the right reference
    let (right, up) = if forward.y.abs() > 0.99 {
        let right = Vec3::X;
        let up = right.cross(forward).normalize();
        (right, up)
    } else {
        let right = forward.cross(up_world).normalize();
        let up = right.cross(forward);
        (right, up)
    };

    (forward + right * ndc.0 * aspect_ratio * half_fov + up * ndc.1 * half_fov).normalize()
}

/// Build a picking ray from the camera through a screen point.
pub fn ray_from_camera(
    camera_pos: Vec3,
    camera_target: Vec3,
    ndc: (f32, f32),
    aspect_ratio: f32,
    fov: f32,
) -> Ray {
    Ray {
        origin: camera_pos,
        direction: get_ray_direction(camera_pos, camera_target, ndc, aspect_ratio, fov),
    }
}

/// Ray-sphere intersection.
///
/// Returns the distance to the closest hit in front of the ray origin. When the
/// origin is inside the sphere the exit point is returned.
pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    // t² + 2t (oc · d) + (oc · oc - R²) = 0 with |d| = 1
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = -b - sqrt_disc;
    let t2 = -b + sqrt_disc;

    if t1 > MIN_HIT_DISTANCE {
        Some(t1)
    } else if t2 > MIN_HIT_DISTANCE {
        Some(t2)
    } else {
        None
    }
}

/// Ray intersection with a flat annulus (ring) centered at `center` with plane normal `normal`.
pub fn intersect_annulus(
    ray: &Ray,
    center: Vec3,
    normal: Vec3,
    inner_radius: f32,
    outer_radius: f32,
) -> Option<f32> {
    let denom = normal.dot(ray.direction);
    if denom.abs() < 0.0001 {
        // Ray is parallel to the ring plane
        return None;
    }

    let t = (center - ray.origin).dot(normal) / denom;
    if t < MIN_HIT_DISTANCE {
        return None;
    }

    let dist = (ray.at(t) - center).length();
    if dist >= inner_radius && dist <= outer_radius {
        Some(t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_direction_normalized() {
        let camera_pos = Vec3::new(0.0, 3.0, 8.0);
        let camera_target = Vec3::ZERO;

        for x in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            for y in [-1.0, -0.5, 0.0, 0.5, 1.0] {
                let ray = get_ray_direction(camera_pos, camera_target, (x, y), 16.0 / 9.0, 1.3);
                assert!(
                    (ray.length() - 1.0).abs() < 0.001,
                    "Ray should be normalized, got length {}",
                    ray.length()
                );
            }
        }
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera_pos = Vec3::new(10.0, 2.0, 0.0);
        let dir = get_ray_direction(camera_pos, Vec3::ZERO, (0.0, 0.0), 1.5, 1.3);
        let expected = (-camera_pos).normalize();
        assert!(dir.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_right_of_screen_goes_right() {
        // Camera on +Z looking toward origin: screen right is world +X
        let dir = get_ray_direction(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, (1.0, 0.0), 1.0, 1.0);
        assert!(dir.x > 0.0);
        let dir = get_ray_direction(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, (0.0, 1.0), 1.0, 1.0);
        assert!(dir.y > 0.0);
    }

    #[test]
    fn test_top_down_view_has_valid_basis() {
        let dir = get_ray_direction(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, (0.5, 0.5), 1.0, 1.3);
        assert!(dir.is_finite());
        assert!(dir.y < 0.0);
    }

    #[test]
    fn test_ndc_from_pixels_corners() {
        assert_eq!(ndc_from_pixels(0.0, 0.0, 800.0, 600.0), (-1.0, 1.0));
        assert_eq!(ndc_from_pixels(800.0, 600.0, 800.0, 600.0), (1.0, -1.0));
        assert_eq!(ndc_from_pixels(400.0, 300.0, 800.0, 600.0), (0.0, 0.0));
    }

    #[test]
    fn test_sphere_hit_front_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = intersect_sphere(&ray, Vec3::ZERO, 1.5).expect("should hit");
        assert!((t - 8.5).abs() < 1e-4);
    }

    #[test]
    fn test_sphere_miss() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 10.0), Vec3::NEG_Z);
        assert!(intersect_sphere(&ray, Vec3::ZERO, 1.5).is_none());
    }

    #[test]
    fn test_sphere_behind_origin() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(intersect_sphere(&ray, Vec3::ZERO, 1.5).is_none());
    }

    #[test]
    fn test_annulus_hit_and_hole() {
        let ray = Ray::new(Vec3::new(2.5, 5.0, 0.0), Vec3::NEG_Y);
        let t = intersect_annulus(&ray, Vec3::ZERO, Vec3::Y, 1.7, 3.5).expect("ring hit");
        assert!((t - 5.0).abs() < 1e-4);

        let through_hole = Ray::new(Vec3::new(1.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!(intersect_annulus(&through_hole, Vec3::ZERO, Vec3::Y, 1.7, 3.5).is_none());
    }

    #[test]
    fn test_annulus_parallel_ray() {
        let ray = Ray::new(Vec3::new(-10.0, 0.0, 0.0), Vec3::X);
        assert!(intersect_annulus(&ray, Vec3::ZERO, Vec3::Y, 1.7, 3.5).is_none());
    }
}
