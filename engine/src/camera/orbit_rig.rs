//! Orbit Camera Rig
//!
//! A spherical-coordinate orbit rig around a target point with damping and
//! auto-rotation, the viewer-side camera of the galaxy explorer.
//!
//! Controls (wired by the binary):
//! - Left mouse drag: Orbit (rotate around target)
//! - Right mouse drag: Pan (translate target point)
//! - Scroll wheel: Zoom (change distance from target)

use glam::{Mat4, Vec3};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default vertical field of view in degrees.
pub const DEFAULT_FOV: f32 = 75.0;
/// Near clip plane.
const DEFAULT_NEAR: f32 = 0.1;
/// Far clip plane.
const DEFAULT_FAR: f32 = 100.0;
/// Default camera start position.
const DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 3.0, 8.0);

/// Minimum zoom distance.
const MIN_DISTANCE: f32 = 0.5;
/// Maximum zoom distance.
const MAX_DISTANCE: f32 = 60.0;

/// Keeps the polar angle away from the poles so the look-at basis stays valid.
const POLAR_EPSILON: f32 = 1.0e-6;

/// Radians of orbit per viewport height of mouse drag.
const ORBIT_SPEED: f32 = std::f32::consts::TAU;

// ============================================================================
// SAVED STATE
// ============================================================================

/// Snapshot restored by [`OrbitRig::reset`].
#[derive(Debug, Clone, Copy, PartialEq)]
struct SavedRigState {
    position: Vec3,
    target: Vec3,
}

// ============================================================================
// ORBIT RIG
// ============================================================================

/// Orbiting camera rig.
///
/// `position` and `target` are the source of truth; user input and auto
/// rotation accumulate spherical deltas that [`OrbitRig::update`] applies once
/// per frame. With damping enabled the deltas decay over several frames.
#[derive(Debug, Clone)]
pub struct OrbitRig {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera orbits around and looks at.
    pub target: Vec3,
    /// Current vertical field of view in degrees.
    pub fov: f32,
    /// Field of view the rig returns to after transient effects.
    pub base_fov: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Whether the rig slowly spins around the target when idle.
    pub auto_rotate: bool,
    /// Auto-rotation speed; 1.0 is one revolution per minute at 60 fps.
    pub auto_rotate_speed: f32,
    /// Fraction of the pending motion applied per frame when damping.
    pub damping_factor: f32,
    /// Whether pending motion decays over frames instead of applying at once.
    pub enable_damping: bool,

    // -- Pending motion --
    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
    scale: f32,

    saved: SavedRigState,
}

impl Default for OrbitRig {
    fn default() -> Self {
        Self::new(DEFAULT_POSITION, 16.0 / 9.0)
    }
}

impl OrbitRig {
    /// Create a rig at `position` looking at the origin.
    pub fn new(position: Vec3, aspect: f32) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            fov: DEFAULT_FOV,
            base_fov: DEFAULT_FOV,
            aspect,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            auto_rotate: true,
            auto_rotate_speed: 0.2,
            damping_factor: 0.05,
            enable_damping: true,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            saved: SavedRigState {
                position,
                target: Vec3::ZERO,
            },
        }
    }

    /// Set both the current and the base field of view.
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self.base_fov = fov;
        self
    }

    /// Set the clip planes.
    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    // ========================================================================
    // STATE
    // ========================================================================

    /// Remember the current pose as the one [`OrbitRig::reset`] returns to.
    pub fn save_state(&mut self) {
        self.saved = SavedRigState {
            position: self.position,
            target: self.target,
        };
    }

    /// Restore the saved pose and drop any pending motion.
    pub fn reset(&mut self) {
        self.position = self.saved.position;
        self.target = self.saved.target;
        self.clear_motion();
    }

    /// Point the rig at a new target without moving the camera.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Distance from camera to target.
    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    fn clear_motion(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.pan_offset = Vec3::ZERO;
        self.scale = 1.0;
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    /// Queue a rotation around the vertical axis (radians).
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    /// Queue a rotation toward the top pole (radians).
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Orbit from a mouse drag measured in pixels.
    pub fn orbit_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        self.rotate_left(ORBIT_SPEED * dx / h);
        self.rotate_up(ORBIT_SPEED * dy / h);
    }

    /// Pan from a mouse drag measured in pixels.
    ///
    /// The pan distance is proportional to the target distance so the point
    /// under the cursor stays roughly under the cursor.
    pub fn pan_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        let world_per_pixel = 2.0 * self.distance() * (self.fov.to_radians() * 0.5).tan() / h;

        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);

        self.pan(-right * dx * world_per_pixel + up * dy * world_per_pixel);
    }

    /// Queue a world-space translation of both camera and target.
    pub fn pan(&mut self, offset: Vec3) {
        if offset.is_finite() {
            self.pan_offset += offset;
        }
    }

    /// Queue a zoom; factors above 1.0 move the camera away from the target.
    pub fn dolly(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.scale *= factor;
        }
    }

    // ========================================================================
    // UPDATE
    // ========================================================================

    /// Rotation applied per frame by auto-rotate.
    fn auto_rotation_angle(&self) -> f32 {
        std::f32::consts::TAU / 60.0 / 60.0 * self.auto_rotate_speed
    }

    /// Apply pending motion for one frame.
    pub fn update(&mut self) {
        let offset = self.position - self.target;
        let mut radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        if self.auto_rotate {
            self.rotate_left(self.auto_rotation_angle());
        }

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        theta += self.delta_theta * step;
        phi += self.delta_phi * step;
        phi = phi.clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);

        radius = (radius * self.scale).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.target += self.pan_offset * step;

        let sin_phi = phi.sin();
        self.position = self.target
            + Vec3::new(
                radius * sin_phi * theta.sin(),
                radius * phi.cos(),
                radius * sin_phi * theta.cos(),
            );

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;
    }

    /// Apply pending motion once without auto rotation.
    pub fn sync(&mut self) {
        let auto_rotate = std::mem::replace(&mut self.auto_rotate, false);
        self.update();
        self.auto_rotate = auto_rotate;
    }

    // ========================================================================
    // MATRIX COMPUTATION
    // ========================================================================

    /// View (look-at) matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Perspective projection matrix (wgpu depth range [0, 1]).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// Combined `projection * view`.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_rig() -> OrbitRig {
        let mut rig = OrbitRig::default();
        rig.auto_rotate = false;
        rig.enable_damping = false;
        rig
    }

    #[test]
    fn test_default_pose() {
        let rig = OrbitRig::default();
        assert_eq!(rig.position, Vec3::new(0.0, 3.0, 8.0));
        assert_eq!(rig.target, Vec3::ZERO);
        assert_eq!(rig.fov, 75.0);
        assert!(rig.auto_rotate);
    }

    #[test]
    fn test_update_without_motion_keeps_pose() {
        let mut rig = still_rig();
        rig.update();
        assert!(rig.position.abs_diff_eq(Vec3::new(0.0, 3.0, 8.0), 1e-4));
    }

    #[test]
    fn test_auto_rotate_preserves_distance() {
        let mut rig = OrbitRig::default();
        let before = rig.distance();
        for _ in 0..120 {
            rig.update();
        }
        assert!((rig.distance() - before).abs() < 1e-3);
        assert!(rig.position.x.abs() > 1e-3, "auto rotate should move the camera");
    }

    #[test]
    fn test_damped_rotation_decays() {
        let mut rig = OrbitRig::default();
        rig.auto_rotate = false;
        rig.rotate_left(1.0);
        rig.update();
        let first = rig.position;
        for _ in 0..500 {
            rig.update();
        }
        let settled = rig.position;
        rig.update();
        assert!(first.distance(settled) > 0.1);
        assert!(rig.position.distance(settled) < 1e-3);
    }

    #[test]
    fn test_polar_clamp_never_flips() {
        let mut rig = still_rig();
        rig.rotate_up(10.0);
        rig.update();
        assert!(rig.position.y > 0.0);
        assert!(rig.view_matrix().is_finite());
    }

    #[test]
    fn test_dolly_clamped() {
        let mut rig = still_rig();
        rig.dolly(1000.0);
        rig.update();
        assert!((rig.distance() - MAX_DISTANCE).abs() < 1e-3);
        rig.dolly(0.0001);
        rig.update();
        assert!((rig.distance() - MIN_DISTANCE).abs() < 1e-3);
    }

    #[test]
    fn test_reset_restores_saved_pose() {
        let mut rig = still_rig();
        rig.rotate_left(0.7);
        rig.pan_by_pixels(40.0, 10.0, 720.0);
        rig.update();
        assert_ne!(rig.target, Vec3::ZERO);

        rig.rotate_left(0.3);
        rig.reset();
        assert_eq!(rig.position, Vec3::new(0.0, 3.0, 8.0));
        assert_eq!(rig.target, Vec3::ZERO);
        rig.update();
        assert!(rig.position.abs_diff_eq(Vec3::new(0.0, 3.0, 8.0), 1e-4));
    }

    #[test]
    fn test_sync_skips_auto_rotation() {
        let mut rig = OrbitRig::default();
        rig.enable_damping = false;
        rig.sync();
        assert!(rig.position.abs_diff_eq(Vec3::new(0.0, 3.0, 8.0), 1e-4));
        assert!(rig.auto_rotate);
    }

    #[test]
    fn test_pan_moves_target_and_camera() {
        let mut rig = still_rig();
        rig.pan(Vec3::new(1.0, 0.0, 0.0));
        rig.update();
        assert!(rig.target.abs_diff_eq(Vec3::X, 1e-5));
        assert!(rig.position.abs_diff_eq(Vec3::new(1.0, 3.0, 8.0), 1e-4));
    }

    #[test]
    fn test_projection_changes_with_fov() {
        let mut rig = still_rig();
        let narrow = rig.projection_matrix();
        rig.fov = 125.0;
        let wide = rig.projection_matrix();
        // Wider fov shrinks the x/y scale terms
        assert!(wide.x_axis.x < narrow.x_axis.x);
        assert!(wide.y_axis.y < narrow.y_axis.y);
    }
}
