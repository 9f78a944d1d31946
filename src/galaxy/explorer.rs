//! Galaxy Explorer
//!
//! The command surface callers drive: regenerate, camera presets, warp and
//! click hit tests, plus the per-frame tick. All scene state lives in an
//! explicit [`SceneContext`] owned by the explorer, and every visual is
//! installed through the content manager so regenerations never leak
//! renderer resources.
//!
//! Concurrent requests resolve last-write-wins: a manual regenerate during a
//! warp installs immediately, and the warp's own regeneration replaces it when
//! the warp finishes.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Quat, Vec3};
use log::{debug, info};
use rand::Rng;

use super::animation::{FrameClock, FrameReport, TimeSource, WarpEffect, WarpState};
use super::belts::{AsteroidBelt, generate_asteroid_belt};
use super::camera_preset::CameraPreset;
use super::config::ExplorerConfig;
use super::generator::generate_point_cloud;
use super::geometry::{generate_ring, generate_ship, generate_sphere};
use super::params::{GalaxyParameters, random_parameters};
use crate::camera::orbit_rig::OrbitRig;
use crate::camera::raycast::ray_from_camera;
use crate::error::ExplorerResult;
use crate::render::backend::{FrameView, GeometryData, MaterialDesc, MaterialId, SceneRenderer};
use crate::render::uniforms::rgb_from_hex;
use crate::render::vertex::PointVertex;
use crate::scene::content::{ContentBundle, ContentSlot, SceneContentManager};
use crate::scene::graph::{NodeId, PickShape, Renderable, SceneGraph, Transform};

/// Identifier reported when the central sphere or its disk is clicked.
pub const BLACK_HOLE_TAG: &str = "black-hole";
/// Identifier reported when the ship is clicked.
pub const SHIP_TAG: &str = "ship";

const SHIP_COLOR: u32 = 0xb0c4de;
const SHIP_ROUGHNESS: f32 = 0.4;
const SHIP_METALNESS: f32 = 0.7;
/// Pick radius of the ship hull before scaling.
const SHIP_PICK_RADIUS: f32 = 1.0;

/// Callback invoked with the identifier of a clicked object.
pub type ObjectClickHandler = Box<dyn FnMut(&str)>;

/// Renderer, scene graph, camera rig and content lifecycle for one explorer.
pub struct SceneContext<R: SceneRenderer> {
    pub renderer: R,
    pub graph: SceneGraph,
    pub rig: OrbitRig,
    pub content: SceneContentManager,
}

impl<R: SceneRenderer> SceneContext<R> {
    fn install(&mut self, slot: ContentSlot, bundle: ContentBundle) {
        self.content
            .install(slot, bundle, &mut self.graph, &mut self.renderer);
    }
}

/// Per-belt animation state.
#[derive(Clone, Copy, Debug)]
struct BeltMotion {
    speed: f32,
    angle: f32,
}

pub struct GalaxyExplorer<R: SceneRenderer, G: Rng> {
    ctx: SceneContext<R>,
    rng: G,
    time: Box<dyn TimeSource>,
    clock: FrameClock,
    config: ExplorerConfig,
    params: GalaxyParameters,
    warp: WarpState,
    belts: Vec<BeltMotion>,
    disk_material: Option<MaterialId>,
    on_object_click: Option<ObjectClickHandler>,
}

impl<R: SceneRenderer, G: Rng> GalaxyExplorer<R, G> {
    /// Build the scene: central sphere and disk, ship, initial galaxy and belts.
    pub fn new(
        renderer: R,
        config: ExplorerConfig,
        rng: G,
        time: impl TimeSource + 'static,
    ) -> ExplorerResult<Self> {
        config.validate()?;

        let (width, height) = renderer.surface_size();
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let cam = &config.camera;
        let mut rig = OrbitRig::new(cam.start_position, aspect)
            .with_fov(cam.fov)
            .with_clip(cam.near, cam.far);
        rig.auto_rotate_speed = cam.auto_rotate_speed;
        rig.damping_factor = cam.damping_factor;
        rig.save_state();

        let clock = FrameClock::new(time.now_ms());
        let params = config.initial_params;

        let mut explorer = Self {
            ctx: SceneContext {
                renderer,
                graph: SceneGraph::new(),
                rig,
                content: SceneContentManager::new(),
            },
            rng,
            time: Box::new(time),
            clock,
            config,
            params,
            warp: WarpState::Idle,
            belts: Vec::new(),
            disk_material: None,
            on_object_click: None,
        };

        explorer.install_black_hole();
        explorer.install_ship();
        explorer.regenerate(params)?;
        info!("galaxy explorer ready ({width}x{height})");
        Ok(explorer)
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    /// Generate a galaxy from `params` and replace the current galaxy and
    /// belts with it. Returns the number of points installed.
    ///
    /// Invalid parameters fail before anything is generated or replaced.
    pub fn regenerate(&mut self, params: GalaxyParameters) -> ExplorerResult<u32> {
        let points = generate_point_cloud(&params, &mut self.rng)?;
        let belts: Vec<AsteroidBelt> = self
            .config
            .belts
            .iter()
            .map(|b| {
                generate_asteroid_belt(
                    params.radius * b.radius_factor,
                    b.count,
                    b.speed,
                    &mut self.rng,
                )
            })
            .collect();

        let count = points.len() as u32;
        self.install_galaxy(points);

        let stale: Vec<ContentSlot> = self
            .ctx
            .content
            .slots()
            .filter(|s| matches!(s, ContentSlot::Belt(i) if *i >= belts.len()))
            .collect();
        for slot in stale {
            self.ctx
                .content
                .clear(slot, &mut self.ctx.graph, &mut self.ctx.renderer);
        }
        self.belts.clear();
        for (index, belt) in belts.iter().enumerate() {
            self.install_belt(index, belt);
            self.belts.push(BeltMotion {
                speed: belt.speed,
                angle: 0.0,
            });
        }

        self.params = params;
        info!(
            "regenerated galaxy: {} points, radius {:.2}, {} arms, spin {:.2}, randomness {:.2}^{:.2}",
            count,
            params.radius,
            params.branches,
            params.spin,
            params.randomness,
            params.randomness_power
        );
        Ok(count)
    }

    /// Regenerate from freshly randomized parameters.
    pub fn regenerate_random(&mut self) -> ExplorerResult<u32> {
        let params = random_parameters(&mut self.rng);
        self.regenerate(params)
    }

    /// Drop any camera interaction and snap to a preset pose.
    pub fn set_camera_position(&mut self, preset: CameraPreset) {
        let rig = &mut self.ctx.rig;
        rig.reset();
        rig.position = preset.position();
        rig.look_at(preset.target());
        rig.sync();
        debug!("camera preset {preset:?} at {:?}", rig.position);
    }

    /// Start the warp transition. Returns `false` if a warp is already running.
    pub fn trigger_warp(&mut self) -> bool {
        if self.warp.is_warping() {
            return false;
        }
        let start_ms = self.time.now_ms();
        self.warp = WarpState::Warping { start_ms };
        self.ctx.rig.auto_rotate = false;
        info!("warp started");
        true
    }

    /// Identifier of the nearest tagged object under a screen point given in
    /// normalized device coordinates (x right, y up, both in [-1, 1]).
    pub fn hit_test(&self, ndc_x: f32, ndc_y: f32) -> Option<String> {
        let rig = &self.ctx.rig;
        let ray = ray_from_camera(
            rig.position,
            rig.target,
            (ndc_x, ndc_y),
            rig.aspect,
            rig.fov.to_radians(),
        );
        let graph = &self.ctx.graph;
        graph
            .intersect_ray(&ray)
            .iter()
            .find_map(|hit| graph.tagged_ancestor(hit.node))
            .map(str::to_owned)
    }

    /// Hit test and notify the click handler on a match.
    pub fn click(&mut self, ndc_x: f32, ndc_y: f32) -> Option<String> {
        let hit = self.hit_test(ndc_x, ndc_y)?;
        info!("clicked {hit}");
        if let Some(handler) = self.on_object_click.as_mut() {
            handler(&hit);
        }
        Some(hit)
    }

    pub fn set_object_click_handler(&mut self, handler: impl FnMut(&str) + 'static) {
        self.on_object_click = Some(Box::new(handler));
    }

    // ========================================================================
    // FRAME
    // ========================================================================

    /// Advance every animation by one frame. Runs to completion before the
    /// frame is drawn.
    pub fn tick(&mut self) -> ExplorerResult<FrameReport> {
        let now = self.time.now_ms();
        let elapsed = self.clock.elapsed_seconds(now);
        let mut report = FrameReport {
            elapsed,
            ..Default::default()
        };

        if let Some(material) = self.disk_material {
            self.ctx.renderer.set_disk_time(material, elapsed);
        }
        self.animate_belts();
        self.animate_ship(elapsed);

        if let Some(progress) = self.warp.progress(now, self.config.warp.duration_ms) {
            report.warp_progress = Some(progress);
            let base_fov = self.ctx.rig.base_fov;
            let effect = WarpEffect::at(progress, base_fov, &self.config.warp);
            self.apply_warp_effect(effect);

            if progress >= 1.0 {
                self.warp = WarpState::Idle;
                self.ctx.rig.auto_rotate = true;
                report.warp_finished = true;
                info!("warp finished");
                report.regenerated = Some(self.regenerate_random()?);
            }
        }

        self.ctx.rig.update();
        Ok(report)
    }

    /// Submit the current scene to the renderer.
    pub fn render(&mut self) -> ExplorerResult<()> {
        let draws = self.ctx.graph.draw_list();
        let rig = &self.ctx.rig;
        let frame = FrameView {
            view: rig.view_matrix(),
            projection: rig.projection_matrix(),
            camera_position: rig.position,
            draws: &draws,
        };
        self.ctx.renderer.render(&frame)
    }

    /// Tick then draw.
    pub fn frame(&mut self) -> ExplorerResult<FrameReport> {
        let report = self.tick()?;
        self.render()?;
        Ok(report)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.ctx.renderer.resize(width, height);
        self.ctx.rig.aspect = width as f32 / height as f32;
    }

    /// Release every installed visual and hand the renderer back.
    pub fn teardown(mut self) -> R {
        let ctx = &mut self.ctx;
        ctx.content.teardown(&mut ctx.graph, &mut ctx.renderer);
        self.disk_material = None;
        info!("galaxy explorer torn down");
        self.ctx.renderer
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn current_params(&self) -> GalaxyParameters {
        self.params
    }

    pub fn warp_state(&self) -> WarpState {
        self.warp
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn rig(&self) -> &OrbitRig {
        &self.ctx.rig
    }

    /// Mutable rig access for pointer-driven orbit, pan and zoom.
    pub fn rig_mut(&mut self) -> &mut OrbitRig {
        &mut self.ctx.rig
    }

    pub fn renderer(&self) -> &R {
        &self.ctx.renderer
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.ctx.graph
    }

    pub fn content(&self) -> &SceneContentManager {
        &self.ctx.content
    }

    /// Current depth (Z) scale of the galaxy group.
    pub fn galaxy_depth_scale(&self) -> Option<f32> {
        let root = self.ctx.content.root(ContentSlot::Galaxy)?;
        self.ctx.graph.node(root).map(|n| n.transform.scale.z)
    }

    // ========================================================================
    // CONTENT
    // ========================================================================

    fn install_galaxy(&mut self, points: Vec<PointVertex>) {
        let ctx = &mut self.ctx;
        let geometry = ctx.renderer.create_geometry(&GeometryData::Points(points));
        let material = ctx.renderer.create_material(&MaterialDesc::PointSprites {
            size: self.config.points.size,
        });

        let root = ctx.graph.create_node("galaxy");
        let cloud = ctx.graph.create_child(root, "galaxy-points");
        set_renderable(&mut ctx.graph, cloud, Renderable { geometry, material });

        ctx.install(
            ContentSlot::Galaxy,
            ContentBundle {
                root,
                geometries: vec![geometry],
                materials: vec![material],
            },
        );
    }

    fn install_belt(&mut self, index: usize, belt: &AsteroidBelt) {
        let ctx = &mut self.ctx;
        let material = ctx.renderer.create_material(&AsteroidBelt::material());
        let root = ctx.graph.create_node(&format!("asteroid-belt-{index}"));
        let mut bundle = ContentBundle::new(root);
        bundle.materials.push(material);

        for (k, data) in belt.geometry().iter().enumerate() {
            let geometry = ctx.renderer.create_geometry(data);
            let node = ctx.graph.create_child(root, &format!("asteroids-{k}"));
            set_renderable(&mut ctx.graph, node, Renderable { geometry, material });
            bundle.geometries.push(geometry);
        }

        ctx.install(ContentSlot::Belt(index), bundle);
    }

    fn install_black_hole(&mut self) {
        let disk = self.config.disk;
        let ctx = &mut self.ctx;

        let sphere_geometry = ctx.renderer.create_geometry(&GeometryData::Mesh(
            generate_sphere(disk.sphere_radius, disk.sphere_segments),
        ));
        let sphere_material = ctx
            .renderer
            .create_material(&MaterialDesc::Basic { color: [0.0; 3] });
        let ring_geometry = ctx.renderer.create_geometry(&GeometryData::Mesh(generate_ring(
            disk.inner_radius,
            disk.outer_radius,
            disk.ring_segments,
        )));
        let ring_material = ctx.renderer.create_material(&MaterialDesc::AccretionDisk {
            inner_color: rgb_from_hex(disk.inner_color),
            outer_color: rgb_from_hex(disk.outer_color),
        });

        let root = ctx.graph.create_node("black-hole-group");
        let sphere = ctx.graph.create_child(root, "black-hole");
        let ring = ctx.graph.create_child(root, "accretion-disk");
        if let Some(node) = ctx.graph.node_mut(root) {
            node.tag = Some(BLACK_HOLE_TAG.to_string());
        }
        if let Some(node) = ctx.graph.node_mut(sphere) {
            node.renderable = Some(Renderable {
                geometry: sphere_geometry,
                material: sphere_material,
            });
            node.pick = Some(PickShape::Sphere {
                radius: disk.sphere_radius,
            });
        }
        if let Some(node) = ctx.graph.node_mut(ring) {
            // Ring is built in XY; lay it into the galactic (XZ) plane.
            node.transform = Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2));
            node.renderable = Some(Renderable {
                geometry: ring_geometry,
                material: ring_material,
            });
            node.pick = Some(PickShape::Annulus {
                inner: disk.inner_radius,
                outer: disk.outer_radius,
            });
        }

        ctx.install(
            ContentSlot::Disk,
            ContentBundle {
                root,
                geometries: vec![sphere_geometry, ring_geometry],
                materials: vec![sphere_material, ring_material],
            },
        );
        self.disk_material = Some(ring_material);
    }

    fn install_ship(&mut self) {
        let ship = self.config.ship;
        let ctx = &mut self.ctx;

        let geometry = ctx
            .renderer
            .create_geometry(&GeometryData::Mesh(generate_ship()));
        let material = ctx.renderer.create_material(&MaterialDesc::Standard {
            color: rgb_from_hex(SHIP_COLOR),
            roughness: SHIP_ROUGHNESS,
            metalness: SHIP_METALNESS,
        });

        let root = ctx.graph.create_node("ship");
        let hull = ctx.graph.create_child(root, "ship-hull");
        if let Some(node) = ctx.graph.node_mut(root) {
            node.tag = Some(SHIP_TAG.to_string());
            node.transform = ship_transform(&ship, 0.0);
        }
        if let Some(node) = ctx.graph.node_mut(hull) {
            node.renderable = Some(Renderable { geometry, material });
            node.pick = Some(PickShape::Sphere {
                radius: SHIP_PICK_RADIUS,
            });
        }

        ctx.install(
            ContentSlot::Ship,
            ContentBundle {
                root,
                geometries: vec![geometry],
                materials: vec![material],
            },
        );
    }

    // ========================================================================
    // ANIMATION
    // ========================================================================

    fn animate_belts(&mut self) {
        for (index, motion) in self.belts.iter_mut().enumerate() {
            motion.angle = advance_angle(motion.angle, motion.speed);
            let Some(root) = self.ctx.content.root(ContentSlot::Belt(index)) else {
                continue;
            };
            if let Some(node) = self.ctx.graph.node_mut(root) {
                node.transform.rotation = Quat::from_rotation_y(motion.angle);
            }
        }
    }

    fn animate_ship(&mut self, elapsed: f32) {
        let Some(root) = self.ctx.content.root(ContentSlot::Ship) else {
            return;
        };
        let transform = ship_transform(&self.config.ship, elapsed);
        if let Some(node) = self.ctx.graph.node_mut(root) {
            node.transform = transform;
        }
    }

    fn apply_warp_effect(&mut self, effect: WarpEffect) {
        let galaxy = self.ctx.content.root(ContentSlot::Galaxy);
        if let Some(node) = galaxy.and_then(|root| self.ctx.graph.node_mut(root)) {
            node.transform.scale.z = effect.depth_scale;
        }
        self.ctx.rig.fov = effect.fov;
    }
}

fn set_renderable(graph: &mut SceneGraph, node: NodeId, renderable: Renderable) {
    if let Some(n) = graph.node_mut(node) {
        n.renderable = Some(renderable);
    }
}

/// Step a belt rotation, wrapped to [0, TAU) so the step never falls below
/// the angle's precision.
fn advance_angle(angle: f32, step: f32) -> f32 {
    (angle + step).rem_euclid(TAU)
}

/// Ship pose at `elapsed` seconds: slow orbit plus vertical bobbing, nose
/// along the direction of travel.
fn ship_transform(ship: &super::config::ShipConfig, elapsed: f32) -> Transform {
    let angle = ship.drift_speed * elapsed;
    let bob = (elapsed * ship.bob_frequency).sin() * ship.bob_amplitude;
    let translation = Vec3::new(
        angle.cos() * ship.orbit_radius,
        ship.height + bob,
        angle.sin() * ship.orbit_radius,
    );
    // Tangent of the orbit is (-sin, 0, cos); yaw the +Z nose onto it.
    let heading = Vec3::new(-angle.sin(), 0.0, angle.cos());
    let yaw = heading.x.atan2(heading.z);
    Transform {
        translation,
        rotation: Quat::from_rotation_y(yaw),
        scale: Vec3::splat(ship.scale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::config::ShipConfig;

    #[test]
    fn test_ship_transform_orbits_and_bobs() {
        let ship = ShipConfig::default();
        let t0 = ship_transform(&ship, 0.0);
        assert!(t0.translation.abs_diff_eq(Vec3::new(6.5, 1.2, 0.0), 1e-5));
        assert_eq!(t0.scale, Vec3::splat(0.25));

        for i in 0..50 {
            let t = ship_transform(&ship, i as f32 * 0.37);
            let planar = Vec3::new(t.translation.x, 0.0, t.translation.z).length();
            assert!((planar - 6.5).abs() < 1e-4);
            assert!((t.translation.y - 1.2).abs() <= 0.08 + 1e-6);
        }
    }

    #[test]
    fn test_belt_angle_wraps_and_keeps_turning() {
        let step = 0.0005;
        let wrapped = advance_angle(TAU - step * 0.5, step);
        assert!((wrapped - step * 0.5).abs() < 1e-5);

        let mut angle = 0.0_f32;
        for _ in 0..40_000 {
            let next = advance_angle(angle, step);
            assert!((0.0..TAU).contains(&next));
            assert_ne!(next, angle);
            angle = next;
        }
    }

    #[test]
    fn test_ship_nose_follows_orbit() {
        let ship = ShipConfig::default();
        let t = ship_transform(&ship, 10.0);
        let nose = t.rotation * Vec3::Z;
        let angle = ship.drift_speed * 10.0;
        let tangent = Vec3::new(-angle.sin(), 0.0, angle.cos());
        assert!(nose.abs_diff_eq(tangent, 1e-5));
    }
}
