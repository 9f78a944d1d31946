//! Point-Cloud Generator
//!
//! Maps [`GalaxyParameters`] plus a random source to a spiral point cloud.
//! Each point gets a uniform distance from the center, sits on one of the
//! spiral arms chosen round-robin by index, twists by `spin * distance`, and
//! is scattered on every axis by a power-shaped random offset (half height on
//! Y). Colors blend from an inner to an outer hue by normalized distance.

use std::f32::consts::TAU;

use glam::Vec3;
use log::debug;
use rand::Rng;

use super::params::GalaxyParameters;
use crate::error::ExplorerResult;
use crate::render::vertex::PointVertex;

/// Saturation and lightness of the core color.
const INNER_SATURATION: f32 = 0.8;
const INNER_LIGHTNESS: f32 = 0.6;
/// Saturation and lightness of the rim color.
const OUTER_SATURATION: f32 = 0.8;
const OUTER_LIGHTNESS: f32 = 0.4;

/// Vertical scatter is flattened by this factor.
const VERTICAL_SCATTER_SCALE: f32 = 0.5;

/// The two hues one generation call blends between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GalaxyColors {
    pub inner: Vec3,
    pub outer: Vec3,
}

impl GalaxyColors {
    /// Pick a fresh random hue for the core and for the rim.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            inner: hsl_to_rgb(rng.r#gen::<f32>(), INNER_SATURATION, INNER_LIGHTNESS),
            outer: hsl_to_rgb(rng.r#gen::<f32>(), OUTER_SATURATION, OUTER_LIGHTNESS),
        }
    }

    /// Color at normalized distance `t` (0 = center, 1 = rim).
    pub fn at(&self, t: f32) -> Vec3 {
        self.inner.lerp(self.outer, t.clamp(0.0, 1.0))
    }
}

/// Arm a point index belongs to.
#[inline]
pub fn arm_index(index: u32, branches: u32) -> u32 {
    index % branches.max(1)
}

/// Angle of an arm around the Y axis.
#[inline]
pub fn branch_angle(index: u32, branches: u32) -> f32 {
    let branches = branches.max(1);
    arm_index(index, branches) as f32 / branches as f32 * TAU
}

/// Position on the ideal (unscattered) arm curve.
pub fn spiral_position(index: u32, distance: f32, params: &GalaxyParameters) -> Vec3 {
    let angle = branch_angle(index, params.branches) + distance * params.spin;
    Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// One axis of scatter: `sample^power * sign * randomness * distance`.
#[inline]
pub fn scatter_offset(sample: f32, positive: bool, params: &GalaxyParameters, distance: f32) -> f32 {
    let sign = if positive { 1.0 } else { -1.0 };
    sample.powf(params.randomness_power) * sign * params.randomness * distance
}

fn scatter_axis<R: Rng + ?Sized>(rng: &mut R, params: &GalaxyParameters, distance: f32) -> f32 {
    let sample = rng.r#gen::<f32>();
    let positive = rng.gen_bool(0.5);
    scatter_offset(sample, positive, params, distance)
}

/// Generate `params.count` colored points.
///
/// Parameters are validated first; an invalid set fails before the buffer is
/// allocated.
pub fn generate_point_cloud<R: Rng + ?Sized>(
    params: &GalaxyParameters,
    rng: &mut R,
) -> ExplorerResult<Vec<PointVertex>> {
    params.validate()?;

    let colors = GalaxyColors::random(rng);
    let mut points = Vec::with_capacity(params.count as usize);

    for i in 0..params.count {
        let distance = rng.gen_range(0.0..params.radius);

        let offset = Vec3::new(
            scatter_axis(rng, params, distance),
            scatter_axis(rng, params, distance) * VERTICAL_SCATTER_SCALE,
            scatter_axis(rng, params, distance),
        );
        let position = spiral_position(i, distance, params) + offset;
        let color = colors.at(distance / params.radius);

        points.push(PointVertex {
            position: position.into(),
            color: color.into(),
        });
    }

    debug!(
        "generated {} points ({} arms, radius {:.2}, spin {:.2})",
        points.len(),
        params.branches,
        params.radius,
        params.spin
    );
    Ok(points)
}

/// HSL to RGB, every component in [0, 1]. Hue wraps.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let h = hue.rem_euclid(1.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let q = 2.0 * l - p;

    Vec3::new(
        hue_to_channel(q, p, h + 1.0 / 3.0),
        hue_to_channel(q, p, h),
        hue_to_channel(q, p, h - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}
