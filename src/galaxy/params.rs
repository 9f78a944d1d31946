//! Galaxy Parameters
//!
//! The structural knobs of a generated galaxy and the randomized parameter
//! set used when a warp finishes.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, ExplorerResult};

/// Upper bound on points per galaxy. Generation above this is rejected
/// before any buffer is allocated.
pub const MAX_POINT_COUNT: u32 = 500_000;
/// Largest accepted galaxy radius.
pub const MAX_RADIUS: f32 = 1.0e4;
/// Largest accepted scatter magnitude. Together with [`MAX_RADIUS`] this
/// keeps every scatter offset finite.
pub const MAX_RANDOMNESS: f32 = 100.0;
/// Largest accepted twist, in radians per unit radius.
pub const MAX_SPIN: f32 = 1.0e3;

/// Ranges sampled by [`random_parameters`] (half-open).
pub mod random_ranges {
    use std::ops::Range;

    pub const COUNT: Range<u32> = 10_000..200_000;
    pub const RADIUS: Range<f32> = 4.0..10.0;
    pub const BRANCHES: Range<u32> = 3..20;
    pub const SPIN: Range<f32> = -2.0..2.0;
    pub const RANDOMNESS: Range<f32> = 0.0..2.0;
    pub const RANDOMNESS_POWER: Range<f32> = 1.0..10.0;
}

/// Structural parameters of one spiral galaxy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyParameters {
    /// Number of points in the cloud.
    pub count: u32,
    /// Maximum orbital distance of a point.
    pub radius: f32,
    /// Number of spiral arms.
    pub branches: u32,
    /// Radians of twist per unit radius.
    pub spin: f32,
    /// Scatter magnitude, relative to each point's radius.
    pub randomness: f32,
    /// Scatter falloff exponent; higher concentrates points on the arm curve.
    #[serde(alias = "randomnessPower")]
    pub randomness_power: f32,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            count: 100_000,
            radius: 5.0,
            branches: 5,
            spin: 0.5,
            randomness: 0.2,
            randomness_power: 3.0,
        }
    }
}

impl GalaxyParameters {
    /// Check every field. The first offending field is reported.
    pub fn validate(&self) -> ExplorerResult<()> {
        if self.count == 0 || self.count > MAX_POINT_COUNT {
            return Err(invalid("count", self.count as f64, "must be in 1..=500000"));
        }
        if !(self.radius > 0.0 && self.radius <= MAX_RADIUS) {
            return Err(invalid("radius", self.radius as f64, "must be in (0, 1e4]"));
        }
        if self.branches == 0 {
            return Err(invalid("branches", 0.0, "must be >= 1"));
        }
        if !(self.spin.abs() <= MAX_SPIN) {
            return Err(invalid("spin", self.spin as f64, "must be in [-1e3, 1e3]"));
        }
        if !(self.randomness >= 0.0 && self.randomness <= MAX_RANDOMNESS) {
            return Err(invalid("randomness", self.randomness as f64, "must be in [0, 100]"));
        }
        if !self.randomness_power.is_finite() || self.randomness_power < 1.0 {
            return Err(invalid(
                "randomness_power",
                self.randomness_power as f64,
                "must be finite and >= 1",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, value: f64, reason: &'static str) -> ExplorerError {
    ExplorerError::InvalidParameters {
        field,
        value,
        reason,
    }
}

/// Draw a fresh parameter set, each field uniform over its [`random_ranges`] entry.
pub fn random_parameters<R: Rng + ?Sized>(rng: &mut R) -> GalaxyParameters {
    GalaxyParameters {
        count: rng.gen_range(random_ranges::COUNT),
        radius: rng.gen_range(random_ranges::RADIUS),
        branches: rng.gen_range(random_ranges::BRANCHES),
        spin: rng.gen_range(random_ranges::SPIN),
        randomness: rng.gen_range(random_ranges::RANDOMNESS),
        randomness_power: rng.gen_range(random_ranges::RANDOMNESS_POWER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn field_of(err: ExplorerError) -> &'static str {
        match err {
            ExplorerError::InvalidParameters { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_is_valid() {
        assert!(GalaxyParameters::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_each_bad_field() {
        let base = GalaxyParameters::default();
        let cases = [
            (GalaxyParameters { count: 0, ..base }, "count"),
            (GalaxyParameters { count: MAX_POINT_COUNT + 1, ..base }, "count"),
            (GalaxyParameters { radius: 0.0, ..base }, "radius"),
            (GalaxyParameters { radius: f32::NAN, ..base }, "radius"),
            (GalaxyParameters { radius: 3.0e38, ..base }, "radius"),
            (GalaxyParameters { branches: 0, ..base }, "branches"),
            (GalaxyParameters { spin: f32::INFINITY, ..base }, "spin"),
            (GalaxyParameters { spin: -f32::MAX, ..base }, "spin"),
            (GalaxyParameters { randomness: -0.1, ..base }, "randomness"),
            (GalaxyParameters { randomness: MAX_RANDOMNESS * 2.0, ..base }, "randomness"),
            (GalaxyParameters { randomness_power: 0.5, ..base }, "randomness_power"),
        ];
        for (params, expected) in cases {
            assert_eq!(field_of(params.validate().unwrap_err()), expected);
        }
    }

    #[test]
    fn test_random_parameters_in_range_and_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let p = random_parameters(&mut rng);
            assert!(random_ranges::COUNT.contains(&p.count));
            assert!(random_ranges::RADIUS.contains(&p.radius));
            assert!(random_ranges::BRANCHES.contains(&p.branches));
            assert!(random_ranges::SPIN.contains(&p.spin));
            assert!(random_ranges::RANDOMNESS.contains(&p.randomness));
            assert!(random_ranges::RANDOMNESS_POWER.contains(&p.randomness_power));
            assert!(p.validate().is_ok());
        }
    }

    #[test]
    fn test_json_accepts_camel_case_power() {
        let p: GalaxyParameters = serde_json::from_str(
            r#"{"count":10,"radius":2.0,"branches":3,"spin":1.0,"randomness":0.1,"randomnessPower":2.0}"#,
        )
        .unwrap();
        assert_eq!(p.randomness_power, 2.0);
    }
}
