//! Generator Tests - Point-Cloud Shape and Statistics
//!
//! Checks the spiral layout and scatter distribution of generated galaxies
//! over large seeded samples.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

use cosmic_explorer_engine::galaxy::generator::branch_angle;
use cosmic_explorer_engine::galaxy::params::random_ranges;
use cosmic_explorer_engine::galaxy::{
    GalaxyParameters, MAX_RADIUS, MAX_RANDOMNESS, MAX_SPIN, generate_point_cloud,
    random_parameters,
};

fn mean_abs_height(params: &GalaxyParameters, seed: u64) -> f32 {
    let mut rng = StdRng::seed_from_u64(seed);
    let points = generate_point_cloud(params, &mut rng).unwrap();
    points.iter().map(|p| p.position[1].abs()).sum::<f32>() / points.len() as f32
}

#[test]
fn test_zero_randomness_points_lie_on_arms() {
    let params = GalaxyParameters {
        count: 3_000,
        branches: 4,
        spin: 1.3,
        randomness: 0.0,
        ..GalaxyParameters::default()
    };
    let mut rng = StdRng::seed_from_u64(11);
    let points = generate_point_cloud(&params, &mut rng).unwrap();

    for (i, p) in points.iter().enumerate() {
        let pos = Vec3::from(p.position);
        assert_eq!(pos.y, 0.0);
        let distance = pos.length();
        assert!(distance < params.radius);
        if distance < 1e-3 {
            continue;
        }
        let expected = branch_angle(i as u32, params.branches) + distance * params.spin;
        let actual = pos.z.atan2(pos.x);
        let diff = (actual - expected).rem_euclid(TAU);
        assert!(diff < 1e-3 || diff > TAU - 1e-3, "point {i} is off its arm");
    }
}

#[test]
fn test_higher_power_concentrates_points() {
    let loose = GalaxyParameters {
        count: 20_000,
        randomness: 1.0,
        randomness_power: 1.0,
        ..GalaxyParameters::default()
    };
    let tight = GalaxyParameters {
        randomness_power: 8.0,
        ..loose
    };

    let loose_height = mean_abs_height(&loose, 3);
    let tight_height = mean_abs_height(&tight, 3);
    // E[u] = 1/2 versus E[u^8] = 1/9.
    assert!(tight_height < loose_height * 0.5);
}

#[test]
fn test_scatter_grows_with_randomness() {
    let calm = GalaxyParameters {
        count: 20_000,
        randomness: 0.1,
        randomness_power: 2.0,
        ..GalaxyParameters::default()
    };
    let wild = GalaxyParameters {
        randomness: 1.5,
        ..calm
    };
    assert!(mean_abs_height(&wild, 9) > mean_abs_height(&calm, 9) * 5.0);
}

#[test]
fn test_colors_blend_outward() {
    let params = GalaxyParameters {
        count: 10_000,
        randomness: 0.0,
        ..GalaxyParameters::default()
    };
    let mut rng = StdRng::seed_from_u64(21);
    let points = generate_point_cloud(&params, &mut rng).unwrap();

    let (inner, outer) = points.iter().fold(
        (points[0], points[0]),
        |(inner, outer), p| {
            let d = Vec3::from(p.position).length();
            let inner = if d < Vec3::from(inner.position).length() { *p } else { inner };
            let outer = if d > Vec3::from(outer.position).length() { *p } else { outer };
            (inner, outer)
        },
    );

    // Color is a linear function of normalized distance.
    for p in &points {
        let d = Vec3::from(p.position).length();
        let t = d / params.radius;
        let expected = Vec3::from(inner.color).lerp(Vec3::from(outer.color), t);
        // inner/outer are near (not at) t = 0 and t = 1.
        assert!(Vec3::from(p.color).abs_diff_eq(expected, 0.02));
    }
}

#[test]
fn test_random_parameters_always_generate() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..50 {
        let mut params = random_parameters(&mut rng);
        assert!(random_ranges::COUNT.contains(&params.count));
        assert!(random_ranges::BRANCHES.contains(&params.branches));
        params.count = params.count.min(2_000);
        let points = generate_point_cloud(&params, &mut rng).unwrap();
        assert_eq!(points.len(), params.count as usize);
        assert!(points.iter().all(|p| p.position.iter().all(|c| c.is_finite())));
    }
}

#[test]
fn test_extreme_parameters_rejected_or_finite() {
    let mut rng = StdRng::seed_from_u64(13);
    let huge = GalaxyParameters {
        count: 1_000,
        radius: 3.0e38,
        branches: 3,
        spin: 0.5,
        randomness: 2.0,
        randomness_power: 1.0,
    };
    assert!(generate_point_cloud(&huge, &mut rng).is_err());

    let limit = GalaxyParameters {
        radius: MAX_RADIUS,
        spin: MAX_SPIN,
        randomness: MAX_RANDOMNESS,
        ..huge
    };
    let points = generate_point_cloud(&limit, &mut rng).unwrap();
    assert!(points.iter().all(|p| p.position.iter().all(|c| c.is_finite())));
}
