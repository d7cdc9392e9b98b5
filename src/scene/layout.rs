//! Anchor layouts
//!
//! Pure functions from `(count, seed)` to an ordered list of positions. The
//! same seed always yields the same layout; a reshuffle is just a call with
//! a new seed.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::LayoutConfig;

/// Golden angle in radians, spreads spiral points evenly around the axis
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Derive the seed for layout generation `generation` from a base seed
pub fn derive_seed(base: u64, generation: u64) -> u64 {
    // splitmix64 finalizer
    let mut z = base.wrapping_add(generation.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Conical spiral around the vertical axis, widest at the bottom.
///
/// `radial_offset` pushes points off the cone surface (photos sit slightly
/// outside the primitives).
pub fn formation_layout(count: usize, seed: u64, config: &LayoutConfig, radial_offset: f32) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let height = config.formation_height;
    let phase = rng.random_range(0.0..TAU);

    (0..count)
        .map(|i| {
            let t = (i as f32 + 0.5) / count as f32;
            let y = -0.5 * height + t * height;
            let jitter = rng.random_range(-0.25..0.25);
            let radius = (config.formation_radius * (1.0 - t) + radial_offset + jitter).max(0.0);
            let angle = phase + i as f32 * GOLDEN_ANGLE + rng.random_range(-0.1..0.1);
            Vec3::new(radius * angle.sin(), y, radius * angle.cos())
        })
        .collect()
}

/// Points spread uniformly through a spherical shell around the origin
pub fn scatter_layout(count: usize, seed: u64, config: &LayoutConfig) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let inner = config.scatter_inner_radius.min(config.scatter_outer_radius);
    let outer = config.scatter_outer_radius.max(inner);
    let (inner3, outer3) = (inner.powi(3), outer.powi(3));

    (0..count)
        .map(|_| {
            let dir = random_direction(&mut rng);
            let radius = if outer3 > inner3 {
                rng.random_range(inner3..outer3).cbrt()
            } else {
                outer
            };
            dir * radius
        })
        .collect()
}

/// Points on a large sphere that new objects fly in from
pub fn initial_layout(count: usize, seed: u64, config: &LayoutConfig) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| random_direction(&mut rng) * config.initial_radius)
        .collect()
}

/// Angle of a point around the vertical axis, zero along +Z
pub fn azimuth(point: Vec3) -> f32 {
    point.x.atan2(point.z)
}

fn random_direction(rng: &mut StdRng) -> Vec3 {
    let z: f32 = rng.random_range(-1.0..=1.0);
    let phi: f32 = rng.random_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_layout() {
        let config = LayoutConfig::default();
        assert_eq!(scatter_layout(20, 7, &config), scatter_layout(20, 7, &config));
        assert_eq!(formation_layout(20, 7, &config, 0.0), formation_layout(20, 7, &config, 0.0));
        assert_ne!(scatter_layout(20, 7, &config), scatter_layout(20, 8, &config));
    }

    #[test]
    fn test_scatter_stays_in_shell() {
        let config = LayoutConfig::default();
        for p in scatter_layout(500, 3, &config) {
            let r = p.length();
            assert!(r >= config.scatter_inner_radius - 1e-3 && r <= config.scatter_outer_radius + 1e-3, "{r}");
        }
    }

    #[test]
    fn test_formation_is_a_cone() {
        let config = LayoutConfig::default();
        let points = formation_layout(100, 1, &config, 0.0);
        assert_eq!(points.len(), 100);

        let half = config.formation_height / 2.0;
        assert!(points.iter().all(|p| p.y >= -half && p.y <= half));

        // Bottom ring wider than top ring
        let radial = |p: &Vec3| (p.x * p.x + p.z * p.z).sqrt();
        assert!(radial(&points[0]) > radial(&points[99]));
    }

    #[test]
    fn test_initial_on_sphere() {
        let config = LayoutConfig::default();
        for p in initial_layout(50, 9, &config) {
            assert!((p.length() - config.initial_radius).abs() < 1e-2);
        }
    }

    #[test]
    fn test_azimuth() {
        assert!(azimuth(Vec3::new(0.0, 3.0, 1.0)).abs() < 1e-6);
        assert!((azimuth(Vec3::new(1.0, 0.0, 0.0)) - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_derive_seed_varies() {
        assert_ne!(derive_seed(1, 0), derive_seed(1, 1));
        assert_eq!(derive_seed(5, 3), derive_seed(5, 3));
    }

    #[test]
    fn test_empty_layouts() {
        let config = LayoutConfig::default();
        assert!(formation_layout(0, 1, &config, 0.0).is_empty());
        assert!(scatter_layout(0, 1, &config).is_empty());
    }
}
