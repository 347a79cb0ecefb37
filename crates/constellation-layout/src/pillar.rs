//! Fixed-radius radial placement of pillar nodes.
//!
//! Pillars sit on a ring around the viewport center. Index 0 is at the top
//! and the rest follow clockwise at equal angular spacing:
//!
//! ```text
//! radius  = clamp(min(width, height) * radius_factor, min_radius, max_radius)
//! angle_i = i * (2pi / N) - pi / 2
//! pos_i   = center + radius * (cos(angle_i), sin(angle_i))
//! ```
//!
//! Placement is a pure function of the pillar count and the viewport size.

use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use constellation_types::{Dimensions, Pillar, PillarId, PlacedPillar, Point};

use crate::config::LayoutConfig;

/// Pillar center lookup used by satellite placement.
pub type PillarPositions = BTreeMap<PillarId, Point>;

/// Radius of the pillar ring for the given viewport.
pub fn orbit_radius(dimensions: Dimensions, config: &LayoutConfig) -> f64 {
    (dimensions.min_side() * config.radius_factor).clamp(config.min_radius, config.max_radius)
}

/// Angle in radians of pillar `index` out of `count`.
///
/// Returns `-pi/2` (straight up) when `count` is zero.
pub fn pillar_angle(index: u32, count: u32) -> f64 {
    if count == 0 {
        return -FRAC_PI_2;
    }
    f64::from(index).mul_add(TAU / f64::from(count), -FRAC_PI_2)
}

/// Compute the position of every pillar, in input order.
///
/// An empty pillar list yields an empty result.
pub fn compute_pillar_positions(
    pillars: &[Pillar],
    dimensions: Dimensions,
    config: &LayoutConfig,
) -> Vec<PlacedPillar> {
    let count = u32::try_from(pillars.len()).unwrap_or(u32::MAX);
    let center = dimensions.center();
    let radius = orbit_radius(dimensions, config);

    pillars
        .iter()
        .zip(0_u32..)
        .map(|(pillar, index)| PlacedPillar {
            id: pillar.id.clone(),
            name: pillar.name.clone(),
            xp: pillar.xp,
            index,
            position: center + Point::from_polar(radius, pillar_angle(index, count)),
            radius: config.pillar_size.radius_for(pillar.xp),
        })
        .collect()
}

/// Index placed pillars by id.
pub fn position_map(pillars: &[PlacedPillar]) -> PillarPositions {
    pillars
        .iter()
        .map(|p| (p.id.clone(), p.position))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn pillars(n: usize) -> Vec<Pillar> {
        (0..n)
            .map(|i| Pillar::new(format!("pillar_{i}"), format!("Pillar {i}"), 0.0))
            .collect()
    }

    #[test]
    fn first_pillar_is_at_the_top() {
        let placed = compute_pillar_positions(
            &pillars(5),
            Dimensions::new(800.0, 600.0),
            &LayoutConfig::default(),
        );
        let first = placed[0].position;
        assert!((first.x - 400.0).abs() < EPS);
        assert!((first.y - 120.0).abs() < EPS);
    }

    #[test]
    fn pillars_proceed_clockwise() {
        let placed = compute_pillar_positions(
            &pillars(4),
            Dimensions::new(800.0, 600.0),
            &LayoutConfig::default(),
        );
        // Four pillars: top, right, bottom, left.
        assert!((placed[1].position.x - 580.0).abs() < EPS);
        assert!((placed[1].position.y - 300.0).abs() < EPS);
        assert!((placed[2].position.y - 480.0).abs() < EPS);
        assert!((placed[3].position.x - 220.0).abs() < EPS);
    }

    #[test]
    fn radius_is_clamped() {
        let config = LayoutConfig::default();
        assert!((orbit_radius(Dimensions::new(800.0, 600.0), &config) - 180.0).abs() < EPS);
        assert!((orbit_radius(Dimensions::new(200.0, 200.0), &config) - 150.0).abs() < EPS);
        assert!((orbit_radius(Dimensions::new(4000.0, 3000.0), &config) - 400.0).abs() < EPS);
    }

    #[test]
    fn all_pillars_sit_on_the_ring() {
        let dims = Dimensions::new(1024.0, 768.0);
        let config = LayoutConfig::default();
        let radius = orbit_radius(dims, &config);
        for p in compute_pillar_positions(&pillars(7), dims, &config) {
            assert!((p.position.distance(dims.center()) - radius).abs() < 1e-6);
        }
    }

    #[test]
    fn placement_is_pure() {
        let dims = Dimensions::new(640.0, 480.0);
        let config = LayoutConfig::default();
        let a = compute_pillar_positions(&pillars(6), dims, &config);
        let b = compute_pillar_positions(&pillars(6), dims, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_list_yields_empty_layout() {
        let placed =
            compute_pillar_positions(&[], Dimensions::new(800.0, 600.0), &LayoutConfig::default());
        assert!(placed.is_empty());
    }

    #[test]
    fn position_map_is_keyed_by_id() {
        let placed = compute_pillar_positions(
            &pillars(3),
            Dimensions::new(800.0, 600.0),
            &LayoutConfig::default(),
        );
        let map = position_map(&placed);
        assert_eq!(map.len(), 3);
        assert!(map.contains_key(&PillarId::new("pillar_2")));
    }
}
