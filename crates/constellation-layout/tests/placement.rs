//! End-to-end placement properties.
//!
//! These tests drive the public pipeline the same way the scene composer
//! does and check the geometric guarantees the renderer relies on.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use constellation_layout::{
    CONTACT_TOLERANCE, GoldenRatioJitter, LayoutConfig, NoJitter, RngJitter, jittered_position,
    place, position_map,
};
use constellation_types::{Dimensions, Pillar, PillarId, Satellite, SatelliteId};

fn five_pillars() -> Vec<Pillar> {
    (0..5)
        .map(|i| Pillar::new(format!("pillar_{i}"), format!("Pillar {i}"), 0.0))
        .collect()
}

fn many_satellites(count: usize) -> Vec<Satellite> {
    (0..count)
        .map(|i| {
            let a = format!("pillar_{}", i % 5);
            let b = format!("pillar_{}", (i * 3 + 1) % 5);
            Satellite::new(format!("quest-{i}"), format!("Quest {i}"), 100.0)
                .with_xp(a, 70.0)
                .with_xp(b, 30.0)
        })
        .collect()
}

#[test]
fn single_pillar_satellite_orbits_its_pillar() {
    let pillars = five_pillars();
    let config = LayoutConfig::default();
    let dims = Dimensions::new(800.0, 600.0);
    let placement = place(&pillars, &[], dims, &config, &mut NoJitter);
    let positions = position_map(&placement.pillars);
    let pillar_2 = positions[&PillarId::new("pillar_2")];

    let satellite = Satellite::new("quest-solo", "Solo", 100.0).with_xp("pillar_2", 100.0);
    let (centroid, jittered) = jittered_position(&satellite, &positions, dims.center(), &config);

    assert!(centroid.point.distance(pillar_2) < 1e-9);
    let orbit = jittered.distance(pillar_2);
    assert!((30.0..70.0).contains(&orbit), "orbit distance {orbit}");
}

#[test]
fn unknown_pillar_satellite_starts_at_center() {
    let pillars = five_pillars();
    let dims = Dimensions::new(800.0, 600.0);
    let sats = vec![Satellite::new("lost", "Lost", 10.0).with_xp("nowhere", 10.0)];
    let placement = place(&pillars, &sats, dims, &LayoutConfig::default(), &mut NoJitter);
    let sat = placement.satellite(&SatelliteId::new("lost")).unwrap();
    assert!(sat.centroid.distance(dims.center()) < 1e-9);
}

#[test]
fn every_pair_respects_its_exclusion_zone_or_is_flagged() {
    let pillars = five_pillars();
    let sats = many_satellites(60);
    let config = LayoutConfig::default();
    let mut jitter = RngJitter::seeded(2024);
    let placement = place(&pillars, &sats, Dimensions::new(1200.0, 900.0), &config, &mut jitter);

    assert_eq!(placement.satellites.len(), 60);
    for (i, sat) in placement.satellites.iter().enumerate() {
        if sat.exhausted {
            continue;
        }
        for pillar in &placement.pillars {
            let d = sat.position.distance(pillar.position);
            assert!(
                d >= config.min_distance_from_pillar - CONTACT_TOLERANCE,
                "{} is {d}px from {}",
                sat.id,
                pillar.id
            );
        }
        for earlier in &placement.satellites[..i] {
            let d = sat.position.distance(earlier.position);
            assert!(
                d >= config.min_distance_between_satellites - CONTACT_TOLERANCE,
                "{} is {d}px from {}",
                sat.id,
                earlier.id
            );
        }
    }
}

#[test]
fn deterministic_jitter_reproduces_the_whole_layout() {
    let pillars = five_pillars();
    let sats = many_satellites(40);
    let config = LayoutConfig::default();
    let dims = Dimensions::new(1024.0, 768.0);

    let a = place(&pillars, &sats, dims, &config, &mut GoldenRatioJitter::default());
    let b = place(&pillars, &sats, dims, &config, &mut GoldenRatioJitter::default());
    assert_eq!(a, b);

    let c = place(&pillars, &sats, dims, &config, &mut RngJitter::seeded(9));
    let d = place(&pillars, &sats, dims, &config, &mut RngJitter::seeded(9));
    assert_eq!(c, d);
}

#[test]
fn pre_collision_positions_ignore_the_jitter_source() {
    let pillars = five_pillars();
    let sats = many_satellites(20);
    let config = LayoutConfig::default();
    let dims = Dimensions::new(1024.0, 768.0);

    let a = place(&pillars, &sats, dims, &config, &mut RngJitter::seeded(1));
    let b = place(&pillars, &sats, dims, &config, &mut RngJitter::seeded(2));
    assert_eq!(a.pillars, b.pillars);
    for (x, y) in a.satellites.iter().zip(&b.satellites) {
        assert_eq!(x.centroid, y.centroid);
    }
}

#[test]
fn resize_moves_pillars_with_the_viewport() {
    let pillars = five_pillars();
    let config = LayoutConfig::default();
    let small = place(&pillars, &[], Dimensions::new(800.0, 600.0), &config, &mut NoJitter);
    let large = place(&pillars, &[], Dimensions::new(1600.0, 1200.0), &config, &mut NoJitter);
    let top_small = small.pillars[0].position;
    let top_large = large.pillars[0].position;
    assert!((top_small.y - 120.0).abs() < 1e-9);
    // 1200 * 0.3 = 360, center y = 600.
    assert!((top_large.y - 240.0).abs() < 1e-9);
}
