//! One forward placement pass.
//!
//! Pillars are placed first, then satellites one at a time in input order.
//! Each satellite is resolved against the pillars and against the final
//! positions of every satellite before it, so placement is order-dependent:
//! this is a single forward sweep, not a global relaxation.

use constellation_types::{
    Connector, Dimensions, Pillar, PillarId, PlacedPillar, PlacedSatellite, Point, Satellite,
    SatelliteId,
};
use tracing::debug;

use crate::collision::CollisionResolver;
use crate::config::LayoutConfig;
use crate::jitter::PushJitter;
use crate::pillar::{compute_pillar_positions, position_map};
use crate::satellite::jittered_position;

/// Positions produced by one placement pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    /// Pillars in input order.
    pub pillars: Vec<PlacedPillar>,
    /// Satellites in placement order.
    pub satellites: Vec<PlacedSatellite>,
    /// Satellite-to-pillar links, grouped by satellite in placement order.
    pub connectors: Vec<Connector>,
}

impl Placement {
    /// Look up a placed pillar by id.
    pub fn pillar(&self, id: &PillarId) -> Option<&PlacedPillar> {
        self.pillars.iter().find(|p| &p.id == id)
    }

    /// Look up a placed satellite by id.
    pub fn satellite(&self, id: &SatelliteId) -> Option<&PlacedSatellite> {
        self.satellites.iter().find(|s| &s.id == id)
    }

    /// Number of satellites whose collision resolution gave up.
    pub fn exhausted_count(&self) -> usize {
        self.satellites.iter().filter(|s| s.exhausted).count()
    }

    /// Whether nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.pillars.is_empty() && self.satellites.is_empty()
    }
}

/// Place `pillars` and then `satellites` (in iteration order) inside a
/// viewport of the given size.
///
/// Satellites whose distribution names no known pillar start at the canvas
/// center. The only nondeterminism is whatever `jitter` returns.
pub fn place<'s, I, J>(
    pillars: &[Pillar],
    satellites: I,
    dimensions: Dimensions,
    config: &LayoutConfig,
    jitter: &mut J,
) -> Placement
where
    I: IntoIterator<Item = &'s Satellite>,
    J: PushJitter + ?Sized,
{
    let placed_pillars = compute_pillar_positions(pillars, dimensions, config);
    let positions = position_map(&placed_pillars);
    let pillar_points: Vec<Point> = placed_pillars.iter().map(|p| p.position).collect();
    let center = dimensions.center();
    let resolver = CollisionResolver::new(config);

    let mut placed_satellites: Vec<PlacedSatellite> = Vec::new();
    let mut resolved_points: Vec<Point> = Vec::new();
    let mut connectors = Vec::new();

    for satellite in satellites {
        let (centroid, start) = jittered_position(satellite, &positions, center, config);
        let resolution = resolver.resolve(start, &pillar_points, &resolved_points, jitter);

        if resolution.exhausted {
            debug!(
                satellite = %satellite.id,
                attempts = resolution.attempts,
                "Satellite placed with unresolved overlap"
            );
        }

        for pillar_id in satellite.xp_distribution.keys() {
            let (Some(&to), Some(share)) = (positions.get(pillar_id), satellite.share_of(pillar_id))
            else {
                continue;
            };
            if share.is_finite() && share > 0.0 {
                connectors.push(Connector {
                    satellite: satellite.id.clone(),
                    pillar: pillar_id.clone(),
                    from: resolution.position,
                    to,
                    share,
                });
            }
        }

        resolved_points.push(resolution.position);
        placed_satellites.push(PlacedSatellite {
            id: satellite.id.clone(),
            title: satellite.title.clone(),
            status: satellite.status,
            centroid: centroid.point,
            position: resolution.position,
            radius: config.satellite_size.radius_for(satellite.total_xp),
            attempts: resolution.attempts,
            exhausted: resolution.exhausted,
        });
    }

    let placement = Placement {
        pillars: placed_pillars,
        satellites: placed_satellites,
        connectors,
    };
    debug!(
        pillars = placement.pillars.len(),
        satellites = placement.satellites.len(),
        exhausted = placement.exhausted_count(),
        width = dimensions.width,
        height = dimensions.height,
        "Layout pass complete"
    );
    placement
}
