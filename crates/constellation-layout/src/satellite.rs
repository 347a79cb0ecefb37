//! Satellite placement before collision correction.
//!
//! A satellite starts at the XP-weighted centroid of the pillars it fed,
//! then moves onto a small orbit around that centroid. The orbit distance
//! and angle come from a hash of the satellite id, so a satellite with the
//! same id and distribution always lands on the same pre-collision spot.
//!
//! # Centroid
//!
//! Each pillar present in both the distribution and the position map
//! contributes `position * (xp / total_xp)` to a plain weighted sum. The
//! sum is not renormalized: a distribution that only partly matches known
//! pillars is pulled toward the origin by the missing share. The total
//! matched weight only decides the fallback: when nothing matches (or
//! `total_xp` is not positive) the satellite sits at the canvas center.
//!
//! # Orbital jitter
//!
//! ```text
//! hash   = sum of UTF-16 code units of the id
//! radius = orbit_base + hash % orbit_spread
//! angle  = (hash % 360) degrees
//! ```

use constellation_types::{Point, Satellite, SatelliteId};

use crate::config::LayoutConfig;
use crate::pillar::PillarPositions;

/// XP-weighted centroid of a satellite's contributing pillars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    /// The centroid, or the canvas center on fallback.
    pub point: Point,
    /// Sum of matched weights. Zero means the fallback was used.
    pub total_weight: f64,
}

impl Centroid {
    /// Whether no pillar matched and the canvas center was used.
    pub fn is_fallback(&self) -> bool {
        self.total_weight <= 0.0
    }
}

/// Compute the weighted centroid of `satellite` over `pillars`.
///
/// `center` is returned when no listed pillar has a known position.
pub fn weighted_centroid(satellite: &Satellite, pillars: &PillarPositions, center: Point) -> Centroid {
    let total_xp = satellite.total_xp;
    if !(total_xp.is_finite() && total_xp > 0.0) {
        return Centroid {
            point: center,
            total_weight: 0.0,
        };
    }

    let mut sum = Point::ZERO;
    let mut total_weight = 0.0;
    for (pillar_id, xp) in &satellite.xp_distribution {
        let Some(position) = pillars.get(pillar_id) else {
            continue;
        };
        let weight = xp / total_xp;
        if !(weight.is_finite() && weight > 0.0) {
            continue;
        }
        sum += *position * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        Centroid {
            point: sum,
            total_weight,
        }
    } else {
        Centroid {
            point: center,
            total_weight: 0.0,
        }
    }
}

/// Deterministic orbit offset for a satellite id.
pub fn orbital_offset(id: &SatelliteId, config: &LayoutConfig) -> Point {
    let hash = id.char_code_sum();
    let spread = hash.checked_rem(config.orbit_spread).unwrap_or(0);
    let degrees = hash.checked_rem(360).unwrap_or(0);
    let radius = config.orbit_base + u64_to_f64(spread);
    Point::from_polar(radius, u64_to_f64(degrees).to_radians())
}

/// Pre-collision position: centroid plus orbital offset.
pub fn jittered_position(
    satellite: &Satellite,
    pillars: &PillarPositions,
    center: Point,
    config: &LayoutConfig,
) -> (Centroid, Point) {
    let centroid = weighted_centroid(satellite, pillars, center);
    let position = centroid.point + orbital_offset(&satellite.id, config);
    (centroid, position)
}

fn u64_to_f64(value: u64) -> f64 {
    u32::try_from(value).map_or(f64::from(u32::MAX), f64::from)
}
