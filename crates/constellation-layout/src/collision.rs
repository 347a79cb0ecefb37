//! Iterative repulsion that keeps satellites clear of pillars and of each
//! other.
//!
//! Each satellite is resolved once, against every pillar and against the
//! final positions of the satellites placed before it. A pass walks all
//! pillars, then all earlier satellites, and pushes the satellite straight
//! out of any exclusion zone it is inside by exactly the deficit:
//!
//! - pillar push: along `pillar -> satellite`.
//! - satellite push: along `other -> satellite`, rotated by a perturbation
//!   from the [`PushJitter`] source so two satellites never oscillate on a
//!   single axis.
//!
//! Passes repeat until one finds no violation or `max_attempts` passes have
//! run. Exhaustion is not an error: the last position is kept and the
//! [`Resolution`] is flagged so callers can tell.

use constellation_types::Point;
use tracing::trace;

use crate::config::LayoutConfig;
use crate::jitter::PushJitter;

/// Overlap below this many pixels is not treated as a violation.
///
/// Rotated pushes converge geometrically rather than exactly, so a strict
/// comparison would chase sub-pixel residue until the attempt budget runs out.
pub const CONTACT_TOLERANCE: f64 = 1e-6;

/// Outcome of resolving one satellite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Final position.
    pub position: Point,
    /// Number of passes run (1 when the start position was already clear).
    pub attempts: u32,
    /// Whether a violation remained after the last allowed pass.
    pub exhausted: bool,
}

/// Resolves satellite positions against exclusion zones.
#[derive(Debug, Clone, Copy)]
pub struct CollisionResolver<'a> {
    config: &'a LayoutConfig,
}

impl<'a> CollisionResolver<'a> {
    /// Create a resolver using the distances and attempt budget in `config`.
    pub const fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Push `start` out of every exclusion zone.
    ///
    /// `pillars` are pillar centers; `placed` are the resolved positions of
    /// satellites earlier in the current pass.
    pub fn resolve<J: PushJitter + ?Sized>(
        &self,
        start: Point,
        pillars: &[Point],
        placed: &[Point],
        jitter: &mut J,
    ) -> Resolution {
        let min_pillar = self.config.min_distance_from_pillar;
        let min_satellite = self.config.min_distance_between_satellites;
        let mut position = start;

        for attempt in 1..=self.config.max_attempts {
            let mut violated = false;

            for &pillar in pillars {
                let away = position - pillar;
                let distance = away.length();
                if distance < min_pillar - CONTACT_TOLERANCE {
                    position += Point::from_polar(min_pillar - distance, away.angle());
                    violated = true;
                }
            }

            for &other in placed {
                let away = position - other;
                let distance = away.length();
                if distance < min_satellite - CONTACT_TOLERANCE {
                    let angle = away.angle() + jitter.perturbation(self.config.push_jitter);
                    position += Point::from_polar(min_satellite - distance, angle);
                    violated = true;
                }
            }

            if !violated {
                return Resolution {
                    position,
                    attempts: attempt,
                    exhausted: false,
                };
            }
        }

        let exhausted = self.violates(position, pillars, placed);
        if exhausted {
            trace!(
                x = position.x,
                y = position.y,
                max_attempts = self.config.max_attempts,
                "Collision attempts exhausted with overlap remaining"
            );
        }
        Resolution {
            position,
            attempts: self.config.max_attempts,
            exhausted,
        }
    }

    /// Whether `position` is inside any exclusion zone.
    pub fn violates(&self, position: Point, pillars: &[Point], placed: &[Point]) -> bool {
        let min_pillar = self.config.min_distance_from_pillar - CONTACT_TOLERANCE;
        let min_satellite = self.config.min_distance_between_satellites - CONTACT_TOLERANCE;
        pillars.iter().any(|&p| position.distance(p) < min_pillar)
            || placed.iter().any(|&s| position.distance(s) < min_satellite)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::jitter::{NoJitter, RngJitter};

    const EPS: f64 = 1e-6;

    #[test]
    fn clear_position_is_untouched() {
        let config = LayoutConfig::default();
        let resolver = CollisionResolver::new(&config);
        let start = Point::new(500.0, 500.0);
        let r = resolver.resolve(start, &[Point::ZERO], &[], &mut NoJitter);
        assert_eq!(r.position, start);
        assert_eq!(r.attempts, 1);
        assert!(!r.exhausted);
    }

    #[test]
    fn pillar_push_moves_exactly_to_the_boundary() {
        let config = LayoutConfig::default();
        let resolver = CollisionResolver::new(&config);
        let pillar = Point::new(100.0, 100.0);
        let r = resolver.resolve(Point::new(130.0, 100.0), &[pillar], &[], &mut NoJitter);
        // Pushed straight right by the 50px deficit.
        assert!((r.position.x - 180.0).abs() < EPS);
        assert!((r.position.y - 100.0).abs() < EPS);
        assert_eq!(r.attempts, 2);
        assert!(!r.exhausted);
    }

    #[test]
    fn coincident_pillar_pushes_along_positive_x() {
        let config = LayoutConfig::default();
        let resolver = CollisionResolver::new(&config);
        let r = resolver.resolve(Point::ZERO, &[Point::ZERO], &[], &mut NoJitter);
        assert!((r.position.x - 80.0).abs() < EPS);
        assert!(r.position.y.abs() < EPS);
    }

    #[test]
    fn satellites_separate_with_random_jitter() {
        let config = LayoutConfig::default();
        let resolver = CollisionResolver::new(&config);
        let mut jitter = RngJitter::seeded(3);
        let other = Point::new(400.0, 400.0);
        let r = resolver.resolve(Point::new(405.0, 400.0), &[], &[other], &mut jitter);
        assert!(!r.exhausted);
        assert!(r.position.distance(other) >= config.min_distance_between_satellites - EPS);
    }

    #[test]
    fn impossible_constraints_are_flagged() {
        // Two pillars 100px apart with an 80px exclusion zone each leave no
        // room on the segment between them; a satellite boxed in on both
        // sides cannot settle within one attempt.
        let config = LayoutConfig {
            max_attempts: 1,
            ..LayoutConfig::default()
        };
        let resolver = CollisionResolver::new(&config);
        let pillars = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        let r = resolver.resolve(Point::new(50.0, 0.0), &pillars, &[], &mut NoJitter);
        assert_eq!(r.attempts, 1);
        assert!(r.exhausted);
        assert!(resolver.violates(r.position, &pillars, &[]));
    }

    #[test]
    fn later_satellite_respects_every_earlier_one() {
        let config = LayoutConfig::default();
        let resolver = CollisionResolver::new(&config);
        let placed = [
            Point::new(300.0, 300.0),
            Point::new(320.0, 300.0),
            Point::new(310.0, 318.0),
        ];
        let mut jitter = RngJitter::seeded(11);
        let r = resolver.resolve(Point::new(310.0, 305.0), &[], &placed, &mut jitter);
        if !r.exhausted {
            for p in placed {
                assert!(r.position.distance(p) >= config.min_distance_between_satellites - EPS);
            }
        }
    }
}
