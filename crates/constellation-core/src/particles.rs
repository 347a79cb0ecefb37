//! Decorative motion: the background star field and satellite bob.
//!
//! The particle buffer is owned by whoever drives the ambient frame loop
//! and is only mutated through [`ParticleField::step`]. Positions are kept
//! in unit space (`[0, 1)` on both axes) so a resize needs no fix-up.

use std::f64::consts::TAU;

use constellation_types::{Dimensions, Point, SatelliteId};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::AmbientConfig;

/// Smallest alpha a twinkling particle fades to.
const MIN_ALPHA: f64 = 0.25;

/// One background star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in unit space.
    pub position: Point,
    /// Drift in unit space per second.
    pub velocity: Point,
    /// Twinkle phase in radians, kept within `[0, TAU)`.
    pub phase: f64,
    /// Drawn radius in pixels.
    pub size: f64,
}

impl Particle {
    /// Current opacity in `[MIN_ALPHA, 1]`.
    pub fn alpha(&self) -> f64 {
        MIN_ALPHA + (1.0 - MIN_ALPHA) * 0.5f64.mul_add(self.phase.sin(), 0.5)
    }

    /// Screen position for a viewport.
    pub fn screen_position(&self, dimensions: Dimensions) -> Point {
        Point::new(self.position.x * dimensions.width, self.position.y * dimensions.height)
    }
}

/// The owned star-field buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    particles: Vec<Particle>,
    twinkle_speed: f64,
    elapsed: f64,
}

impl ParticleField {
    /// Scatter `particle_count` stars from the configured seed.
    pub fn new(config: &AmbientConfig) -> Self {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let drift = config.drift_speed;
        let count = usize::try_from(config.particle_count).unwrap_or(0);
        let particles = (0..count)
            .map(|_| Particle {
                position: Point::new(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)),
                velocity: Point::new(
                    rng.random_range(-drift..=drift),
                    rng.random_range(-drift..=drift),
                ),
                phase: rng.random_range(0.0..TAU),
                size: rng.random_range(0.5..2.0),
            })
            .collect();
        Self {
            particles,
            twinkle_speed: config.twinkle_speed,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds: drift with wrap-around and twinkle.
    ///
    /// Negative or non-finite steps are ignored.
    pub fn step(&mut self, dt: f64) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        self.elapsed += dt;
        let spin = self.twinkle_speed * dt;
        for particle in &mut self.particles {
            particle.position = Point::new(
                wrap(particle.velocity.x.mul_add(dt, particle.position.x), 1.0),
                wrap(particle.velocity.y.mul_add(dt, particle.position.y), 1.0),
            );
            particle.phase = wrap(particle.phase + spin, TAU);
        }
    }

    /// Opacity of particle `index`.
    pub fn alpha(&self, index: usize) -> Option<f64> {
        self.particles.get(index).map(Particle::alpha)
    }

    /// Seconds of motion applied so far.
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// All particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the field is empty.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Wrap into `[0, period)`. `rem_euclid` can round tiny negatives up to
/// exactly `period`.
fn wrap(value: f64, period: f64) -> f64 {
    let wrapped = value.rem_euclid(period);
    if wrapped >= period { 0.0 } else { wrapped }
}

/// Vertical bob of a satellite at `elapsed` seconds.
///
/// Each satellite's phase comes from its id, so neighbours drift out of
/// step with each other but a given satellite always moves the same way.
pub fn bob_offset(id: &SatelliteId, elapsed: f64, config: &AmbientConfig) -> f64 {
    if !elapsed.is_finite() {
        return 0.0;
    }
    let degrees = u32::try_from(id.char_code_sum() % 360).unwrap_or(0);
    let phase = f64::from(degrees).to_radians();
    config.bob_amplitude * elapsed.mul_add(config.bob_speed, phase).sin()
}
