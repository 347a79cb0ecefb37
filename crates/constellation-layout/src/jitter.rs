//! Sources for the satellite push perturbation.
//!
//! When two satellites overlap, the push that separates them is rotated by
//! a small angle so that a pair cannot bounce back and forth along a single
//! axis. This is the only nondeterministic term in the layout, so it sits
//! behind the [`PushJitter`] trait:
//!
//! - [`RngJitter`] -- uniform draws from any [`rand::Rng`] (thread RNG in
//!   production, a seeded `SmallRng` for reproducible runs).
//! - [`GoldenRatioJitter`] -- a deterministic low-discrepancy sequence that
//!   still spreads successive pushes evenly across the allowed range.
//! - [`NoJitter`] -- always zero.

use rand::rngs::{SmallRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Conjugate of the golden ratio, `(sqrt(5) - 1) / 2`.
const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_894_9;

/// A source of push-angle perturbations.
pub trait PushJitter {
    /// Return an angle in `[-half_width, half_width]` radians.
    ///
    /// A non-positive or non-finite `half_width` yields zero.
    fn perturbation(&mut self, half_width: f64) -> f64;
}

impl<J: PushJitter + ?Sized> PushJitter for &mut J {
    fn perturbation(&mut self, half_width: f64) -> f64 {
        (**self).perturbation(half_width)
    }
}

/// Uniform perturbation drawn from a random number generator.
#[derive(Debug, Clone)]
pub struct RngJitter<R> {
    rng: R,
}

impl<R: Rng> RngJitter<R> {
    /// Wrap an existing generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngJitter<ThreadRng> {
    /// Jitter backed by the thread-local generator.
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl RngJitter<SmallRng> {
    /// Reproducible jitter from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PushJitter for RngJitter<R> {
    fn perturbation(&mut self, half_width: f64) -> f64 {
        if !(half_width.is_finite() && half_width > 0.0) {
            return 0.0;
        }
        self.rng.random_range(-half_width..=half_width)
    }
}

/// Deterministic low-discrepancy perturbation.
///
/// Successive values walk the additive golden-ratio sequence, which covers
/// `[-half_width, half_width]` evenly without ever repeating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldenRatioJitter {
    state: f64,
}

impl GoldenRatioJitter {
    /// Start the sequence at `offset` (only its fractional part matters).
    pub fn new(offset: f64) -> Self {
        let state = if offset.is_finite() { offset.rem_euclid(1.0) } else { 0.0 };
        Self { state }
    }
}

impl Default for GoldenRatioJitter {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl PushJitter for GoldenRatioJitter {
    fn perturbation(&mut self, half_width: f64) -> f64 {
        self.state = (self.state + GOLDEN_RATIO_CONJUGATE).rem_euclid(1.0);
        if !(half_width.is_finite() && half_width > 0.0) {
            return 0.0;
        }
        self.state.mul_add(2.0, -1.0) * half_width
    }
}

/// No perturbation at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoJitter;

impl PushJitter for NoJitter {
    fn perturbation(&mut self, _half_width: f64) -> f64 {
        0.0
    }
}
