//! Configuration constants and defaults for constellation placement.
//!
//! The [`LayoutConfig`] struct bundles every tunable used by pillar
//! placement, satellite jitter, and collision resolution, so that callers
//! (the scene composer, tests) can override defaults. The view layer builds
//! it from `constellation.yaml` under the `layout` key.

use crate::error::LayoutError;

/// Configuration for one placement pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Fraction of the shorter viewport side used as the pillar ring radius
    /// (default: 0.3).
    pub radius_factor: f64,

    /// Lower clamp for the pillar ring radius in pixels (default: 150).
    pub min_radius: f64,

    /// Upper clamp for the pillar ring radius in pixels (default: 400).
    pub max_radius: f64,

    /// Smallest orbital jitter distance from the centroid (default: 30).
    pub orbit_base: f64,

    /// Number of distinct jitter distances above `orbit_base` (default: 40).
    ///
    /// The jitter distance is `orbit_base + hash % orbit_spread`, so the
    /// default range is 30 to 69 pixels.
    pub orbit_spread: u64,

    /// Exclusion radius around each pillar (default: 80).
    pub min_distance_from_pillar: f64,

    /// Exclusion radius between two satellites (default: 25).
    pub min_distance_between_satellites: f64,

    /// Maximum collision passes per satellite (default: 30).
    pub max_attempts: u32,

    /// Half-width in radians of the push perturbation applied when two
    /// satellites collide (default: 0.15).
    pub push_jitter: f64,

    /// Drawn size of satellite nodes as a function of quest XP.
    pub satellite_size: NodeSize,

    /// Drawn size of pillar nodes as a function of pillar XP.
    pub pillar_size: NodeSize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius_factor: 0.3,
            min_radius: 150.0,
            max_radius: 400.0,
            orbit_base: 30.0,
            orbit_spread: 40,
            min_distance_from_pillar: 80.0,
            min_distance_between_satellites: 25.0,
            max_attempts: 30,
            push_jitter: 0.15,
            satellite_size: NodeSize::SATELLITE,
            pillar_size: NodeSize::PILLAR,
        }
    }
}

impl LayoutConfig {
    /// Check that every parameter is finite and within range.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] naming the first bad parameter.
    pub fn validate(&self) -> Result<(), LayoutError> {
        positive("radius_factor", self.radius_factor)?;
        positive("min_radius", self.min_radius)?;
        positive("max_radius", self.max_radius)?;
        if self.min_radius > self.max_radius {
            return Err(invalid(format!(
                "min_radius ({}) exceeds max_radius ({})",
                self.min_radius, self.max_radius
            )));
        }
        non_negative("orbit_base", self.orbit_base)?;
        if self.orbit_spread == 0 {
            return Err(invalid("orbit_spread must be at least 1".to_owned()));
        }
        non_negative("min_distance_from_pillar", self.min_distance_from_pillar)?;
        non_negative(
            "min_distance_between_satellites",
            self.min_distance_between_satellites,
        )?;
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts must be at least 1".to_owned()));
        }
        non_negative("push_jitter", self.push_jitter)?;
        self.satellite_size.validate("satellite_size")?;
        self.pillar_size.validate("pillar_size")
    }
}

/// Maps an XP amount to a drawn node radius.
///
/// `radius = clamp(base + sqrt(xp) * scale, min, max)`. Negative or
/// non-finite XP counts as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSize {
    /// Radius at zero XP before clamping.
    pub base: f64,
    /// Growth per square-root XP.
    pub scale: f64,
    /// Smallest drawn radius.
    pub min: f64,
    /// Largest drawn radius.
    pub max: f64,
}

impl NodeSize {
    /// Default satellite sizing: 6 to 18 pixels.
    pub const SATELLITE: Self = Self {
        base: 6.0,
        scale: 0.5,
        min: 6.0,
        max: 18.0,
    };

    /// Default pillar sizing: 28 to 48 pixels.
    pub const PILLAR: Self = Self {
        base: 28.0,
        scale: 0.2,
        min: 28.0,
        max: 48.0,
    };

    /// Drawn radius for `xp`.
    pub fn radius_for(&self, xp: f64) -> f64 {
        let xp = if xp.is_finite() { xp.max(0.0) } else { 0.0 };
        xp.sqrt().mul_add(self.scale, self.base).clamp(self.min, self.max)
    }

    fn validate(&self, name: &str) -> Result<(), LayoutError> {
        non_negative(&format!("{name}.base"), self.base)?;
        non_negative(&format!("{name}.scale"), self.scale)?;
        non_negative(&format!("{name}.min"), self.min)?;
        non_negative(&format!("{name}.max"), self.max)?;
        if self.min > self.max {
            return Err(invalid(format!("{name}.min exceeds {name}.max")));
        }
        Ok(())
    }
}

const fn invalid(reason: String) -> LayoutError {
    LayoutError::InvalidConfig { reason }
}

fn positive(name: &str, value: f64) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a positive number, got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), LayoutError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a non-negative number, got {value}")))
    }
}
