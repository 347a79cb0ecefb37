//! Configuration loading and typed config structures for the constellation
//! view.
//!
//! The configuration lives in `constellation.yaml`. This module defines
//! strongly-typed structs that mirror the YAML structure and a loader that
//! reads and validates the file. Every field has a default matching the
//! reference layout, so an empty file is a valid configuration.

use std::path::Path;

use constellation_layout::{GoldenRatioJitter, LayoutConfig, NodeSize, PushJitter, RngJitter};
use constellation_types::Layer;
use serde::Deserialize;

use crate::input::ModifierKey;
use crate::scene::RelayoutPolicy;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range or inconsistent.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

impl From<constellation_layout::LayoutError> for ConfigError {
    fn from(err: constellation_layout::LayoutError) -> Self {
        Self::Invalid {
            reason: err.to_string(),
        }
    }
}

/// Top-level constellation configuration.
///
/// Mirrors the structure of `constellation.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConstellationConfig {
    /// Pillar ring, orbital jitter, and collision parameters.
    #[serde(default)]
    pub layout: PlacementConfig,

    /// Zoom, pan, and parallax parameters.
    #[serde(default)]
    pub view: ViewConfig,

    /// Time cursor and autoplay parameters.
    #[serde(default)]
    pub timeline: TimelineConfig,

    /// Decorative motion parameters.
    #[serde(default)]
    pub ambient: AmbientConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConstellationConfig {
    /// Load and validate configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.to_layout_config().validate()?;
        self.view.validate()?;
        self.timeline.validate()?;
        self.ambient.validate()
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Which source feeds the satellite push perturbation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterMode {
    /// Thread-local random generator.
    #[default]
    Random,
    /// `SmallRng` seeded from `jitter_seed`; reproducible across runs.
    Seeded,
    /// Deterministic golden-ratio sequence.
    Golden,
}

impl JitterMode {
    /// Build the jitter source for this mode.
    pub fn build(self, seed: u64) -> Box<dyn PushJitter> {
        match self {
            Self::Random => Box::new(RngJitter::thread()),
            Self::Seeded => Box::new(RngJitter::seeded(seed)),
            Self::Golden => Box::new(GoldenRatioJitter::default()),
        }
    }
}

/// Node size curve as written in YAML.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct NodeSizeConfig {
    /// Radius at zero XP before clamping.
    pub base: f64,
    /// Growth per square-root XP.
    pub scale: f64,
    /// Smallest drawn radius.
    pub min: f64,
    /// Largest drawn radius.
    pub max: f64,
}

impl From<NodeSize> for NodeSizeConfig {
    fn from(size: NodeSize) -> Self {
        Self {
            base: size.base,
            scale: size.scale,
            min: size.min,
            max: size.max,
        }
    }
}

impl From<NodeSizeConfig> for NodeSize {
    fn from(size: NodeSizeConfig) -> Self {
        Self {
            base: size.base,
            scale: size.scale,
            min: size.min,
            max: size.max,
        }
    }
}

/// Placement configuration (YAML key `layout`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlacementConfig {
    /// Fraction of the shorter viewport side used as the pillar ring radius.
    #[serde(default = "default_radius_factor")]
    pub radius_factor: f64,

    /// Lower clamp for the pillar ring radius in pixels.
    #[serde(default = "default_min_radius")]
    pub min_radius: f64,

    /// Upper clamp for the pillar ring radius in pixels.
    #[serde(default = "default_max_radius")]
    pub max_radius: f64,

    /// Smallest orbital jitter distance.
    #[serde(default = "default_orbit_base")]
    pub orbit_base: f64,

    /// Number of distinct orbital jitter distances.
    #[serde(default = "default_orbit_spread")]
    pub orbit_spread: u64,

    /// Exclusion radius around each pillar.
    #[serde(default = "default_min_distance_from_pillar")]
    pub min_distance_from_pillar: f64,

    /// Exclusion radius between satellites.
    #[serde(default = "default_min_distance_between_satellites")]
    pub min_distance_between_satellites: f64,

    /// Maximum collision passes per satellite.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Half-width in radians of the satellite push perturbation.
    #[serde(default = "default_push_jitter")]
    pub push_jitter: f64,

    /// Source of the push perturbation.
    #[serde(default)]
    pub jitter: JitterMode,

    /// Seed used when `jitter` is `seeded`.
    #[serde(default = "default_jitter_seed")]
    pub jitter_seed: u64,

    /// Satellite size curve.
    #[serde(default = "default_satellite_size")]
    pub satellite_size: NodeSizeConfig,

    /// Pillar size curve.
    #[serde(default = "default_pillar_size")]
    pub pillar_size: NodeSizeConfig,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            radius_factor: default_radius_factor(),
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
            orbit_base: default_orbit_base(),
            orbit_spread: default_orbit_spread(),
            min_distance_from_pillar: default_min_distance_from_pillar(),
            min_distance_between_satellites: default_min_distance_between_satellites(),
            max_attempts: default_max_attempts(),
            push_jitter: default_push_jitter(),
            jitter: JitterMode::default(),
            jitter_seed: default_jitter_seed(),
            satellite_size: default_satellite_size(),
            pillar_size: default_pillar_size(),
        }
    }
}

impl PlacementConfig {
    /// Convert into the layout crate's parameter bundle.
    pub fn to_layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            radius_factor: self.radius_factor,
            min_radius: self.min_radius,
            max_radius: self.max_radius,
            orbit_base: self.orbit_base,
            orbit_spread: self.orbit_spread,
            min_distance_from_pillar: self.min_distance_from_pillar,
            min_distance_between_satellites: self.min_distance_between_satellites,
            max_attempts: self.max_attempts,
            push_jitter: self.push_jitter,
            satellite_size: self.satellite_size.into(),
            pillar_size: self.pillar_size.into(),
        }
    }

    /// Build the configured push jitter source.
    pub fn build_jitter(&self) -> Box<dyn PushJitter> {
        self.jitter.build(self.jitter_seed)
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Per-layer parallax coefficients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParallaxConfig {
    /// Background star field coefficient.
    #[serde(default = "default_parallax_background")]
    pub background: f64,

    /// Connector line coefficient.
    #[serde(default = "default_parallax_connectors")]
    pub connectors: f64,

    /// Pillar node coefficient.
    #[serde(default = "default_parallax_pillars")]
    pub pillars: f64,

    /// Satellite node coefficient.
    #[serde(default = "default_parallax_satellites")]
    pub satellites: f64,

    /// Pixel shift of a layer with coefficient 1 at full pointer offset.
    #[serde(default = "default_parallax_travel")]
    pub travel: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            background: default_parallax_background(),
            connectors: default_parallax_connectors(),
            pillars: default_parallax_pillars(),
            satellites: default_parallax_satellites(),
            travel: default_parallax_travel(),
        }
    }
}

impl ParallaxConfig {
    /// Coefficient for `layer`.
    pub const fn coefficient(&self, layer: Layer) -> f64 {
        match layer {
            Layer::Background => self.background,
            Layer::Connectors => self.connectors,
            Layer::Pillars => self.pillars,
            Layer::Satellites => self.satellites,
        }
    }
}

/// Zoom, pan, and parallax configuration (YAML key `view`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewConfig {
    /// Smallest zoom factor.
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,

    /// Largest zoom factor.
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,

    /// Zoom change per zoom button press.
    #[serde(default = "default_button_step")]
    pub button_step: f64,

    /// Zoom change per wheel tick while the zoom modifier is held.
    #[serde(default = "default_wheel_step")]
    pub wheel_step: f64,

    /// Largest pan distance from the origin on either axis, in pixels.
    #[serde(default = "default_max_pan")]
    pub max_pan: f64,

    /// Transition duration for eased (non-panning) transform changes.
    #[serde(default = "default_ease_ms")]
    pub ease_ms: u32,

    /// Modifier that must be held for the primary button to start a pan.
    #[serde(default = "default_pan_modifier")]
    pub pan_modifier: ModifierKey,

    /// Modifier that must be held for the wheel to zoom.
    #[serde(default = "default_zoom_modifier")]
    pub zoom_modifier: ModifierKey,

    /// Extra pixels around a node that still count as hovering it.
    #[serde(default = "default_hover_slop")]
    pub hover_slop: f64,

    /// Gap between a hovered node and its info card.
    #[serde(default = "default_card_gap")]
    pub card_gap: f64,

    /// Parallax coefficients.
    #[serde(default)]
    pub parallax: ParallaxConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            button_step: default_button_step(),
            wheel_step: default_wheel_step(),
            max_pan: default_max_pan(),
            ease_ms: default_ease_ms(),
            pan_modifier: default_pan_modifier(),
            zoom_modifier: default_zoom_modifier(),
            hover_slop: default_hover_slop(),
            card_gap: default_card_gap(),
            parallax: ParallaxConfig::default(),
        }
    }
}

impl ViewConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(invalid(format!("view.min_zoom must be positive, got {}", self.min_zoom)));
        }
        if !self.max_zoom.is_finite() || self.max_zoom < self.min_zoom {
            return Err(invalid(format!(
                "view.max_zoom ({}) must be finite and at least view.min_zoom ({})",
                self.max_zoom, self.min_zoom
            )));
        }
        for (name, value) in [
            ("view.button_step", self.button_step),
            ("view.wheel_step", self.wheel_step),
            ("view.max_pan", self.max_pan),
            ("view.hover_slop", self.hover_slop),
            ("view.card_gap", self.card_gap),
            ("view.parallax.travel", self.parallax.travel),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("{name} must be non-negative, got {value}")));
            }
        }
        for layer in Layer::ALL {
            if !self.parallax.coefficient(layer).is_finite() {
                return Err(invalid(format!("view.parallax coefficient for {layer:?} is not finite")));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// Time cursor configuration (YAML key `timeline`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimelineConfig {
    /// Autoplay covers the full range in about this many frames.
    #[serde(default = "default_autoplay_frames")]
    pub autoplay_frames: u32,

    /// Smallest autoplay step, in days.
    #[serde(default = "default_min_step_days")]
    pub min_step_days: i64,

    /// Span back from "now" used when there are no satellites, in days.
    #[serde(default = "default_span_days")]
    pub default_span_days: i64,

    /// How satellite positions react to cursor changes.
    #[serde(default)]
    pub relayout: RelayoutPolicy,

    /// Whether scrubbing pauses a running autoplay.
    #[serde(default = "default_true")]
    pub scrub_cancels_autoplay: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            autoplay_frames: default_autoplay_frames(),
            min_step_days: default_min_step_days(),
            default_span_days: default_span_days(),
            relayout: RelayoutPolicy::default(),
            scrub_cancels_autoplay: true,
        }
    }
}

impl TimelineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.autoplay_frames == 0 {
            return Err(invalid("timeline.autoplay_frames must be at least 1".to_owned()));
        }
        if self.min_step_days <= 0 {
            return Err(invalid("timeline.min_step_days must be at least 1".to_owned()));
        }
        if self.default_span_days < 0 {
            return Err(invalid("timeline.default_span_days must not be negative".to_owned()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Ambient
// ---------------------------------------------------------------------------

/// Decorative motion configuration (YAML key `ambient`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AmbientConfig {
    /// Number of background particles.
    #[serde(default = "default_particle_count")]
    pub particle_count: u32,

    /// Twinkle phase speed in radians per second.
    #[serde(default = "default_twinkle_speed")]
    pub twinkle_speed: f64,

    /// Largest drift speed in viewport fractions per second.
    #[serde(default = "default_drift_speed")]
    pub drift_speed: f64,

    /// Vertical bob amplitude of satellites, in pixels.
    #[serde(default = "default_bob_amplitude")]
    pub bob_amplitude: f64,

    /// Bob phase speed in radians per second.
    #[serde(default = "default_bob_speed")]
    pub bob_speed: f64,

    /// Seed for the particle field.
    #[serde(default = "default_ambient_seed")]
    pub seed: u64,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            particle_count: default_particle_count(),
            twinkle_speed: default_twinkle_speed(),
            drift_speed: default_drift_speed(),
            bob_amplitude: default_bob_amplitude(),
            bob_speed: default_bob_speed(),
            seed: default_ambient_seed(),
        }
    }
}

impl AmbientConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("ambient.twinkle_speed", self.twinkle_speed),
            ("ambient.drift_speed", self.drift_speed),
            ("ambient.bob_amplitude", self.bob_amplitude),
            ("ambient.bob_speed", self.bob_speed),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("{name} must be non-negative, got {value}")));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn invalid(reason: String) -> ConfigError {
    ConfigError::Invalid { reason }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_radius_factor() -> f64 {
    0.3
}

const fn default_min_radius() -> f64 {
    150.0
}

const fn default_max_radius() -> f64 {
    400.0
}

const fn default_orbit_base() -> f64 {
    30.0
}

const fn default_orbit_spread() -> u64 {
    40
}

const fn default_min_distance_from_pillar() -> f64 {
    80.0
}

const fn default_min_distance_between_satellites() -> f64 {
    25.0
}

const fn default_max_attempts() -> u32 {
    30
}

const fn default_push_jitter() -> f64 {
    0.15
}

const fn default_jitter_seed() -> u64 {
    42
}

const fn default_satellite_size() -> NodeSizeConfig {
    NodeSizeConfig {
        base: NodeSize::SATELLITE.base,
        scale: NodeSize::SATELLITE.scale,
        min: NodeSize::SATELLITE.min,
        max: NodeSize::SATELLITE.max,
    }
}

const fn default_pillar_size() -> NodeSizeConfig {
    NodeSizeConfig {
        base: NodeSize::PILLAR.base,
        scale: NodeSize::PILLAR.scale,
        min: NodeSize::PILLAR.min,
        max: NodeSize::PILLAR.max,
    }
}

const fn default_parallax_background() -> f64 {
    0.5
}

const fn default_parallax_connectors() -> f64 {
    0.25
}

const fn default_parallax_pillars() -> f64 {
    0.15
}

const fn default_parallax_satellites() -> f64 {
    0.1
}

const fn default_parallax_travel() -> f64 {
    20.0
}

const fn default_min_zoom() -> f64 {
    0.5
}

const fn default_max_zoom() -> f64 {
    3.0
}

const fn default_button_step() -> f64 {
    0.2
}

const fn default_wheel_step() -> f64 {
    0.1
}

const fn default_max_pan() -> f64 {
    2000.0
}

const fn default_ease_ms() -> u32 {
    300
}

const fn default_pan_modifier() -> ModifierKey {
    ModifierKey::Space
}

const fn default_zoom_modifier() -> ModifierKey {
    ModifierKey::Ctrl
}

const fn default_hover_slop() -> f64 {
    6.0
}

const fn default_card_gap() -> f64 {
    12.0
}

const fn default_autoplay_frames() -> u32 {
    600
}

const fn default_min_step_days() -> i64 {
    1
}

const fn default_span_days() -> i64 {
    365
}

const fn default_true() -> bool {
    true
}

const fn default_particle_count() -> u32 {
    120
}

const fn default_twinkle_speed() -> f64 {
    1.5
}

const fn default_drift_speed() -> f64 {
    0.01
}

const fn default_bob_amplitude() -> f64 {
    3.0
}

const fn default_bob_speed() -> f64 {
    0.8
}

const fn default_ambient_seed() -> u64 {
    7
}

fn default_log_level() -> String {
    "info".to_owned()
}
