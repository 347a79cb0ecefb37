//! Spatial layout for the skill constellation.
//!
//! This crate turns plain pillar and satellite records into positions. It
//! performs no I/O and keeps no state between calls: the same inputs give
//! the same outputs, apart from the collision push perturbation which is
//! drawn from an injectable [`PushJitter`] source.
//!
//! # Modules
//!
//! - [`config`] -- Tunable layout constants ([`LayoutConfig`], [`NodeSize`]).
//! - [`error`] -- Error types for layout configuration.
//! - [`pillar`] -- Fixed-radius radial placement of pillar nodes.
//! - [`satellite`] -- Weighted-centroid placement with deterministic orbital jitter.
//! - [`collision`] -- Iterative repulsion away from pillars and earlier satellites.
//! - [`jitter`] -- Sources for the collision push perturbation.
//! - [`pipeline`] -- One forward placement pass over a satellite list.

pub mod collision;
pub mod config;
pub mod error;
pub mod jitter;
pub mod pillar;
pub mod pipeline;
pub mod satellite;

// Re-export primary types at crate root.
pub use collision::{CONTACT_TOLERANCE, CollisionResolver, Resolution};
pub use config::{LayoutConfig, NodeSize};
pub use error::LayoutError;
pub use jitter::{GoldenRatioJitter, NoJitter, PushJitter, RngJitter};
pub use pillar::{
    PillarPositions, compute_pillar_positions, orbit_radius, pillar_angle, position_map,
};
pub use pipeline::{Placement, place};
pub use satellite::{Centroid, jittered_position, orbital_offset, weighted_centroid};
