//! Output records produced by the layout engine for the renderer.
//!
//! All positions are in layout space (pixels before the view transform).
//! None of these records are persisted; they are recomputed whenever the
//! inputs change.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::QuestStatus;
use crate::geometry::Point;
use crate::ids::{PillarId, SatelliteId};

/// A pillar with its computed radial position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlacedPillar {
    /// Pillar identifier.
    pub id: PillarId,
    /// Display name.
    pub name: String,
    /// Pillar XP (drives node size).
    pub xp: f64,
    /// Index in the input order (0 is at the top).
    pub index: u32,
    /// Center of the node.
    pub position: Point,
    /// Drawn node radius.
    pub radius: f64,
}

/// A satellite with its computed position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlacedSatellite {
    /// Satellite identifier.
    pub id: SatelliteId,
    /// Display title.
    pub title: String,
    /// Progress state.
    pub status: QuestStatus,
    /// XP-weighted centroid of the contributing pillars (before jitter).
    pub centroid: Point,
    /// Final position after jitter and collision correction.
    pub position: Point,
    /// Drawn node radius.
    pub radius: f64,
    /// Collision passes used to settle the position.
    pub attempts: u32,
    /// Whether collision resolution gave up with an overlap remaining.
    pub exhausted: bool,
}

/// A line from a satellite to a pillar it contributed XP to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Connector {
    /// Source satellite.
    pub satellite: SatelliteId,
    /// Target pillar.
    pub pillar: PillarId,
    /// Satellite end of the line.
    pub from: Point,
    /// Pillar end of the line.
    pub to: Point,
    /// Fraction of the satellite's XP that went to the pillar (line weight).
    pub share: f64,
}
