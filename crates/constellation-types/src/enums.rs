//! Enumeration types for the skill constellation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Progress state of a quest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum QuestStatus {
    /// The quest has been accepted but no work has been logged.
    #[default]
    NotStarted,
    /// Work is underway.
    InProgress,
    /// The quest is finished and its XP is fully awarded.
    Completed,
}

/// Kind of a node in the constellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum NodeKind {
    /// A skill pillar.
    Pillar,
    /// A quest satellite.
    Satellite,
}

/// A rendering depth layer.
///
/// Layers are drawn back to front in declaration order. Each layer shifts
/// by its own parallax coefficient so that the constellation appears to
/// have depth when the pointer moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Layer {
    /// Ambient star field behind everything.
    Background,
    /// Lines linking satellites to the pillars they fed.
    Connectors,
    /// Pillar nodes.
    Pillars,
    /// Satellite nodes (closest to the viewer).
    Satellites,
}

impl Layer {
    /// All layers in draw order.
    pub const ALL: [Self; 4] = [Self::Background, Self::Connectors, Self::Pillars, Self::Satellites];
}
