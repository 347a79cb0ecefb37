//! Input records delivered by the data layer.
//!
//! These are immutable snapshots: the engine never mutates them and never
//! stores a position on them. Positions live in the [`placed`] records.
//!
//! [`placed`]: crate::placed

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::QuestStatus;
use crate::ids::{PillarId, SatelliteId};

/// A skill pillar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Pillar {
    /// Stable identifier.
    pub id: PillarId,
    /// Display name.
    pub name: String,
    /// Experience accumulated in this pillar.
    #[serde(default)]
    pub xp: f64,
}

impl Pillar {
    /// Create a pillar.
    pub fn new(id: impl Into<PillarId>, name: impl Into<String>, xp: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            xp,
        }
    }
}

/// A quest or achievement, drawn as a satellite of the pillars it fed.
///
/// `xp_distribution` is expected to sum to roughly `total_xp`. The engine
/// trusts this and never checks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Satellite {
    /// Stable identifier; also seeds the orbital jitter.
    pub id: SatelliteId,
    /// Display title.
    pub title: String,
    /// Total experience awarded by the quest.
    #[serde(default)]
    pub total_xp: f64,
    /// Experience awarded per pillar.
    #[serde(default)]
    pub xp_distribution: BTreeMap<PillarId, f64>,
    /// Progress state.
    #[serde(default)]
    pub status: QuestStatus,
    /// When the quest happened. Satellites without a time are always visible.
    #[serde(default)]
    pub event_time: Option<DateTime<Utc>>,
}

impl Satellite {
    /// Create a satellite with an empty distribution and no event time.
    pub fn new(id: impl Into<SatelliteId>, title: impl Into<String>, total_xp: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            total_xp,
            xp_distribution: BTreeMap::new(),
            status: QuestStatus::default(),
            event_time: None,
        }
    }

    /// Builder: add `xp` awarded to `pillar`.
    #[must_use]
    pub fn with_xp(mut self, pillar: impl Into<PillarId>, xp: f64) -> Self {
        self.xp_distribution.insert(pillar.into(), xp);
        self
    }

    /// Builder: set the event time.
    #[must_use]
    pub fn at(mut self, event_time: DateTime<Utc>) -> Self {
        self.event_time = Some(event_time);
        self
    }

    /// Builder: set the status.
    #[must_use]
    pub fn with_status(mut self, status: QuestStatus) -> Self {
        self.status = status;
        self
    }

    /// Fraction of the quest's XP that went to `pillar`, if any.
    ///
    /// Returns `None` when `total_xp` is not a positive finite number.
    pub fn share_of(&self, pillar: &PillarId) -> Option<f64> {
        if !(self.total_xp.is_finite() && self.total_xp > 0.0) {
            return None;
        }
        self.xp_distribution
            .get(pillar)
            .map(|xp| xp / self.total_xp)
    }
}

/// One render cycle's worth of input data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Snapshot {
    /// Pillars in display order (index 0 is drawn at the top).
    #[serde(default)]
    pub pillars: Vec<Pillar>,
    /// Satellites in placement order (typically creation order).
    #[serde(default)]
    pub satellites: Vec<Satellite>,
}
