//! Scene composition: everything a renderer needs for one frame.
//!
//! [`compose_scene`] is the whole pipeline as one pure function of
//! `(snapshot, dimensions, time cursor, view state, interaction)`. The
//! stateful [`ConstellationView`](crate::ConstellationView) calls the same
//! pieces but caches the placement between frames.

use std::collections::BTreeSet;

use constellation_layout::{LayoutConfig, Placement, PushJitter, place};
use constellation_types::{
    Connector, Dimensions, NodeId, PlacedPillar, PlacedSatellite, Satellite, SatelliteId, Snapshot,
};
use serde::{Deserialize, Serialize};

use crate::interaction::{HoverTarget, Interaction, target_for};
use crate::timeline::{TimeCursor, TimelineSnapshot};
use crate::view::{LayerShifts, ViewState, ViewTransform};

/// How satellite positions react to time-cursor changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayoutPolicy {
    /// Place the visible set from scratch whenever it changes. Satellites
    /// that stay visible may move as others appear before them.
    #[default]
    Rescan,
    /// Place the full set once; the cursor only filters. Visible
    /// satellites never move as the cursor changes.
    Stable,
}

/// Keep only the satellites (and their connectors) visible at the cursor.
///
/// `placement` must hold one placed satellite per entry of `satellites`, in
/// the same order, as produced by placing the full set.
pub fn filter_visible(placement: &Placement, satellites: &[Satellite], cursor: &TimeCursor) -> Placement {
    let kept: Vec<PlacedSatellite> = placement
        .satellites
        .iter()
        .zip(satellites)
        .filter(|(_, source)| cursor.is_visible(source))
        .map(|(placed, _)| placed.clone())
        .collect();
    let ids: BTreeSet<&SatelliteId> = kept.iter().map(|s| &s.id).collect();
    let connectors: Vec<Connector> = placement
        .connectors
        .iter()
        .filter(|c| ids.contains(&c.satellite))
        .cloned()
        .collect();
    Placement {
        pillars: placement.pillars.clone(),
        satellites: kept,
        connectors,
    }
}

/// Place the satellites visible at `cursor` under the given policy.
pub fn layout_visible<J: PushJitter + ?Sized>(
    snapshot: &Snapshot,
    dimensions: Dimensions,
    cursor: &TimeCursor,
    policy: RelayoutPolicy,
    config: &LayoutConfig,
    jitter: &mut J,
) -> Placement {
    match policy {
        RelayoutPolicy::Rescan => place(
            &snapshot.pillars,
            cursor.visible(&snapshot.satellites),
            dimensions,
            config,
            jitter,
        ),
        RelayoutPolicy::Stable => {
            let all = place(&snapshot.pillars, &snapshot.satellites, dimensions, config, jitter);
            filter_visible(&all, &snapshot.satellites, cursor)
        }
    }
}

/// One frame's worth of renderer input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// Viewport size.
    pub dimensions: Dimensions,
    /// Pillars in ring order.
    pub pillars: Vec<PlacedPillar>,
    /// Visible satellites in placement order.
    pub satellites: Vec<PlacedSatellite>,
    /// Links from visible satellites to their pillars.
    pub connectors: Vec<Connector>,
    /// Composed zoom and pan.
    pub transform: ViewTransform,
    /// Per-layer parallax shifts.
    pub parallax: LayerShifts,
    /// Node under the pointer, anchored on screen.
    pub hover: Option<HoverTarget>,
    /// Keyboard focus.
    pub focused: Option<NodeId>,
    /// Selection.
    pub selected: Option<NodeId>,
    /// Time cursor state.
    pub timeline: TimelineSnapshot,
}

/// Highlight flags for one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeState {
    /// Under the pointer.
    pub hovered: bool,
    /// Has keyboard focus.
    pub focused: bool,
    /// Selected.
    pub selected: bool,
}

impl Scene {
    /// Assemble a scene from an already computed placement.
    pub fn new(
        placement: Placement,
        dimensions: Dimensions,
        timeline: TimelineSnapshot,
        view: &ViewState,
        interaction: &Interaction,
    ) -> Self {
        let transform = view.transform(dimensions);
        let parallax = view.layer_shifts(dimensions);
        let hover = interaction
            .hovered
            .as_ref()
            .and_then(|id| target_for(&placement, id, &transform, &parallax));
        Self {
            dimensions,
            pillars: placement.pillars,
            satellites: placement.satellites,
            connectors: placement.connectors,
            transform,
            parallax,
            hover,
            focused: interaction.focused.clone(),
            selected: interaction.selected.clone(),
            timeline,
        }
    }

    /// Highlight flags for `id`.
    pub fn node_state(&self, id: &NodeId) -> NodeState {
        NodeState {
            hovered: self.hover.as_ref().is_some_and(|h| &h.id == id),
            focused: self.focused.as_ref() == Some(id),
            selected: self.selected.as_ref() == Some(id),
        }
    }

    /// Serialize for a web renderer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Run the whole pipeline: place the visible set and combine it with the
/// view and interaction state.
#[allow(clippy::too_many_arguments)]
pub fn compose_scene<J: PushJitter + ?Sized>(
    snapshot: &Snapshot,
    dimensions: Dimensions,
    cursor: &TimeCursor,
    view: &ViewState,
    interaction: &Interaction,
    policy: RelayoutPolicy,
    config: &LayoutConfig,
    jitter: &mut J,
) -> Scene {
    let placement = layout_visible(snapshot, dimensions, cursor, policy, config, jitter);
    Scene::new(
        placement,
        dimensions,
        cursor.snapshot(&snapshot.satellites),
        view,
        interaction,
    )
}
