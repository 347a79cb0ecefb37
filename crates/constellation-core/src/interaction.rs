//! Hover, focus, selection, and keyboard navigation.
//!
//! [`Interaction`] keeps only node ids. Positions are looked up in the
//! current [`Placement`] when needed, so a relayout never leaves a stale
//! anchor behind.

use constellation_layout::Placement;
use constellation_types::{Dimensions, NodeId, NodeKind, Point};
use serde::Serialize;

use crate::input::{Key, Modifiers};
use crate::view::{LayerShifts, ViewTransform};

/// A node under the pointer (or focused), with its on-screen anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverTarget {
    /// Which node.
    pub id: NodeId,
    /// Node kind, for renderers that style cards per kind.
    pub kind: NodeKind,
    /// Node center in screen pixels.
    pub anchor: Point,
    /// Node radius in screen pixels.
    pub radius: f64,
}

/// Where to draw an info card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardPlacement {
    /// Top-left corner in screen pixels.
    pub origin: Point,
    /// The card sits left of the node.
    pub flipped_x: bool,
    /// The card sits above the node.
    pub flipped_y: bool,
}

/// Position an info card of size `card` beside `target`.
///
/// The card goes right of and below the node, flipping left or up when it
/// would leave the viewport, and is finally clamped inside it.
pub fn place_card(target: &HoverTarget, card: Dimensions, viewport: Dimensions, gap: f64) -> CardPlacement {
    let reach = target.radius + gap;
    let mut x = target.anchor.x + reach;
    let mut y = target.anchor.y + reach;
    let flipped_x = x + card.width > viewport.width;
    if flipped_x {
        x = target.anchor.x - reach - card.width;
    }
    let flipped_y = y + card.height > viewport.height;
    if flipped_y {
        y = target.anchor.y - reach - card.height;
    }
    let max = Point::new(
        (viewport.width - card.width).max(0.0),
        (viewport.height - card.height).max(0.0),
    );
    CardPlacement {
        origin: Point::new(x, y).clamp(Point::ZERO, max),
        flipped_x,
        flipped_y,
    }
}

/// Screen-space anchor of a node in the current placement.
pub fn target_for(
    placement: &Placement,
    id: &NodeId,
    transform: &ViewTransform,
    shifts: &LayerShifts,
) -> Option<HoverTarget> {
    let (position, radius, shift) = match id {
        NodeId::Pillar(pid) => placement
            .pillar(pid)
            .map(|p| (p.position, p.radius, shifts.pillars))?,
        NodeId::Satellite(sid) => placement
            .satellite(sid)
            .map(|s| (s.position, s.radius, shifts.satellites))?,
    };
    Some(HoverTarget {
        id: id.clone(),
        kind: id.kind(),
        anchor: transform.apply(position + shift),
        radius: radius * transform.zoom,
    })
}

/// Node under a screen-space `pointer`.
///
/// The pointer is mapped back through the transform and each layer's
/// parallax shift. Satellites sit above pillars, so the nearest satellite
/// within its radius plus `slop` wins; otherwise the nearest such pillar.
pub fn hit_test(
    placement: &Placement,
    pointer: Point,
    transform: &ViewTransform,
    shifts: &LayerShifts,
    slop: f64,
) -> Option<NodeId> {
    if !pointer.is_finite() {
        return None;
    }
    let layout = transform.invert(pointer);
    let slop = slop / transform.zoom;

    let satellite_point = layout - shifts.satellites;
    let satellite = placement
        .satellites
        .iter()
        .map(|s| (s, s.position.distance(satellite_point)))
        .filter(|(s, d)| *d <= s.radius + slop)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(s, _)| NodeId::Satellite(s.id.clone()));
    if satellite.is_some() {
        return satellite;
    }

    let pillar_point = layout - shifts.pillars;
    placement
        .pillars
        .iter()
        .map(|p| (p, p.position.distance(pillar_point)))
        .filter(|(p, d)| *d <= p.radius + slop)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(p, _)| NodeId::Pillar(p.id.clone()))
}

/// Keyboard focus order: pillars in ring order, then visible satellites in
/// placement order.
pub fn focus_order(placement: &Placement) -> Vec<NodeId> {
    placement
        .pillars
        .iter()
        .map(|p| NodeId::Pillar(p.id.clone()))
        .chain(placement.satellites.iter().map(|s| NodeId::Satellite(s.id.clone())))
        .collect()
}

fn position_of(placement: &Placement, id: &NodeId) -> Option<Point> {
    match id {
        NodeId::Pillar(pid) => placement.pillar(pid).map(|p| p.position),
        NodeId::Satellite(sid) => placement.satellite(sid).map(|s| s.position),
    }
}

/// Hovered, focused, and selected node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Interaction {
    /// Node under the pointer.
    pub hovered: Option<NodeId>,
    /// Node with keyboard focus.
    pub focused: Option<NodeId>,
    /// Node the user selected (click or Enter).
    pub selected: Option<NodeId>,
}

impl Interaction {
    /// Set the hovered node. Returns whether it changed.
    pub fn hover(&mut self, id: Option<NodeId>) -> bool {
        let changed = self.hovered != id;
        self.hovered = id;
        changed
    }

    /// Select a node (or clear with `None`). Returns whether it changed.
    pub fn select(&mut self, id: Option<NodeId>) -> bool {
        let changed = self.selected != id;
        self.selected = id;
        changed
    }

    /// Drop ids that are no longer in `placement`, e.g. satellites hidden by
    /// the time cursor.
    pub fn retain(&mut self, placement: &Placement) {
        for slot in [&mut self.hovered, &mut self.focused, &mut self.selected] {
            if slot.as_ref().is_some_and(|id| position_of(placement, id).is_none()) {
                *slot = None;
            }
        }
    }

    /// Handle a navigation key. Returns whether any state changed.
    pub fn key(&mut self, key: Key, modifiers: Modifiers, placement: &Placement) -> bool {
        match key {
            Key::Tab => self.cycle(placement, modifiers.shift),
            Key::ArrowUp => self.step(placement, Point::new(0.0, -1.0)),
            Key::ArrowDown => self.step(placement, Point::new(0.0, 1.0)),
            Key::ArrowLeft => self.step(placement, Point::new(-1.0, 0.0)),
            Key::ArrowRight => self.step(placement, Point::new(1.0, 0.0)),
            Key::Enter => {
                let focused = self.focused.clone();
                focused.is_some() && self.select(focused)
            }
            Key::Escape => {
                if self.selected.is_some() {
                    self.selected = None;
                    true
                } else {
                    self.focused.take().is_some()
                }
            }
        }
    }

    fn focus(&mut self, id: Option<NodeId>) -> bool {
        let changed = self.focused != id;
        self.focused = id;
        changed
    }

    fn cycle(&mut self, placement: &Placement, backwards: bool) -> bool {
        let order = focus_order(placement);
        let count = order.len();
        if count == 0 {
            return false;
        }
        let current = self
            .focused
            .as_ref()
            .and_then(|id| order.iter().position(|candidate| candidate == id));
        let next = match (current, backwards) {
            (None, false) => 0,
            (None, true) => count.saturating_sub(1),
            (Some(i), false) => i.saturating_add(1).checked_rem(count).unwrap_or(0),
            (Some(i), true) => i.checked_sub(1).unwrap_or(count.saturating_sub(1)),
        };
        self.focus(order.get(next).cloned())
    }

    /// Move focus to the nearest node in `direction`. Nodes within 45
    /// degrees of the direction are preferred; failing that, any node in
    /// that half-plane.
    fn step(&mut self, placement: &Placement, direction: Point) -> bool {
        let Some(from) = self.focused.as_ref().and_then(|id| position_of(placement, id)) else {
            return self.cycle(placement, false);
        };
        let candidates: Vec<(NodeId, Point)> = focus_order(placement)
            .into_iter()
            .filter(|id| Some(id) != self.focused.as_ref())
            .filter_map(|id| position_of(placement, &id).map(|p| (id, p - from)))
            .collect();

        let nearest = |in_cone: bool| {
            candidates
                .iter()
                .filter(|(_, delta)| {
                    let along = delta.x * direction.x + delta.y * direction.y;
                    let across = (delta.x * direction.y - delta.y * direction.x).abs();
                    along > 0.0 && (!in_cone || across <= along)
                })
                .min_by(|a, b| a.1.length().total_cmp(&b.1.length()))
                .map(|(id, _)| id.clone())
        };
        match nearest(true).or_else(|| nearest(false)) {
            Some(id) => self.focus(Some(id)),
            None => false,
        }
    }
}
