//! Zoom, pan, and parallax.
//!
//! [`ViewState`] is the only long-lived view state: zoom, pan, the last
//! pointer position, and the pan anchor while a drag is active. It changes
//! only in response to discrete input events. Everything a renderer needs
//! each frame ([`ViewTransform`], [`LayerShifts`]) is derived from it on
//! demand and never stored.
//!
//! The composed transform is `scale(zoom) * translate(pan)` about the
//! viewport center:
//!
//! ```text
//! screen = origin + zoom * (layout + pan - origin)
//! ```

use constellation_types::{Dimensions, Layer, Point};
use serde::Serialize;

use crate::config::{ParallaxConfig, ViewConfig};
use crate::input::{ModifierKey, Modifiers, PointerButton};

/// Composed zoom and pan for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    /// Scale factor.
    pub zoom: f64,
    /// Translation applied before scaling, in layout pixels.
    pub pan: Point,
    /// Scaling origin (the viewport center).
    pub origin: Point,
    /// Transition duration the renderer should ease over, or `None` to
    /// apply immediately (while a drag is in progress).
    pub transition_ms: Option<u32>,
}

impl ViewTransform {
    /// Identity transform about `origin`.
    pub const fn identity(origin: Point) -> Self {
        Self {
            zoom: 1.0,
            pan: Point::ZERO,
            origin,
            transition_ms: None,
        }
    }

    /// Map a layout point to the screen.
    pub fn apply(&self, point: Point) -> Point {
        self.origin + (point + self.pan - self.origin) * self.zoom
    }

    /// Map a screen point back into layout space.
    pub fn invert(&self, screen: Point) -> Point {
        (screen - self.origin) * self.zoom.recip() + self.origin - self.pan
    }

    /// Whether the renderer should ease into this transform.
    pub const fn is_eased(&self) -> bool {
        self.transition_ms.is_some()
    }
}

/// Normalized pointer offset from the viewport center, each axis in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ParallaxOffset(pub Point);

impl ParallaxOffset {
    /// Offset of `pointer` from the center of `dimensions`.
    ///
    /// Degenerate viewports and missing pointers give a zero offset.
    pub fn from_pointer(pointer: Option<Point>, dimensions: Dimensions) -> Self {
        let Some(pointer) = pointer.filter(|p| p.is_finite()) else {
            return Self::default();
        };
        let center = dimensions.center();
        let axis = |value: f64, mid: f64| {
            if mid > 0.0 {
                ((value - mid) / mid).clamp(-1.0, 1.0)
            } else {
                0.0
            }
        };
        Self(Point::new(axis(pointer.x, center.x), axis(pointer.y, center.y)))
    }

    /// Pixel shift of a layer with the given coefficient.
    pub fn shift(self, coefficient: f64, travel: f64) -> Point {
        self.0 * (coefficient * travel)
    }
}

/// Per-layer parallax shifts in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LayerShifts {
    /// Background star field.
    pub background: Point,
    /// Connector lines.
    pub connectors: Point,
    /// Pillar nodes.
    pub pillars: Point,
    /// Satellite nodes.
    pub satellites: Point,
}

impl LayerShifts {
    /// Shifts for every layer from one pointer offset.
    pub fn new(offset: ParallaxOffset, parallax: &ParallaxConfig) -> Self {
        let shift = |layer| offset.shift(parallax.coefficient(layer), parallax.travel);
        Self {
            background: shift(Layer::Background),
            connectors: shift(Layer::Connectors),
            pillars: shift(Layer::Pillars),
            satellites: shift(Layer::Satellites),
        }
    }

    /// Shift for `layer`.
    pub const fn for_layer(&self, layer: Layer) -> Point {
        match layer {
            Layer::Background => self.background,
            Layer::Connectors => self.connectors,
            Layer::Pillars => self.pillars,
            Layer::Satellites => self.satellites,
        }
    }
}

/// Zoom, pan, and pointer state.
///
/// Mutators return whether the visible transform changed. Out-of-range
/// values are clamped and non-finite input is ignored; nothing here fails.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Current zoom, always within `[min_zoom, max_zoom]`.
    zoom: f64,
    /// Current pan, each axis within `[-max_pan, max_pan]`.
    pan: Point,
    /// Last pointer position inside the interactive region.
    pointer: Option<Point>,
    /// `pointer - pan` at drag start; `Some` while panning.
    anchor: Option<Point>,
    /// Limits and step sizes.
    config: ViewConfig,
}

impl ViewState {
    /// A reset view with the given limits.
    pub fn new(config: ViewConfig) -> Self {
        let mut state = Self {
            zoom: 1.0,
            pan: Point::ZERO,
            pointer: None,
            anchor: None,
            config,
        };
        state.reset();
        state
    }

    /// Current zoom factor.
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current pan.
    pub const fn pan(&self) -> Point {
        self.pan
    }

    /// Last pointer position, if the pointer is over the view.
    pub const fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Whether a drag-pan is in progress.
    pub const fn is_panning(&self) -> bool {
        self.anchor.is_some()
    }

    /// Limits and step sizes.
    pub const fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Set the zoom, clamped into range.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let clamped = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        let changed = differs(clamped, self.zoom);
        self.zoom = clamped;
        changed
    }

    /// Zoom-in button.
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom + self.config.button_step)
    }

    /// Zoom-out button.
    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom - self.config.button_step)
    }

    /// One wheel tick. Zooms only while the zoom modifier is held;
    /// otherwise the event is left to the host (returns `false`).
    pub fn wheel(&mut self, delta_y: f64, modifiers: Modifiers) -> bool {
        if !modifiers.holds(self.config.zoom_modifier) || !delta_y.is_finite() || delta_y == 0.0 {
            return false;
        }
        let step = if delta_y < 0.0 {
            self.config.wheel_step
        } else {
            -self.config.wheel_step
        };
        self.set_zoom(self.zoom + step)
    }

    /// Pinch gesture: scale the zoom by `scale`.
    pub fn pinch(&mut self, scale: f64) -> bool {
        if !(scale.is_finite() && scale > 0.0) {
            return false;
        }
        self.set_zoom(self.zoom * scale)
    }

    /// Reset-view button: zoom 1, no pan, any drag cancelled.
    pub fn reset(&mut self) -> bool {
        let before = (self.zoom, self.pan);
        self.zoom = 1.0_f64.clamp(self.config.min_zoom, self.config.max_zoom);
        self.pan = Point::ZERO;
        self.anchor = None;
        differs(before.0, self.zoom) || before.1 != self.pan
    }

    /// Button pressed. Starts a pan when the primary button goes down
    /// with the pan modifier held. Returns whether panning started.
    pub fn pointer_down(&mut self, position: Point, button: PointerButton, modifiers: Modifiers) -> bool {
        if !position.is_finite() {
            return false;
        }
        self.pointer = Some(position);
        let gated = self.config.pan_modifier == ModifierKey::None || modifiers.holds(self.config.pan_modifier);
        if button != PointerButton::Primary || !gated {
            return false;
        }
        self.anchor = Some(position - self.pan);
        true
    }

    /// Pointer moved. While panning, the pan follows the pointer.
    pub fn pointer_move(&mut self, position: Point) -> bool {
        if !position.is_finite() {
            return false;
        }
        self.pointer = Some(position);
        if let Some(anchor) = self.anchor {
            self.set_pan(position - anchor);
        }
        true
    }

    /// Button released; ends any pan. Returns whether a pan ended.
    pub const fn pointer_up(&mut self) -> bool {
        self.anchor.take().is_some()
    }

    /// Pointer left the interactive region; ends any pan and recenters the
    /// parallax.
    pub const fn pointer_leave(&mut self) -> bool {
        self.pointer = None;
        self.anchor.take().is_some()
    }

    fn set_pan(&mut self, pan: Point) {
        let limit = self.config.max_pan;
        self.pan = pan.clamp(Point::new(-limit, -limit), Point::new(limit, limit));
    }

    /// The composed transform for a viewport.
    pub fn transform(&self, dimensions: Dimensions) -> ViewTransform {
        ViewTransform {
            zoom: self.zoom,
            pan: self.pan,
            origin: dimensions.center(),
            transition_ms: if self.is_panning() {
                None
            } else {
                Some(self.config.ease_ms)
            },
        }
    }

    /// Normalized pointer offset for a viewport.
    pub fn parallax(&self, dimensions: Dimensions) -> ParallaxOffset {
        ParallaxOffset::from_pointer(self.pointer, dimensions)
    }

    /// Per-layer shifts for a viewport.
    pub fn layer_shifts(&self, dimensions: Dimensions) -> LayerShifts {
        LayerShifts::new(self.parallax(dimensions), &self.config.parallax)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

fn differs(a: f64, b: f64) -> bool {
    (a - b).abs() > f64::EPSILON
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    const SPACE: Modifiers = Modifiers {
        space: true,
        ..Modifiers::NONE
    };

    const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    #[test]
    fn zoom_buttons_step_and_clamp() {
        let mut view = ViewState::default();
        assert!(view.zoom_in());
        assert!((view.zoom() - 1.2).abs() < 1e-12);
        for _ in 0..20 {
            view.zoom_in();
        }
        assert!((view.zoom() - 3.0).abs() < 1e-12);
        assert!(!view.zoom_in());
        for _ in 0..20 {
            view.zoom_out();
        }
        assert!((view.zoom() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn wheel_needs_the_zoom_modifier() {
        let mut view = ViewState::default();
        assert!(!view.wheel(-100.0, Modifiers::NONE));
        assert!(view.wheel(-100.0, CTRL));
        assert!((view.zoom() - 1.1).abs() < 1e-12);
        assert!(view.wheel(100.0, CTRL));
        assert!((view.zoom() - 1.0).abs() < 1e-12);
        assert!(!view.wheel(f64::NAN, CTRL));
    }

    #[test]
    fn pinch_scales_and_clamps() {
        let mut view = ViewState::default();
        assert!(view.pinch(2.0));
        assert!((view.zoom() - 2.0).abs() < 1e-12);
        view.pinch(10.0);
        assert!((view.zoom() - 3.0).abs() < 1e-12);
        assert!(!view.pinch(0.0));
        assert!(!view.pinch(f64::INFINITY));
    }

    #[test]
    fn drag_pans_only_with_the_modifier() {
        let mut view = ViewState::default();
        assert!(!view.pointer_down(Point::new(100.0, 100.0), PointerButton::Primary, Modifiers::NONE));
        view.pointer_move(Point::new(150.0, 120.0));
        assert_eq!(view.pan(), Point::ZERO);

        assert!(view.pointer_down(Point::new(100.0, 100.0), PointerButton::Primary, SPACE));
        view.pointer_move(Point::new(150.0, 120.0));
        assert!(close(view.pan(), Point::new(50.0, 20.0)));
        assert!(view.pointer_up());
        view.pointer_move(Point::new(400.0, 400.0));
        assert!(close(view.pan(), Point::new(50.0, 20.0)));
    }

    #[test]
    fn second_drag_continues_from_current_pan() {
        let mut view = ViewState::default();
        view.pointer_down(Point::new(0.0, 0.0), PointerButton::Primary, SPACE);
        view.pointer_move(Point::new(10.0, 0.0));
        view.pointer_up();
        view.pointer_down(Point::new(200.0, 200.0), PointerButton::Primary, SPACE);
        view.pointer_move(Point::new(205.0, 200.0));
        assert!(close(view.pan(), Point::new(15.0, 0.0)));
    }

    #[test]
    fn pan_is_clamped() {
        let mut view = ViewState::default();
        view.pointer_down(Point::ZERO, PointerButton::Primary, SPACE);
        view.pointer_move(Point::new(1.0e6, -1.0e6));
        assert!(close(view.pan(), Point::new(2000.0, -2000.0)));
    }

    #[test]
    fn leaving_ends_the_pan() {
        let mut view = ViewState::default();
        view.pointer_down(Point::ZERO, PointerButton::Primary, SPACE);
        assert!(view.is_panning());
        assert!(view.pointer_leave());
        assert!(!view.is_panning());
        assert!(view.pointer().is_none());
    }

    #[test]
    fn reset_is_exact() {
        let mut view = ViewState::default();
        view.zoom_in();
        view.pointer_down(Point::ZERO, PointerButton::Primary, SPACE);
        view.pointer_move(Point::new(33.0, 44.0));
        assert!(view.reset());
        assert_eq!(view.pan(), Point::ZERO);
        assert!((view.zoom() - 1.0).abs() < f64::EPSILON);
        assert!(!view.is_panning());
    }

    #[test]
    fn transform_is_immediate_while_panning() {
        let dims = Dimensions::new(800.0, 600.0);
        let mut view = ViewState::default();
        assert_eq!(view.transform(dims).transition_ms, Some(300));
        view.pointer_down(Point::ZERO, PointerButton::Primary, SPACE);
        assert_eq!(view.transform(dims).transition_ms, None);
    }

    #[test]
    fn invert_undoes_apply() {
        let transform = ViewTransform {
            zoom: 2.5,
            pan: Point::new(-40.0, 12.0),
            origin: Point::new(400.0, 300.0),
            transition_ms: None,
        };
        let p = Point::new(123.0, 456.0);
        assert!(close(transform.invert(transform.apply(p)), p));
        // The origin is fixed under pure zoom.
        let zoom_only = ViewTransform { pan: Point::ZERO, ..transform };
        assert!(close(zoom_only.apply(zoom_only.origin), zoom_only.origin));
    }

    #[test]
    fn parallax_offset_is_normalized_and_clamped() {
        let dims = Dimensions::new(800.0, 600.0);
        let corner = ParallaxOffset::from_pointer(Some(Point::new(800.0, 0.0)), dims);
        assert!(close(corner.0, Point::new(1.0, -1.0)));
        let outside = ParallaxOffset::from_pointer(Some(Point::new(5000.0, 300.0)), dims);
        assert!(close(outside.0, Point::new(1.0, 0.0)));
        let none = ParallaxOffset::from_pointer(None, dims);
        assert_eq!(none.0, Point::ZERO);
        let empty = ParallaxOffset::from_pointer(Some(Point::new(10.0, 10.0)), Dimensions::new(0.0, 0.0));
        assert_eq!(empty.0, Point::ZERO);
    }

    #[test]
    fn deeper_layers_shift_more() {
        let dims = Dimensions::new(800.0, 600.0);
        let mut view = ViewState::default();
        view.pointer_move(Point::new(800.0, 300.0));
        let shifts = view.layer_shifts(dims);
        // offset 1.0 * coefficient * travel 20
        assert!((shifts.background.x - 10.0).abs() < 1e-12);
        assert!((shifts.connectors.x - 5.0).abs() < 1e-12);
        assert!((shifts.satellites.x - 2.0).abs() < 1e-12);
        assert!(shifts.for_layer(Layer::Background).x > shifts.for_layer(Layer::Satellites).x);
    }
}
