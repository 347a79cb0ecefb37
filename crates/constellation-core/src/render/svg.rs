//! SVG markup backend.
//!
//! Emits geometry and class names only. Colors, glows, and fonts belong to
//! a stylesheet keyed on the classes:
//!
//! - `layer-background`, `layer-connectors`, `layer-pillars`, `layer-satellites`
//! - `pillar`, `satellite`, plus the quest status (`not-started`,
//!   `in-progress`, `completed`)
//! - `hovered`, `focused`, `selected`, and `overlap` for satellites whose
//!   collision resolution gave up

use constellation_types::{Connector, Dimensions, Layer, PlacedPillar, PlacedSatellite, Point, QuestStatus};

use super::Renderer;
use crate::scene::NodeState;
use crate::view::ViewTransform;

/// Builds one SVG document per frame.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    markup: String,
    transform: String,
    layer: Option<Layer>,
    in_viewport: bool,
}

impl SvgRenderer {
    /// An empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The document built by the last `begin`..`finish` pass.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Take the finished document.
    pub fn into_markup(self) -> String {
        self.markup
    }

    /// Close the open layer group and open `layer`'s, entering the zoomed
    /// viewport group before the first non-background layer.
    fn enter(&mut self, layer: Layer) {
        if self.layer == Some(layer) {
            return;
        }
        if self.layer.is_some() {
            self.markup.push_str("</g>");
        }
        if layer != Layer::Background && !self.in_viewport {
            self.markup
                .push_str(&format!("<g class=\"viewport\" transform=\"{}\">", self.transform));
            self.in_viewport = true;
        }
        self.markup
            .push_str(&format!("<g class=\"layer-{}\">", layer_name(layer)));
        self.layer = Some(layer);
    }
}

impl Renderer for SvgRenderer {
    fn begin(&mut self, dimensions: Dimensions, transform: &ViewTransform) {
        let (w, h) = (num(dimensions.width), num(dimensions.height));
        self.markup = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
        );
        // screen = origin + zoom * (p + pan - origin)
        let origin = transform.origin;
        let shift = transform.pan - origin;
        self.transform = format!(
            "translate({} {}) scale({}) translate({} {})",
            num(origin.x),
            num(origin.y),
            num(transform.zoom),
            num(shift.x),
            num(shift.y)
        );
        self.layer = None;
        self.in_viewport = false;
    }

    fn particle(&mut self, position: Point, size: f64, alpha: f64) {
        self.enter(Layer::Background);
        self.markup.push_str(&format!(
            "<circle class=\"star\" cx=\"{}\" cy=\"{}\" r=\"{}\" opacity=\"{}\"/>",
            num(position.x),
            num(position.y),
            num(size),
            num(alpha)
        ));
    }

    fn connector(&mut self, connector: &Connector, from: Point, to: Point) {
        self.enter(Layer::Connectors);
        self.markup.push_str(&format!(
            "<line class=\"connector\" data-satellite=\"{}\" data-pillar=\"{}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke-width=\"{}\"/>",
            escape_xml_attr(connector.satellite.as_str()),
            escape_xml_attr(connector.pillar.as_str()),
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            num(connector.share.mul_add(2.0, 0.5))
        ));
    }

    fn pillar(&mut self, pillar: &PlacedPillar, at: Point, state: NodeState) {
        self.enter(Layer::Pillars);
        self.markup.push_str(&format!(
            "<g class=\"{}\" data-id=\"{}\"><circle cx=\"{}\" cy=\"{}\" r=\"{}\"/><text x=\"{}\" y=\"{}\">{}</text></g>",
            classes("pillar", None, state, false),
            escape_xml_attr(pillar.id.as_str()),
            num(at.x),
            num(at.y),
            num(pillar.radius),
            num(at.x),
            num(at.y + pillar.radius + 14.0),
            escape_xml_text(&pillar.name)
        ));
    }

    fn satellite(&mut self, satellite: &PlacedSatellite, at: Point, state: NodeState) {
        self.enter(Layer::Satellites);
        self.markup.push_str(&format!(
            "<circle class=\"{}\" data-id=\"{}\" cx=\"{}\" cy=\"{}\" r=\"{}\"><title>{}</title></circle>",
            classes("satellite", Some(satellite.status), state, satellite.exhausted),
            escape_xml_attr(satellite.id.as_str()),
            num(at.x),
            num(at.y),
            num(satellite.radius),
            escape_xml_text(&satellite.title)
        ));
    }

    fn finish(&mut self) {
        if self.layer.take().is_some() {
            self.markup.push_str("</g>");
        }
        if self.in_viewport {
            self.markup.push_str("</g>");
            self.in_viewport = false;
        }
        self.markup.push_str("</svg>");
    }
}

const fn layer_name(layer: Layer) -> &'static str {
    match layer {
        Layer::Background => "background",
        Layer::Connectors => "connectors",
        Layer::Pillars => "pillars",
        Layer::Satellites => "satellites",
    }
}

const fn status_class(status: QuestStatus) -> &'static str {
    match status {
        QuestStatus::NotStarted => "not-started",
        QuestStatus::InProgress => "in-progress",
        QuestStatus::Completed => "completed",
    }
}

fn classes(base: &str, status: Option<QuestStatus>, state: NodeState, overlap: bool) -> String {
    let mut out = base.to_owned();
    let flags = [
        (status.map(status_class), true),
        (Some("hovered"), state.hovered),
        (Some("focused"), state.focused),
        (Some("selected"), state.selected),
        (Some("overlap"), overlap),
    ];
    for (class, on) in flags {
        if let (Some(class), true) = (class, on) {
            out.push(' ');
            out.push_str(class);
        }
    }
    out
}

/// Format a coordinate with at most two decimals and no trailing zeros.
fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_owned();
    }
    let text = format!("{value:.2}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Escape text content for XML (inside elements).
fn escape_xml_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape attribute values for XML (inside double-quoted attributes).
fn escape_xml_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use constellation_types::{PillarId, SatelliteId};

    use super::*;
    use crate::render::draw_scene;
    use crate::scene::Scene;
    use crate::timeline::TimelineSnapshot;

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(400.0), "400");
        assert_eq!(num(12.5), "12.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(f64::NAN), "0");
    }

    #[test]
    fn attributes_are_escaped() {
        assert_eq!(escape_xml_attr("a\"<b>&"), "a&quot;&lt;b&gt;&amp;");
        assert_eq!(escape_xml_text("Tom & \"Jerry\""), "Tom &amp; \"Jerry\"");
    }

    #[test]
    fn classes_carry_status_and_state() {
        let state = NodeState {
            hovered: true,
            selected: true,
            ..NodeState::default()
        };
        assert_eq!(
            classes("satellite", Some(QuestStatus::InProgress), state, true),
            "satellite in-progress hovered selected overlap"
        );
        assert_eq!(classes("pillar", None, NodeState::default(), false), "pillar");
    }

    #[test]
    fn document_nests_layers_inside_the_viewport() {
        let now = chrono::Utc::now();
        let scene = Scene {
            dimensions: Dimensions::new(800.0, 600.0),
            pillars: vec![PlacedPillar {
                id: PillarId::new("mind"),
                name: "Mind & Body".to_owned(),
                xp: 0.0,
                index: 0,
                position: Point::new(400.0, 120.0),
                radius: 28.0,
            }],
            satellites: vec![PlacedSatellite {
                id: SatelliteId::new("q\"1"),
                title: "<Read>".to_owned(),
                status: QuestStatus::Completed,
                centroid: Point::new(400.0, 120.0),
                position: Point::new(400.0, 200.0),
                radius: 8.0,
                attempts: 1,
                exhausted: false,
            }],
            connectors: Vec::new(),
            transform: ViewTransform::identity(Point::new(400.0, 300.0)),
            parallax: crate::view::LayerShifts::default(),
            hover: None,
            focused: None,
            selected: None,
            timeline: TimelineSnapshot {
                current: now,
                min: now,
                max: now,
                state: crate::timeline::PlaybackState::Paused,
                progress: 1.0,
                visible: 1,
                total: 1,
            },
        };
        let mut svg = SvgRenderer::new();
        draw_scene(&scene, &mut svg);
        let markup = svg.into_markup();
        assert!(markup.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"800\" height=\"600\""));
        assert!(markup.contains("transform=\"translate(400 300) scale(1) translate(-400 -300)\""));
        assert!(markup.contains("<text x=\"400\" y=\"162\">Mind &amp; Body</text>"));
        assert!(markup.contains("data-id=\"q&quot;1\""));
        assert!(markup.contains("<title>&lt;Read&gt;</title>"));
        assert!(!markup.contains("layer-background"));
        assert_eq!(markup.matches("<g").count(), markup.matches("</g>").count());
        assert!(markup.ends_with("</g></g></svg>"));
    }
}
