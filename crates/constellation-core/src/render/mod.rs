//! Backend-agnostic drawing.
//!
//! A [`Scene`] is walked back to front and handed to a [`Renderer`] one
//! primitive at a time. Backends (canvas, DOM, SVG, a GPU painter) only
//! implement the trait; they never see the layout or view state directly.
//!
//! # Submodules
//!
//! - [`svg`] -- Geometry-only SVG markup backend.

pub mod svg;

use constellation_types::{
    Connector, Dimensions, NodeId, PlacedPillar, PlacedSatellite, Point, SatelliteId,
};

use crate::config::AmbientConfig;
use crate::particles::{ParticleField, bob_offset};
use crate::scene::{NodeState, Scene};
use crate::view::ViewTransform;

/// A drawing backend.
///
/// Calls arrive in layer order: `begin`, background particles, connectors,
/// pillars, satellites, `finish`. Node and connector positions are in
/// layout space with parallax and bob already applied; the backend applies
/// the transform it was given in `begin`. Particles are in screen space.
pub trait Renderer {
    /// Start a frame.
    fn begin(&mut self, dimensions: Dimensions, transform: &ViewTransform);

    /// One background star. Backends without a star field can ignore it.
    fn particle(&mut self, _position: Point, _size: f64, _alpha: f64) {}

    /// A satellite-to-pillar link between two points.
    fn connector(&mut self, connector: &Connector, from: Point, to: Point);

    /// A pillar node drawn at `at`.
    fn pillar(&mut self, pillar: &PlacedPillar, at: Point, state: NodeState);

    /// A satellite node drawn at `at`.
    fn satellite(&mut self, satellite: &PlacedSatellite, at: Point, state: NodeState);

    /// End the frame.
    fn finish(&mut self);
}

/// Decorative motion to mix into a frame.
#[derive(Debug, Clone, Copy)]
pub struct Ambient<'a> {
    /// Background stars.
    pub field: &'a ParticleField,
    /// Bob amplitude and speed.
    pub config: &'a AmbientConfig,
}

/// Draw the static geometry of `scene`: no stars, no bob.
pub fn draw_scene<R: Renderer + ?Sized>(scene: &Scene, renderer: &mut R) {
    draw(scene, None, renderer);
}

/// Draw one animated frame: stars behind the scene and satellites bobbing
/// by the field's elapsed time.
pub fn draw_frame<R: Renderer + ?Sized>(scene: &Scene, ambient: Ambient<'_>, renderer: &mut R) {
    draw(scene, Some(ambient), renderer);
}

fn draw<R: Renderer + ?Sized>(scene: &Scene, ambient: Option<Ambient<'_>>, renderer: &mut R) {
    renderer.begin(scene.dimensions, &scene.transform);
    let shifts = &scene.parallax;

    if let Some(ambient) = ambient {
        for particle in ambient.field.particles() {
            let at = particle.screen_position(scene.dimensions) + shifts.background;
            renderer.particle(at, particle.size, particle.alpha());
        }
    }

    let bob = |id: &SatelliteId| {
        ambient.map_or(Point::ZERO, |a| {
            Point::new(0.0, bob_offset(id, a.field.elapsed(), a.config))
        })
    };

    for connector in &scene.connectors {
        let from = connector.from + bob(&connector.satellite) + shifts.connectors;
        let to = connector.to + shifts.connectors;
        renderer.connector(connector, from, to);
    }
    for pillar in &scene.pillars {
        let state = scene.node_state(&NodeId::Pillar(pillar.id.clone()));
        renderer.pillar(pillar, pillar.position + shifts.pillars, state);
    }
    for satellite in &scene.satellites {
        let state = scene.node_state(&NodeId::Satellite(satellite.id.clone()));
        let at = satellite.position + bob(&satellite.id) + shifts.satellites;
        renderer.satellite(satellite, at, state);
    }
    renderer.finish();
}
