//! Stateful view behaviour driven the way a host drives it: input events,
//! frame callbacks, mount and unmount.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use constellation_core::{
    ConstellationConfig, ConstellationView, FrameId, FrameScheduler, InputEvent, Key, Modifiers,
    PlaybackState, PointerButton, SvgRenderer,
};
use constellation_types::{Dimensions, NodeId, Pillar, PillarId, Point, Satellite, SatelliteId, Snapshot};

/// Host frame loop that records live requests.
#[derive(Default)]
struct Host {
    next: RefCell<u64>,
    live: RefCell<BTreeSet<FrameId>>,
}

impl Host {
    fn live(&self) -> Vec<FrameId> {
        self.live.borrow().iter().copied().collect()
    }

    /// Fire every live frame once, like one tick of the host loop.
    fn tick(&self, view: &mut ConstellationView) -> bool {
        let due = self.live();
        self.live.borrow_mut().clear();
        let mut redraw = false;
        for id in due {
            redraw |= view.on_frame(id, 1.0 / 60.0);
        }
        redraw
    }
}

impl FrameScheduler for Host {
    fn request_frame(&self) -> FrameId {
        let mut next = self.next.borrow_mut();
        *next += 1;
        let id = FrameId(*next);
        self.live.borrow_mut().insert(id);
        id
    }

    fn cancel_frame(&self, id: FrameId) {
        self.live.borrow_mut().remove(&id);
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap()
}

fn snapshot() -> Snapshot {
    let pillars = (0..5)
        .map(|i| Pillar::new(format!("pillar_{i}"), format!("Pillar {i}"), 0.0))
        .collect();
    let satellites = (0..10)
        .map(|i| {
            Satellite::new(format!("quest-{i}"), format!("Quest {i}"), 100.0)
                .with_xp(format!("pillar_{}", i % 5), 100.0)
                .at(now() - TimeDelta::days(300 - i * 30))
        })
        .collect();
    Snapshot { pillars, satellites }
}

fn seeded_config() -> ConstellationConfig {
    ConstellationConfig::parse("layout:\n  jitter: seeded\n  jitter_seed: 5\n").unwrap()
}

fn view() -> ConstellationView {
    ConstellationView::new(seeded_config(), snapshot(), Dimensions::new(1000.0, 800.0), now())
}

#[test]
fn new_view_shows_everything_up_to_now() {
    let mut view = view();
    let scene = view.scene();
    assert_eq!(scene.pillars.len(), 5);
    assert_eq!(scene.satellites.len(), 10);
    assert_eq!(scene.timeline.state, PlaybackState::Paused);
    assert!((scene.timeline.progress - 1.0).abs() < 1e-12);
}

#[test]
fn mount_and_unmount_release_every_frame() {
    let host = Rc::new(Host::default());
    let mut view = view();
    view.mount(host.clone());
    assert_eq!(host.live().len(), 1);

    view.handle(InputEvent::TogglePlay);
    assert_eq!(host.live().len(), 2);

    view.unmount();
    assert!(host.live().is_empty());
    assert!(!view.is_mounted());
}

#[test]
fn dropping_the_view_releases_its_frames() {
    let host = Rc::new(Host::default());
    {
        let mut view = view();
        view.mount(host.clone());
        view.toggle_play();
        assert_eq!(host.live().len(), 2);
    }
    assert!(host.live().is_empty());
}

#[test]
fn autoplay_runs_to_the_end_and_releases_its_frame() {
    let host = Rc::new(Host::default());
    let mut view = view();
    view.mount(host.clone());
    view.toggle_play();
    assert_eq!(view.cursor().current(), view.cursor().min());
    assert_eq!(view.scene().satellites.len(), 1);

    let mut previous = 0;
    let mut ticks = 0;
    while view.cursor().is_playing() {
        assert!(host.tick(&mut view));
        let visible = view.scene().satellites.len();
        assert!(visible >= previous, "satellites vanished during autoplay");
        previous = visible;
        ticks += 1;
        assert!(ticks < 1000, "autoplay did not finish");
    }
    assert_eq!(view.cursor().current(), view.cursor().max());
    assert_eq!(previous, 10);
    // Only the ambient loop is left.
    assert_eq!(host.live().len(), 1);
}

#[test]
fn scrubbing_pauses_autoplay_and_releases_its_frame() {
    let host = Rc::new(Host::default());
    let mut view = view();
    view.mount(host.clone());
    view.toggle_play();
    assert_eq!(host.live().len(), 2);

    let target = now() - TimeDelta::days(100);
    assert!(view.handle(InputEvent::Scrub { time: target }));
    assert!(!view.cursor().is_playing());
    assert_eq!(host.live().len(), 1);
    assert_eq!(view.cursor().current(), target);
}

#[test]
fn scrubbing_to_the_current_time_still_reports_the_pause() {
    let host = Rc::new(Host::default());
    let mut view = view();
    view.mount(host.clone());
    view.toggle_play();
    assert_eq!(host.live().len(), 2);

    let here = view.cursor().current();
    assert!(view.handle(InputEvent::Scrub { time: here }));
    assert!(!view.cursor().is_playing());
    assert_eq!(view.scene().timeline.state, PlaybackState::Paused);
    assert_eq!(host.live().len(), 1);

    // Paused and in place: nothing left to redraw.
    assert!(!view.handle(InputEvent::Scrub { time: here }));
}

#[test]
fn scrubbing_far_past_the_range_clamps() {
    let mut view = view();
    view.handle(InputEvent::Scrub {
        time: now() - TimeDelta::days(10_000),
    });
    assert_eq!(view.cursor().current(), view.cursor().min());
    view.handle(InputEvent::Scrub {
        time: now() + TimeDelta::days(10_000),
    });
    assert_eq!(view.cursor().current(), view.cursor().max());
}

#[test]
fn zoom_events_stay_in_range_and_reset_is_exact() {
    let mut view = view();
    for _ in 0..50 {
        view.handle(InputEvent::ZoomIn);
        view.handle(InputEvent::Wheel {
            delta_y: -1.0,
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
        });
        view.handle(InputEvent::Pinch { scale: 1.5 });
    }
    assert!((view.view_state().zoom() - 3.0).abs() < 1e-12);
    for _ in 0..50 {
        view.handle(InputEvent::ZoomOut);
    }
    assert!((view.view_state().zoom() - 0.5).abs() < 1e-12);

    let space = Modifiers {
        space: true,
        ..Modifiers::NONE
    };
    view.handle(InputEvent::PointerDown {
        position: Point::new(10.0, 10.0),
        button: PointerButton::Primary,
        modifiers: space,
    });
    view.handle(InputEvent::PointerMove {
        position: Point::new(60.0, 30.0),
    });
    assert!(view.scene().transform.transition_ms.is_none());
    view.handle(InputEvent::PointerUp);
    assert!(view.scene().transform.transition_ms.is_some());

    assert!(view.handle(InputEvent::ResetView));
    assert!((view.view_state().zoom() - 1.0).abs() < f64::EPSILON);
    assert_eq!(view.view_state().pan(), Point::ZERO);
}

#[test]
fn inverted_zoom_bounds_fall_back_to_defaults() {
    let mut config = seeded_config();
    config.view.min_zoom = 3.0;
    config.view.max_zoom = 0.5;
    let mut view = ConstellationView::new(config, snapshot(), Dimensions::new(1000.0, 800.0), now());
    assert!((view.config().view.min_zoom - 0.5).abs() < f64::EPSILON);
    assert!((view.config().view.max_zoom - 3.0).abs() < f64::EPSILON);

    view.handle(InputEvent::ZoomIn);
    view.handle(InputEvent::ResetView);
    assert!((view.view_state().zoom() - 1.0).abs() < f64::EPSILON);
    assert_eq!(view.scene().satellites.len(), 10);
}

#[test]
fn pointer_and_zoom_do_not_move_satellites() {
    let mut view = view();
    let before = view.scene().satellites;
    view.handle(InputEvent::ZoomIn);
    view.handle(InputEvent::PointerMove {
        position: Point::new(900.0, 100.0),
    });
    let after = view.scene().satellites;
    assert_eq!(before, after);
}

#[test]
fn hovering_a_pillar_yields_a_card_inside_the_viewport() {
    let mut view = view();
    let top = view
        .placement()
        .pillar(&PillarId::new("pillar_0"))
        .unwrap()
        .position;
    // Hit testing accounts for the parallax shift the pointer itself causes.
    view.handle(InputEvent::PointerMove { position: top });
    assert_eq!(
        view.interaction().hovered,
        Some(NodeId::Pillar(PillarId::new("pillar_0")))
    );
    let card = view.hover_card(Dimensions::new(240.0, 120.0)).unwrap();
    assert!(card.origin.x >= 0.0 && card.origin.x + 240.0 <= 1000.0);
    assert!(card.origin.y >= 0.0 && card.origin.y + 120.0 <= 800.0);

    view.handle(InputEvent::PointerLeave);
    assert!(view.interaction().hovered.is_none());
    assert!(view.hover_card(Dimensions::new(240.0, 120.0)).is_none());
}

#[test]
fn clicking_selects_and_escape_clears() {
    let mut view = view();
    let sat = view
        .placement()
        .satellite(&SatelliteId::new("quest-3"))
        .unwrap()
        .position;
    view.handle(InputEvent::PointerMove { position: sat });
    let hovered = view.interaction().hovered.clone();
    assert!(hovered.is_some());
    view.handle(InputEvent::PointerDown {
        position: sat,
        button: PointerButton::Primary,
        modifiers: Modifiers::NONE,
    });
    assert_eq!(view.interaction().selected, hovered);
    view.handle(InputEvent::Key {
        key: Key::Escape,
        modifiers: Modifiers::NONE,
    });
    assert!(view.interaction().selected.is_none());
}

#[test]
fn scrubbing_back_drops_hidden_selection() {
    let mut view = view();
    view.handle(InputEvent::Key {
        key: Key::Tab,
        modifiers: Modifiers {
            shift: true,
            ..Modifiers::NONE
        },
    });
    // Shift+Tab from nothing focuses the last satellite.
    assert_eq!(
        view.interaction().focused,
        Some(NodeId::Satellite(SatelliteId::new("quest-9")))
    );
    view.handle(InputEvent::Key {
        key: Key::Enter,
        modifiers: Modifiers::NONE,
    });
    assert!(view.interaction().selected.is_some());

    view.handle(InputEvent::Scrub {
        time: now() - TimeDelta::days(200),
    });
    assert!(view.interaction().selected.is_none());
    assert!(view.interaction().focused.is_none());
}

#[test]
fn resize_recenters_the_ring() {
    let mut view = view();
    let before = view.scene().pillars[0].position;
    assert!(view.handle(InputEvent::Resize {
        dimensions: Dimensions::new(600.0, 600.0),
    }));
    let after = view.scene().pillars[0].position;
    assert!((before.x - 500.0).abs() < 1e-9);
    assert!((after.x - 300.0).abs() < 1e-9);
    assert!(!view.resize(Dimensions::new(600.0, 600.0)));
}

#[test]
fn stable_relayout_keeps_positions_while_scrubbing() {
    let mut config = seeded_config();
    config.timeline.relayout = constellation_core::RelayoutPolicy::Stable;
    let mut view = ConstellationView::new(config, snapshot(), Dimensions::new(1000.0, 800.0), now());
    let full = view.scene().satellites;
    view.scrub_to(now() - TimeDelta::days(150));
    let partial = view.scene().satellites;
    assert!(partial.len() < full.len());
    for sat in &partial {
        let same = full.iter().find(|s| s.id == sat.id).unwrap();
        assert_eq!(same.position, sat.position);
    }
}

#[test]
fn render_produces_a_complete_svg_document() {
    let mut view = view();
    let mut svg = SvgRenderer::new();
    view.render(&mut svg);
    let markup = svg.into_markup();
    assert!(markup.starts_with("<svg"));
    assert!(markup.ends_with("</svg>"));
    assert_eq!(markup.matches("class=\"star\"").count(), 120);
    assert_eq!(markup.matches("data-id=\"quest-").count(), 10);
}
