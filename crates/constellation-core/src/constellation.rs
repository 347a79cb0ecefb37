//! The stateful constellation view.
//!
//! [`ConstellationView`] is the single owner of all long-lived state: the
//! data snapshot, viewport size, [`ViewState`], [`TimeCursor`], interaction
//! ids, the particle buffer, and the frame handles. Hosts feed it input
//! events and frame callbacks and read back a [`Scene`].
//!
//! Placement is cached. It is recomputed only when something that affects
//! positions changes (snapshot, viewport size, or the visible satellite set),
//! never on pointer movement or zoom.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use constellation_layout::{LayoutConfig, Placement, PushJitter, place};
use constellation_types::{Dimensions, NodeId, Point, Snapshot};
use tracing::{debug, info, warn};

use crate::config::ConstellationConfig;
use crate::frame::{FrameHandle, FrameId, FrameLoop, FrameScheduler};
use crate::input::{InputEvent, PointerButton};
use crate::interaction::{CardPlacement, HoverTarget, Interaction, hit_test, place_card, target_for};
use crate::particles::ParticleField;
use crate::render::{Ambient, Renderer, draw_frame};
use crate::scene::{RelayoutPolicy, Scene, filter_visible};
use crate::timeline::TimeCursor;
use crate::view::ViewState;

/// Placement computed for one visible set.
#[derive(Debug, Default)]
struct LayoutCache {
    /// Full-set placement under [`RelayoutPolicy::Stable`].
    full: Option<Placement>,
    /// What is on screen.
    shown: Placement,
    /// Visible-satellite count `shown` was computed for. Visibility is
    /// monotonic in the cursor, so equal counts mean equal sets.
    visible: Option<usize>,
}

/// The interactive constellation.
pub struct ConstellationView {
    config: ConstellationConfig,
    layout_config: LayoutConfig,
    snapshot: Snapshot,
    dimensions: Dimensions,
    view: ViewState,
    cursor: TimeCursor,
    interaction: Interaction,
    particles: ParticleField,
    jitter: Box<dyn PushJitter>,
    cache: LayoutCache,
    scheduler: Option<Rc<dyn FrameScheduler>>,
    ambient_frame: Option<FrameHandle>,
    autoplay_frame: Option<FrameHandle>,
}

impl ConstellationView {
    /// Create a view over `snapshot`. The time range ends at `now`.
    ///
    /// `config` is validated here as well; an invalid one is replaced by
    /// [`ConstellationConfig::default`] with a warning.
    pub fn new(config: ConstellationConfig, snapshot: Snapshot, dimensions: Dimensions, now: DateTime<Utc>) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!(error = %err, "Invalid constellation config, using defaults");
                ConstellationConfig::default()
            }
        };
        let cursor = TimeCursor::from_satellites(&snapshot.satellites, now, &config.timeline);
        info!(
            pillars = snapshot.pillars.len(),
            satellites = snapshot.satellites.len(),
            width = dimensions.width,
            height = dimensions.height,
            "Constellation view created"
        );
        Self {
            layout_config: config.layout.to_layout_config(),
            jitter: config.layout.build_jitter(),
            view: ViewState::new(config.view.clone()),
            particles: ParticleField::new(&config.ambient),
            interaction: Interaction::default(),
            cache: LayoutCache::default(),
            scheduler: None,
            ambient_frame: None,
            autoplay_frame: None,
            cursor,
            snapshot,
            dimensions,
            config,
        }
    }

    /// Replace the data snapshot. The time range is re-derived and any ids
    /// that no longer exist are dropped from the interaction state.
    pub fn set_snapshot(&mut self, snapshot: Snapshot, now: DateTime<Utc>) {
        debug!(
            pillars = snapshot.pillars.len(),
            satellites = snapshot.satellites.len(),
            "Snapshot replaced"
        );
        self.snapshot = snapshot;
        self.cursor = TimeCursor::from_satellites(&self.snapshot.satellites, now, &self.config.timeline);
        self.autoplay_frame = None;
        self.invalidate();
        self.retain_interaction();
    }

    /// Viewport resized. Positions are re-derived from scratch.
    pub fn resize(&mut self, dimensions: Dimensions) -> bool {
        if dimensions == self.dimensions {
            return false;
        }
        self.dimensions = dimensions;
        self.invalidate();
        true
    }

    /// Apply one input event. Returns whether a redraw is needed.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PointerMove { position } => {
                let moved = self.view.pointer_move(position);
                let hovered = self.pick(position);
                let hover_changed = self.interaction.hover(hovered);
                moved || hover_changed
            }
            InputEvent::PointerDown {
                position,
                button,
                modifiers,
            } => {
                if self.view.pointer_down(position, button, modifiers) {
                    return true;
                }
                if button != PointerButton::Primary {
                    return false;
                }
                let target = self.pick(position);
                self.interaction.select(target)
            }
            InputEvent::PointerUp => self.view.pointer_up(),
            InputEvent::PointerLeave => {
                let ended = self.view.pointer_leave();
                self.interaction.hover(None) || ended
            }
            InputEvent::Wheel { delta_y, modifiers } => self.view.wheel(delta_y, modifiers),
            InputEvent::Pinch { scale } => self.view.pinch(scale),
            InputEvent::Key { key, modifiers } => {
                self.refresh_placement();
                self.interaction.key(key, modifiers, &self.cache.shown)
            }
            InputEvent::ZoomIn => self.view.zoom_in(),
            InputEvent::ZoomOut => self.view.zoom_out(),
            InputEvent::ResetView => self.view.reset(),
            InputEvent::Resize { dimensions } => self.resize(dimensions),
            InputEvent::Scrub { time } => self.scrub_to(time),
            InputEvent::TogglePlay => {
                self.toggle_play();
                true
            }
        }
    }

    /// Move the time cursor, pausing autoplay. Returns whether the cursor
    /// moved or playback stopped.
    pub fn scrub_to(&mut self, time: DateTime<Utc>) -> bool {
        let was_playing = self.cursor.is_playing();
        let moved = self.cursor.scrub_to(time);
        self.sync_autoplay();
        if moved {
            self.retain_interaction();
        }
        moved || (was_playing && !self.cursor.is_playing())
    }

    /// Start or stop autoplay.
    pub fn toggle_play(&mut self) {
        self.cursor.toggle();
        self.sync_autoplay();
    }

    /// Attach to the host frame loop and start the ambient animation.
    pub fn mount(&mut self, scheduler: Rc<dyn FrameScheduler>) {
        self.unmount();
        self.ambient_frame = Some(FrameHandle::acquire(Rc::clone(&scheduler), FrameLoop::Ambient));
        self.scheduler = Some(scheduler);
        self.sync_autoplay();
        debug!("Constellation view mounted");
    }

    /// Release every frame registration.
    pub fn unmount(&mut self) {
        let was_mounted = self.scheduler.take().is_some();
        self.ambient_frame = None;
        self.autoplay_frame = None;
        if was_mounted {
            debug!("Constellation view unmounted");
        }
    }

    /// Whether the view holds a frame scheduler.
    pub const fn is_mounted(&self) -> bool {
        self.scheduler.is_some()
    }

    /// A frame callback fired. `dt` is seconds since the previous frame.
    /// Returns whether a redraw is needed.
    pub fn on_frame(&mut self, id: FrameId, dt: f64) -> bool {
        let mut redraw = false;
        if let Some(handle) = self.ambient_frame.as_mut().filter(|h| h.owns(id)) {
            self.particles.step(dt);
            handle.rearm();
            redraw = true;
        }
        if let Some(handle) = self.autoplay_frame.as_mut().filter(|h| h.owns(id)) {
            let still_playing = self.cursor.advance_frame();
            if still_playing {
                handle.rearm();
            } else {
                self.autoplay_frame = None;
            }
            self.retain_interaction();
            redraw = true;
        }
        redraw
    }

    /// Acquire or release the autoplay frame so it matches the cursor.
    fn sync_autoplay(&mut self) {
        match (&self.scheduler, self.cursor.is_playing(), self.autoplay_frame.is_some()) {
            (Some(scheduler), true, false) => {
                self.autoplay_frame = Some(FrameHandle::acquire(Rc::clone(scheduler), FrameLoop::Autoplay));
            }
            (_, false, true) => self.autoplay_frame = None,
            _ => {}
        }
    }

    fn invalidate(&mut self) {
        self.cache = LayoutCache::default();
    }

    /// Bring the cached placement up to date with the visible set.
    fn refresh_placement(&mut self) {
        let visible = self.cursor.visible_count(&self.snapshot.satellites);
        if self.cache.visible == Some(visible) {
            return;
        }
        let satellites = &self.snapshot.satellites;
        match self.config.timeline.relayout {
            RelayoutPolicy::Rescan => {
                self.cache.shown = place(
                    &self.snapshot.pillars,
                    self.cursor.visible(satellites),
                    self.dimensions,
                    &self.layout_config,
                    &mut *self.jitter,
                );
            }
            RelayoutPolicy::Stable => {
                let full = self.cache.full.get_or_insert_with(|| {
                    place(
                        &self.snapshot.pillars,
                        satellites,
                        self.dimensions,
                        &self.layout_config,
                        &mut *self.jitter,
                    )
                });
                self.cache.shown = filter_visible(full, satellites, &self.cursor);
            }
        }
        self.cache.visible = Some(visible);
    }

    fn retain_interaction(&mut self) {
        self.refresh_placement();
        self.interaction.retain(&self.cache.shown);
    }

    fn pick(&mut self, pointer: Point) -> Option<NodeId> {
        self.refresh_placement();
        let transform = self.view.transform(self.dimensions);
        let shifts = self.view.layer_shifts(self.dimensions);
        hit_test(&self.cache.shown, pointer, &transform, &shifts, self.config.view.hover_slop)
    }

    /// The current placement (pillars and visible satellites).
    pub fn placement(&mut self) -> &Placement {
        self.refresh_placement();
        &self.cache.shown
    }

    /// Compose the scene for the current state.
    pub fn scene(&mut self) -> Scene {
        self.refresh_placement();
        Scene::new(
            self.cache.shown.clone(),
            self.dimensions,
            self.cursor.snapshot(&self.snapshot.satellites),
            &self.view,
            &self.interaction,
        )
    }

    /// Draw one animated frame.
    pub fn render<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        let scene = self.scene();
        let ambient = Ambient {
            field: &self.particles,
            config: &self.config.ambient,
        };
        draw_frame(&scene, ambient, renderer);
    }

    /// The hovered node, anchored on screen.
    pub fn hover_target(&mut self) -> Option<HoverTarget> {
        self.refresh_placement();
        let id = self.interaction.hovered.as_ref()?;
        let transform = self.view.transform(self.dimensions);
        let shifts = self.view.layer_shifts(self.dimensions);
        target_for(&self.cache.shown, id, &transform, &shifts)
    }

    /// Where to put an info card of size `card` for the hovered node.
    pub fn hover_card(&mut self, card: Dimensions) -> Option<CardPlacement> {
        let target = self.hover_target()?;
        Some(place_card(&target, card, self.dimensions, self.config.view.card_gap))
    }

    /// Viewport size.
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Zoom, pan, and pointer state.
    pub const fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// Time cursor.
    pub const fn cursor(&self) -> &TimeCursor {
        &self.cursor
    }

    /// Hover, focus, and selection ids.
    pub const fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Background stars.
    pub const fn particles(&self) -> &ParticleField {
        &self.particles
    }

    /// Data snapshot.
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Configuration.
    pub const fn config(&self) -> &ConstellationConfig {
        &self.config
    }
}

impl std::fmt::Debug for ConstellationView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstellationView")
            .field("dimensions", &self.dimensions)
            .field("view", &self.view)
            .field("cursor", &self.cursor)
            .field("interaction", &self.interaction)
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}
