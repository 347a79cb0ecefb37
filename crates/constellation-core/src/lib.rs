//! Time cursor, view transform, interaction, and scene composition for the
//! skill constellation.
//!
//! This crate sits between the layout engine and a renderer. It owns every
//! piece of long-lived view state and turns input events and frame
//! callbacks into [`Scene`] values that any backend can draw.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `constellation.yaml` into
//!   strongly-typed structs.
//! - [`constellation`] -- [`ConstellationView`], the stateful owner of the
//!   whole pipeline.
//! - [`frame`] -- [`FrameScheduler`] trait and the scoped [`FrameHandle`].
//! - [`input`] -- Input events delivered by the host.
//! - [`interaction`] -- Hit testing, hover cards, focus, and selection.
//! - [`particles`] -- Background star field and satellite bob.
//! - [`render`] -- [`Renderer`] trait, draw order, and the SVG backend.
//! - [`scene`] -- Visible-set placement and scene composition.
//! - [`timeline`] -- [`TimeCursor`] visibility filter and autoplay.
//! - [`view`] -- Zoom, pan, and parallax.

pub mod config;
pub mod constellation;
pub mod frame;
pub mod input;
pub mod interaction;
pub mod particles;
pub mod render;
pub mod scene;
pub mod timeline;
pub mod view;

// Re-export primary types at crate root.
pub use config::{ConfigError, ConstellationConfig};
pub use constellation::ConstellationView;
pub use frame::{FrameHandle, FrameId, FrameLoop, FrameScheduler};
pub use input::{InputEvent, Key, ModifierKey, Modifiers, PointerButton};
pub use interaction::{CardPlacement, HoverTarget, Interaction, hit_test, place_card};
pub use particles::{ParticleField, bob_offset};
pub use render::svg::SvgRenderer;
pub use render::{Renderer, draw_frame, draw_scene};
pub use scene::{NodeState, RelayoutPolicy, Scene, compose_scene, layout_visible};
pub use timeline::{PlaybackState, TimeCursor, TimelineError, TimelineSnapshot};
pub use view::{LayerShifts, ParallaxOffset, ViewState, ViewTransform};
