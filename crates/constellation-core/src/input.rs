//! Raw input events delivered by the host window.
//!
//! The host translates its native events (DOM, winit, egui, ...) into
//! [`InputEvent`] values and feeds them to the view one at a time, in the
//! order they were dispatched.

use chrono::{DateTime, Utc};
use constellation_types::{Dimensions, Point};
use serde::{Deserialize, Serialize};

/// A modifier key that can gate pan or zoom gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKey {
    /// No modifier required.
    None,
    /// Shift.
    Shift,
    /// Control, or Command on macOS.
    Ctrl,
    /// Alt / Option.
    Alt,
    /// The space bar held down.
    Space,
}

/// Modifier keys held when an event fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    /// Shift held.
    #[serde(default)]
    pub shift: bool,
    /// Control held.
    #[serde(default)]
    pub ctrl: bool,
    /// Alt / Option held.
    #[serde(default)]
    pub alt: bool,
    /// Meta / Command held.
    #[serde(default)]
    pub meta: bool,
    /// Space bar held.
    #[serde(default)]
    pub space: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
        space: false,
    };

    /// Whether `key` is held. [`ModifierKey::Ctrl`] also accepts Meta.
    pub const fn holds(self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::None => true,
            ModifierKey::Shift => self.shift,
            ModifierKey::Ctrl => self.ctrl || self.meta,
            ModifierKey::Alt => self.alt,
            ModifierKey::Space => self.space,
        }
    }
}

/// Mouse or pen button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Left mouse button, pen contact, or a single touch.
    Primary,
    /// Right mouse button.
    Secondary,
    /// Middle mouse button.
    Middle,
}

/// Keys used for accessible navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Arrow up.
    ArrowUp,
    /// Arrow down.
    ArrowDown,
    /// Arrow left.
    ArrowLeft,
    /// Arrow right.
    ArrowRight,
    /// Tab (Shift reverses).
    Tab,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
}

/// One input event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer moved to `position`.
    PointerMove {
        /// Pointer position.
        position: Point,
    },
    /// A button went down.
    PointerDown {
        /// Pointer position.
        position: Point,
        /// Which button.
        button: PointerButton,
        /// Held modifiers.
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// A button was released.
    PointerUp,
    /// The pointer left the interactive region.
    PointerLeave,
    /// Wheel scrolled by `delta_y` (negative is away from the user).
    Wheel {
        /// Vertical scroll delta.
        delta_y: f64,
        /// Held modifiers.
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Two-finger pinch changed scale by this factor since the last event.
    Pinch {
        /// Relative scale factor (greater than 1 zooms in).
        scale: f64,
    },
    /// Navigation key pressed.
    Key {
        /// The key.
        key: Key,
        /// Held modifiers.
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Zoom-in button.
    ZoomIn,
    /// Zoom-out button.
    ZoomOut,
    /// Reset-view button.
    ResetView,
    /// Host viewport resized.
    Resize {
        /// New viewport size.
        dimensions: Dimensions,
    },
    /// Time slider moved.
    Scrub {
        /// New cursor time.
        time: DateTime<Utc>,
    },
    /// Play/pause button.
    TogglePlay,
}
