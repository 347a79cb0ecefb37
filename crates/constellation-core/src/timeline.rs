//! Time cursor: which satellites are visible, and autoplay.
//!
//! The cursor range is derived once from the satellite set:
//!
//! - `min` is the earliest `event_time`, or `now - default_span_days` when
//!   no satellite carries a time.
//! - `max` is `now`.
//!
//! A satellite is visible when its `event_time` is at or before the cursor;
//! satellites without a time are always visible. Visibility is therefore
//! monotonic: moving the cursor forward never hides anything.
//!
//! # Autoplay
//!
//! Two states, paused and playing. While playing, every animation frame
//! advances the cursor by `max((max - min) / autoplay_frames, min_step_days)`.
//! Reaching `max` clamps the cursor there and pauses. Pressing play at the
//! end restarts from `min`.

use chrono::{DateTime, TimeDelta, Utc};
use constellation_types::Satellite;
use serde::Serialize;
use tracing::debug;

use crate::config::TimelineConfig;

/// Errors from constructing a cursor explicitly.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// `min` is after `max`.
    #[error("time range is inverted: min {min} is after max {max}")]
    InvertedRange {
        /// Lower bound.
        min: DateTime<Utc>,
        /// Upper bound.
        max: DateTime<Utc>,
    },
}

/// Autoplay state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// The cursor only moves when scrubbed.
    #[default]
    Paused,
    /// The cursor advances once per animation frame.
    Playing,
}

/// Whether `satellite` is visible with the cursor at `current`.
pub fn is_visible(satellite: &Satellite, current: DateTime<Utc>) -> bool {
    satellite.event_time.is_none_or(|t| t <= current)
}

/// Derive the `(min, max)` cursor range from a satellite set.
pub fn time_bounds(
    satellites: &[Satellite],
    now: DateTime<Utc>,
    default_span_days: i64,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let earliest = satellites.iter().filter_map(|s| s.event_time).min();
    let min = earliest.unwrap_or_else(|| {
        let span = TimeDelta::try_days(default_span_days).unwrap_or(TimeDelta::zero());
        now.checked_sub_signed(span).unwrap_or(now)
    });
    // Events dated in the future must not invert the range.
    (min.min(now), now)
}

/// Autoplay step for a range.
pub fn autoplay_step(
    min: DateTime<Utc>,
    max: DateTime<Utc>,
    frames: u32,
    min_step_days: i64,
) -> TimeDelta {
    let floor = TimeDelta::try_days(min_step_days).unwrap_or(TimeDelta::MAX);
    let frames = i32::try_from(frames.max(1)).unwrap_or(i32::MAX);
    let span = max.signed_duration_since(min);
    (span / frames).max(floor)
}

/// The scrubber position and autoplay state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeCursor {
    /// Current cursor time.
    current: DateTime<Utc>,
    /// Earliest reachable time.
    min: DateTime<Utc>,
    /// Latest reachable time ("now" at derivation).
    max: DateTime<Utc>,
    /// Autoplay state.
    state: PlaybackState,
    /// Autoplay advance per frame.
    step: TimeDelta,
    /// Whether scrubbing pauses autoplay.
    scrub_cancels: bool,
}

impl TimeCursor {
    /// Derive a cursor from a satellite set. The cursor starts at `now`,
    /// so everything up to the present is visible.
    pub fn from_satellites(
        satellites: &[Satellite],
        now: DateTime<Utc>,
        config: &TimelineConfig,
    ) -> Self {
        let (min, max) = time_bounds(satellites, now, config.default_span_days);
        Self {
            current: max,
            min,
            max,
            state: PlaybackState::Paused,
            step: autoplay_step(min, max, config.autoplay_frames, config.min_step_days),
            scrub_cancels: config.scrub_cancels_autoplay,
        }
    }

    /// Create a cursor from explicit parameters (useful for testing and
    /// state restoration). `current` is clamped into the range.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::InvertedRange`] if `min` is after `max`.
    pub fn from_parts(
        min: DateTime<Utc>,
        max: DateTime<Utc>,
        current: DateTime<Utc>,
        config: &TimelineConfig,
    ) -> Result<Self, TimelineError> {
        if min > max {
            return Err(TimelineError::InvertedRange { min, max });
        }
        Ok(Self {
            current: current.clamp(min, max),
            min,
            max,
            state: PlaybackState::Paused,
            step: autoplay_step(min, max, config.autoplay_frames, config.min_step_days),
            scrub_cancels: config.scrub_cancels_autoplay,
        })
    }

    /// Current cursor time.
    pub const fn current(&self) -> DateTime<Utc> {
        self.current
    }

    /// Earliest reachable time.
    pub const fn min(&self) -> DateTime<Utc> {
        self.min
    }

    /// Latest reachable time.
    pub const fn max(&self) -> DateTime<Utc> {
        self.max
    }

    /// Autoplay advance per frame.
    pub const fn step(&self) -> TimeDelta {
        self.step
    }

    /// Autoplay state.
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether autoplay is running.
    pub const fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing)
    }

    /// Cursor position as a fraction of the range, in `[0, 1]`.
    ///
    /// An empty range reports 1.
    pub fn progress(&self) -> f64 {
        let span = self.max.signed_duration_since(self.min).num_milliseconds();
        if span <= 0 {
            return 1.0;
        }
        let offset = self.current.signed_duration_since(self.min).num_milliseconds();
        (i64_to_f64(offset) / i64_to_f64(span)).clamp(0.0, 1.0)
    }

    /// Move the cursor to `time`, clamped into the range.
    ///
    /// Returns whether the cursor moved. Scrubbing pauses autoplay unless
    /// `scrub_cancels_autoplay` is off.
    pub fn scrub_to(&mut self, time: DateTime<Utc>) -> bool {
        if self.scrub_cancels && self.is_playing() {
            self.pause();
        }
        let clamped = time.clamp(self.min, self.max);
        let moved = clamped != self.current;
        self.current = clamped;
        moved
    }

    /// Move the cursor to a fraction of the range. Non-finite fractions are
    /// ignored.
    pub fn scrub_fraction(&mut self, fraction: f64) -> bool {
        if !fraction.is_finite() {
            return false;
        }
        let span = self.max.signed_duration_since(self.min).num_milliseconds();
        let offset = f64_to_i64(i64_to_f64(span) * fraction.clamp(0.0, 1.0));
        let target = self
            .min
            .checked_add_signed(TimeDelta::milliseconds(offset))
            .unwrap_or(self.max);
        self.scrub_to(target)
    }

    /// Start autoplay. At the end of the range playback restarts from `min`.
    pub fn play(&mut self) {
        if self.current >= self.max {
            self.current = self.min;
        }
        self.state = PlaybackState::Playing;
        debug!(from = %self.current, to = %self.max, step_seconds = self.step.num_seconds(), "Autoplay started");
    }

    /// Stop autoplay, leaving the cursor where it is.
    pub fn pause(&mut self) {
        if self.is_playing() {
            debug!(at = %self.current, "Autoplay paused");
        }
        self.state = PlaybackState::Paused;
    }

    /// Toggle between playing and paused. Returns the new state.
    pub fn toggle(&mut self) -> PlaybackState {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
        self.state
    }

    /// Advance one animation frame. Returns whether autoplay is still running.
    pub fn advance_frame(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        let next = self.current.checked_add_signed(self.step).unwrap_or(self.max);
        if next >= self.max {
            self.current = self.max;
            self.state = PlaybackState::Paused;
            debug!(at = %self.current, "Autoplay reached the end");
            return false;
        }
        self.current = next;
        true
    }

    /// Whether `satellite` is visible at the current cursor.
    pub fn is_visible(&self, satellite: &Satellite) -> bool {
        is_visible(satellite, self.current)
    }

    /// Iterate the visible satellites in input order.
    pub fn visible<'a>(&self, satellites: &'a [Satellite]) -> impl Iterator<Item = &'a Satellite> {
        let current = self.current;
        satellites.iter().filter(move |s| is_visible(s, current))
    }

    /// Number of visible satellites.
    pub fn visible_count(&self, satellites: &[Satellite]) -> usize {
        self.visible(satellites).count()
    }

    /// Serializable view of the cursor for the renderer.
    pub fn snapshot(&self, satellites: &[Satellite]) -> TimelineSnapshot {
        TimelineSnapshot {
            current: self.current,
            min: self.min,
            max: self.max,
            state: self.state,
            progress: self.progress(),
            visible: self.visible_count(satellites),
            total: satellites.len(),
        }
    }
}

/// Cursor state as handed to the renderer (slider position, labels).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSnapshot {
    /// Current cursor time.
    pub current: DateTime<Utc>,
    /// Earliest reachable time.
    pub min: DateTime<Utc>,
    /// Latest reachable time.
    pub max: DateTime<Utc>,
    /// Autoplay state.
    pub state: PlaybackState,
    /// Cursor position in `[0, 1]`.
    pub progress: f64,
    /// Number of visible satellites.
    pub visible: usize,
    /// Total number of satellites.
    pub total: usize,
}

#[allow(clippy::cast_precision_loss)]
const fn i64_to_f64(value: i64) -> f64 {
    // Millisecond spans stay far below 2^53.
    value as f64
}

#[allow(clippy::cast_possible_truncation)]
fn f64_to_i64(value: f64) -> i64 {
    value.round() as i64
}
