//! Planar geometry primitives in screen pixels.
//!
//! The layout engine works in a y-down screen coordinate system with the
//! origin at the top-left corner of the viewport, matching what canvas and
//! SVG renderers expect.

use core::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A point (or displacement vector) in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downward).
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit-free vector of length `radius` pointing at `angle` radians.
    ///
    /// Angle 0 points right and positive angles turn clockwise on screen.
    pub fn from_polar(radius: f64, angle: f64) -> Self {
        Self {
            x: radius * angle.cos(),
            y: radius * angle.sin(),
        }
    }

    /// Euclidean length of the vector.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Angle of the vector in radians, `atan2(y, x)`.
    ///
    /// The zero vector has angle 0.
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Whether both coordinates are finite.
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise clamp.
    pub const fn clamp(self, min: Self, max: Self) -> Self {
        Self {
            x: self.x.clamp(min.x, max.x),
            y: self.y.clamp(min.y, max.y),
        }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Size of the viewport (or of any rectangle, such as an info card).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Dimensions {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Dimensions {
    /// Create dimensions. Negative or non-finite sides are treated as zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: sanitize_side(width),
            height: sanitize_side(height),
        }
    }

    /// Center of the rectangle anchored at the origin.
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// The shorter of the two sides.
    pub const fn min_side(self) -> f64 {
        self.width.min(self.height)
    }

    /// Whether either side is zero.
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether `point` lies inside the rectangle anchored at the origin.
    pub fn contains(self, point: Point) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

fn sanitize_side(side: f64) -> f64 {
    if side.is_finite() && side > 0.0 { side } else { 0.0 }
}
