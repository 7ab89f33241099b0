// SPDX-License-Identifier: GPL-3.0-only

//! Points, bounding boxes and rotation helpers shared by the model and the
//! renderer.

use serde::{Deserialize, Serialize};

/// A 2D vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotates the point about the origin by `angle` degrees.
    ///
    /// Positive angles turn clockwise on screen (y grows downwards).
    #[must_use]
    pub fn rotated(self, angle: f64) -> Self {
        if angle == 0.0 {
            return self;
        }
        let (sin, cos) = angle.to_radians().sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle relative to the parent element's origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The longer of width and height.
    pub fn long_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Corners in drawing order: top-left, top-right, bottom-right,
    /// bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x <= self.x + self.width
            && point.y <= self.y + self.height
    }

    /// Returns `true` when the interiors of both rectangles overlap.
    /// Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Smallest axis-aligned box holding every point, or `None` for an empty
    /// slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min, mut max) = (*first, *first);
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// Compares two boxes component-wise within `epsilon`.
    pub fn approx_eq(&self, other: &Bounds, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.width - other.width).abs() <= epsilon
            && (self.height - other.height).abs() <= epsilon
    }
}

/// Direction in which the keys of a section row are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    #[default]
    Horizontal,
}

/// Signed area test used for point-in-triangle checks.
///
/// The result is positive, negative or zero depending on which side of the
/// line `b -> c` the point `a` lies.
pub fn sign(a: Point, b: Point, c: Point) -> f64 {
    (a.x - c.x) * (b.y - c.y) - (b.x - c.x) * (a.y - c.y)
}

/// Returns `true` if `point` lies inside or on the edge of the triangle.
///
/// The three edge signs must agree; a zero sign (point on an edge) agrees
/// with either side.
pub fn point_in_triangle(point: Point, a: Point, b: Point, c: Point) -> bool {
    let d1 = sign(point, a, b);
    let d2 = sign(point, b, c);
    let d3 = sign(point, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}

/// Tests a point against a quad by splitting it into triangles
/// `(q0, q1, q2)` and `(q2, q3, q0)`.
pub fn point_in_quad(point: Point, quad: &[Point; 4]) -> bool {
    point_in_triangle(point, quad[0], quad[1], quad[2])
        || point_in_triangle(point, quad[2], quad[3], quad[0])
}
