// SPDX-License-Identifier: GPL-3.0-only

//! Key cap outlines and the keyboard's outline registry.
//!
//! Many keys share the same cap shape (every 1u key, for example), so the
//! keyboard interns outlines in an [`OutlineTable`] and keys refer to them by
//! [`OutlineId`]. Ids are dense and 1-based; `0` means "no outline". The
//! table only grows, so an id stays valid for the keyboard's lifetime.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::geometry::{Bounds, Point};

/// Integer reference into the outline table ("oref").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutlineId(pub u32);

impl OutlineId {
    /// The "no outline" reference.
    pub const NONE: OutlineId = OutlineId(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for OutlineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oref:{}", self.0)
    }
}

/// A rounded polygon describing a key cap.
///
/// Points are relative to the key's own origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outline {
    corner_radius: f64,
    points: Vec<Point>,
}

impl Outline {
    /// Creates an outline, checking that it has at least three points and
    /// that its edges do not cross each other.
    pub fn new(corner_radius: f64, points: Vec<Point>) -> Result<Self, ModelError> {
        if points.len() < 3 {
            return Err(ModelError::invalid_outline(format!(
                "polygon needs at least 3 points, got {}",
                points.len()
            )));
        }
        if !corner_radius.is_finite() || corner_radius < 0.0 {
            return Err(ModelError::invalid_outline(format!(
                "corner radius must be a non-negative number, got {}",
                corner_radius
            )));
        }
        if let Some((a, b)) = first_crossing(&points) {
            return Err(ModelError::invalid_outline(format!(
                "edges {} and {} intersect",
                a, b
            )));
        }
        Ok(Self {
            corner_radius,
            points,
        })
    }

    /// Axis-aligned rectangle outline, the common case for plain keys.
    pub fn rectangle(width: f64, height: f64, corner_radius: f64) -> Result<Self, ModelError> {
        Self::new(corner_radius, Bounds::new(0.0, 0.0, width, height).corners().to_vec())
    }

    pub fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn bounding_box(&self) -> Bounds {
        // `new` guarantees at least three points.
        Bounds::enclosing(&self.points).unwrap_or_default()
    }

    /// Copy with every point and the corner radius multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            corner_radius: self.corner_radius * factor,
            points: self.points.iter().map(|p| p.scaled(factor)).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for Outline {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            corner_radius: f64,
            points: Vec<Point>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Outline::new(raw.corner_radius, raw.points).map_err(serde::de::Error::custom)
    }
}

/// Returns the indices of the first pair of non-adjacent edges that cross.
fn first_crossing(points: &[Point]) -> Option<(usize, usize)> {
    let n = points.len();
    let edge = |i: usize| (points[i], points[(i + 1) % n]);

    for i in 0..n {
        for j in (i + 1)..n {
            // Adjacent edges share a vertex by construction.
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let (a, b) = edge(i);
            let (c, d) = edge(j);
            if segments_cross(a, b, c, d) {
                return Some((i, j));
            }
        }
    }
    None
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn segments_cross(a: Point, b: Point, c: Point, d: Point) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    if ((o1 > 0.0 && o2 < 0.0) || (o1 < 0.0 && o2 > 0.0))
        && ((o3 > 0.0 && o4 < 0.0) || (o3 < 0.0 && o4 > 0.0))
    {
        return true;
    }

    (o1 == 0.0 && on_segment(a, b, c))
        || (o2 == 0.0 && on_segment(a, b, d))
        || (o3 == 0.0 && on_segment(c, d, a))
        || (o4 == 0.0 && on_segment(c, d, b))
}

/// Registry of outlines owned by a keyboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlineTable {
    outlines: Vec<Outline>,
}

impl OutlineTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a copy of `outline` and returns its id (the new table length).
    pub fn add(&mut self, outline: &Outline) -> OutlineId {
        self.outlines.push(outline.clone());
        OutlineId(self.outlines.len() as u32)
    }

    /// Looks up an outline. Id `0` and ids past the end miss.
    pub fn get(&self, id: OutlineId) -> Option<&Outline> {
        if id.is_none() {
            return None;
        }
        self.outlines.get(id.0 as usize - 1)
    }

    pub fn len(&self) -> usize {
        self.outlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }

    /// Iterates `(id, outline)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (OutlineId, &Outline)> {
        self.outlines
            .iter()
            .enumerate()
            .map(|(i, o)| (OutlineId(i as u32 + 1), o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Outline {
        Outline::rectangle(10.0, 10.0, 1.0).unwrap()
    }

    /// Test 1: ids are dense and 1-based, 0 and N+1 miss
    #[test]
    fn test_outline_ids_are_dense() {
        let mut table = OutlineTable::new();
        let ids: Vec<OutlineId> = (0..5).map(|_| table.add(&square())).collect();

        assert_eq!(
            ids,
            (1..=5).map(OutlineId).collect::<Vec<_>>(),
            "ids should be assigned 1..N without gaps"
        );
        assert!(table.get(OutlineId::NONE).is_none());
        assert!(table.get(OutlineId(6)).is_none());
        assert!(table.get(OutlineId(3)).is_some());
    }

    /// Test 2: the table keeps its own copy
    #[test]
    fn test_add_copies_outline() {
        let mut table = OutlineTable::new();
        let outline = square();
        let id = table.add(&outline);
        drop(outline);
        assert_eq!(table.get(id).unwrap().num_points(), 4);
    }

    #[test]
    fn test_rejects_degenerate_polygons() {
        let err = Outline::new(0.0, vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        assert!(matches!(err, Err(ModelError::InvalidOutline { .. })));

        let bowtie = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        assert!(Outline::new(0.0, bowtie).is_err(), "self-intersecting polygon");

        assert!(Outline::rectangle(10.0, 10.0, -1.0).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Outline = serde_json::from_str(
            r#"{"corner_radius": 2.0, "points": [{"x":0,"y":0},{"x":4,"y":0},{"x":4,"y":4}]}"#,
        )
        .unwrap();
        assert_eq!(ok.corner_radius(), 2.0);

        let bad = serde_json::from_str::<Outline>(r#"{"points": [{"x":0,"y":0}]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_scaled_outline() {
        let outline = square().scaled(2.0);
        assert_eq!(outline.bounding_box(), Bounds::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(outline.corner_radius(), 2.0);
    }
}
