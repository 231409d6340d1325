use crate::core::predicates::{
    bounds_fully_inside_polygon, bounds_overlaps_polygon, rect_within, rects_intersect,
};
use geo::BoundingRect;
use geo_types::{Coord, LineString, Rect};

/// An open ring of (longitude, latitude) vertices with its bounding box cached.
///
/// Built by the normaliser, which guarantees at least three vertices, no
/// duplicated closing vertex and no edge wider than 180° of longitude.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    coords: Vec<Coord<f64>>,
    bbox: Rect<f64>,
}

impl Ring {
    /// Returns `None` for an empty vertex list.
    pub(crate) fn new(coords: Vec<Coord<f64>>) -> Option<Self> {
        let bbox = LineString::from(coords.clone()).bounding_rect()?;
        Some(Self { coords, bbox })
    }

    pub fn coords(&self) -> &[Coord<f64>] {
        &self.coords
    }

    pub fn bbox(&self) -> &Rect<f64> {
        &self.bbox
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn fully_contains(&self, rect: &Rect<f64>) -> bool {
        rect_within(rect, &self.bbox) && bounds_fully_inside_polygon(rect, &self.coords)
    }

    pub fn overlaps(&self, rect: &Rect<f64>) -> bool {
        rects_intersect(rect, &self.bbox) && bounds_overlaps_polygon(rect, &self.coords)
    }

    /// Closed `LineString` form, for handing back to geo-types consumers.
    pub fn to_line_string(&self) -> LineString<f64> {
        let mut coords = self.coords.clone();
        if let Some(&first) = coords.first() {
            coords.push(first);
        }
        LineString::from(coords)
    }
}

/// One outer ring plus zero or more hole rings.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalisedPolygon {
    pub outer: Ring,
    pub holes: Vec<Ring>,
}

impl NormalisedPolygon {
    pub fn new(outer: Ring, holes: Vec<Ring>) -> Self {
        Self { outer, holes }
    }

    pub fn bbox(&self) -> &Rect<f64> {
        self.outer.bbox()
    }

    /// Fully inside the outer ring and touching no hole.
    pub fn fully_covers(&self, rect: &Rect<f64>) -> bool {
        self.outer.fully_contains(rect) && !self.holes.iter().any(|hole| hole.overlaps(rect))
    }

    /// Overlaps the outer ring and is not swallowed by a hole.
    pub fn overlaps(&self, rect: &Rect<f64>) -> bool {
        self.outer.overlaps(rect) && !self.holes.iter().any(|hole| hole.fully_contains(rect))
    }
}
