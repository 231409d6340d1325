use geo_types::{Coord, Point, coord};

/// Trait for types that can provide longitude/latitude.
///
/// Implemented for `(f64, f64)` tuples (longitude first), `geo_types::Point<f64>`
/// and `geo_types::Coord<f64>`, so cell constructors accept any of them.
pub trait Coordinate {
    /// Returns the longitude (x).
    fn lon(&self) -> f64;
    /// Returns the latitude (y).
    fn lat(&self) -> f64;

    fn to_coord(&self) -> Coord<f64> {
        coord! { x: self.lon(), y: self.lat() }
    }
}

impl Coordinate for (f64, f64) {
    fn lon(&self) -> f64 {
        self.0
    }
    fn lat(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn lon(&self) -> f64 {
        self.x()
    }
    fn lat(&self) -> f64 {
        self.y()
    }
}

impl Coordinate for Coord<f64> {
    fn lon(&self) -> f64 {
        self.x
    }
    fn lat(&self) -> f64 {
        self.y
    }
}
