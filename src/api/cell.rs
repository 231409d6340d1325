use crate::core::grid::{Geohash, Grid, decode_bounds, encode, parent};
use crate::util::coord::Coordinate;
use crate::util::error::Result;
use geo_types::{Point, Polygon, Rect};

/// A single geohash cell.
///
/// # Example
///
/// ```
/// use geohash_cover::GeohashCell;
///
/// # fn main() -> Result<(), geohash_cover::CoverError> {
/// let cell = GeohashCell::from_wgs84(&(-0.1278, 51.5074), 6)?;
/// assert_eq!(cell.id, "gcpvj0");
///
/// let polygon = cell.to_polygon();
/// assert_eq!(polygon.exterior().coords().count(), 5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeohashCell {
    /// Geohash string; its length is the precision
    pub id: String,
    /// Rectangle covered by the cell (x = longitude, y = latitude)
    pub bounds: Rect<f64>,
}

impl GeohashCell {
    /// Create a GeohashCell from an existing id, validating it.
    pub fn from_id(id: &str) -> Result<Self> {
        let bounds = decode_bounds(id)?;
        Ok(Self {
            id: id.to_string(),
            bounds,
        })
    }

    /// Create the cell containing a WGS84 (lon/lat) coordinate.
    ///
    /// # Example
    /// ```
    /// use geohash_cover::GeohashCell;
    /// use geo_types::Point;
    ///
    /// # fn main() -> Result<(), geohash_cover::CoverError> {
    /// let from_tuple = GeohashCell::from_wgs84(&(-2.248, 53.481), 7)?;
    /// let from_point = GeohashCell::from_wgs84(&Point::new(-2.248, 53.481), 7)?;
    /// assert_eq!(from_tuple, from_point);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_wgs84(coord: &impl Coordinate, precision: u8) -> Result<Self> {
        let id = encode(coord.to_coord(), precision as usize)?;
        Self::from_id(&id)
    }

    pub fn precision(&self) -> usize {
        self.id.len()
    }

    pub fn center(&self) -> Point<f64> {
        Point::from(self.bounds.center())
    }

    /// Returns the cell rectangle as a closed `geo_types::Polygon`.
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.bounds.to_polygon()
    }

    pub fn parent(&self) -> Option<Self> {
        parent(&self.id).and_then(|p| Self::from_id(p).ok())
    }

    pub fn children(&self) -> Result<Vec<Self>> {
        Geohash
            .children(&self.id)
            .iter()
            .map(|child| Self::from_id(child))
            .collect()
    }

    /// True if `other` is this cell or lies inside it.
    pub fn contains(&self, other: &GeohashCell) -> bool {
        other.id.starts_with(self.id.as_str())
    }
}
