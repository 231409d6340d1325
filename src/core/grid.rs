use crate::core::constants::{BASE32_ALPHABET, MAX_CELL_LENGTH};
use crate::util::error::{CoverError, Result};
use geo_types::{Coord, Rect, coord};

/// The hierarchical grid a covering is expressed in.
///
/// Implementations are stateless lookups: the coverage engine only ever
/// asks for a cell's rectangle and its 32 children.
pub trait Grid {
    /// Rectangle covered by `cell`, with `x` = longitude and `y` = latitude.
    fn bounds(&self, cell: &str) -> Result<Rect<f64>>;

    /// The 32 children of `cell`, in alphabet order.
    fn children(&self, cell: &str) -> Vec<String>;
}

/// Standard base-32 geohash grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geohash;

impl Grid for Geohash {
    fn bounds(&self, cell: &str) -> Result<Rect<f64>> {
        decode_bounds(cell)
    }

    fn children(&self, cell: &str) -> Vec<String> {
        children(cell)
    }
}

fn symbol_value(symbol: u8) -> Option<u8> {
    BASE32_ALPHABET
        .iter()
        .position(|&s| s == symbol)
        .map(|p| p as u8)
}

/// Returns true if `cell` is a non-empty geohash of at most 12 alphabet symbols.
pub fn is_valid(cell: &str) -> bool {
    !cell.is_empty()
        && cell.len() <= MAX_CELL_LENGTH
        && cell.bytes().all(|b| symbol_value(b).is_some())
}

/// Decodes a geohash into its bounding rectangle.
pub fn decode_bounds(cell: &str) -> Result<Rect<f64>> {
    if cell.is_empty() || cell.len() > MAX_CELL_LENGTH {
        return Err(CoverError::InvalidCell(cell.to_string()));
    }

    let (mut min_lon, mut max_lon) = (-180.0_f64, 180.0_f64);
    let (mut min_lat, mut max_lat) = (-90.0_f64, 90.0_f64);
    let mut is_lon = true;

    for symbol in cell.bytes() {
        let value =
            symbol_value(symbol).ok_or_else(|| CoverError::InvalidCell(cell.to_string()))?;
        for shift in (0..5).rev() {
            let bit = (value >> shift) & 1;
            if is_lon {
                let mid = (min_lon + max_lon) / 2.0;
                if bit == 1 {
                    min_lon = mid;
                } else {
                    max_lon = mid;
                }
            } else {
                let mid = (min_lat + max_lat) / 2.0;
                if bit == 1 {
                    min_lat = mid;
                } else {
                    max_lat = mid;
                }
            }
            is_lon = !is_lon;
        }
    }

    Ok(Rect::new(
        coord! { x: min_lon, y: min_lat },
        coord! { x: max_lon, y: max_lat },
    ))
}

/// Decodes a geohash into its centre point.
pub fn decode(cell: &str) -> Result<Coord<f64>> {
    Ok(decode_bounds(cell)?.center())
}

/// Encodes a (longitude, latitude) coordinate at the given precision.
pub fn encode(coord: Coord<f64>, precision: usize) -> Result<String> {
    if !(-180.0..=180.0).contains(&coord.x) || !(-90.0..=90.0).contains(&coord.y) {
        return Err(CoverError::CoordinateOutOfRange {
            lon: coord.x,
            lat: coord.y,
        });
    }
    if precision == 0 || precision > MAX_CELL_LENGTH {
        return Err(CoverError::InvalidOption(format!(
            "precision must be between 1 and {}, got {}",
            MAX_CELL_LENGTH, precision
        )));
    }

    let (mut min_lon, mut max_lon) = (-180.0_f64, 180.0_f64);
    let (mut min_lat, mut max_lat) = (-90.0_f64, 90.0_f64);
    let mut is_lon = true;
    let mut id = String::with_capacity(precision);

    while id.len() < precision {
        let mut value = 0u8;
        for _ in 0..5 {
            value <<= 1;
            if is_lon {
                let mid = (min_lon + max_lon) / 2.0;
                if coord.x >= mid {
                    value |= 1;
                    min_lon = mid;
                } else {
                    max_lon = mid;
                }
            } else {
                let mid = (min_lat + max_lat) / 2.0;
                if coord.y >= mid {
                    value |= 1;
                    min_lat = mid;
                } else {
                    max_lat = mid;
                }
            }
            is_lon = !is_lon;
        }
        id.push(BASE32_ALPHABET[value as usize] as char);
    }

    Ok(id)
}

/// All 32 children of `cell` in alphabet order.
pub fn children(cell: &str) -> Vec<String> {
    BASE32_ALPHABET
        .iter()
        .map(|&s| {
            let mut child = String::with_capacity(cell.len() + 1);
            child.push_str(cell);
            child.push(s as char);
            child
        })
        .collect()
}

/// The immediate parent of `cell`, or `None` for a precision-1 cell.
pub fn parent(cell: &str) -> Option<&str> {
    if cell.len() <= 1 {
        None
    } else {
        cell.get(..cell.len() - 1)
    }
}
