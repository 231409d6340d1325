use crate::core::constants::MAX_EDGE_LON_SPAN;
use crate::core::grid::{Geohash, Grid};
use crate::util::error::{CoverError, Result};
use geo_types::{Coord, LineString, Polygon, coord};
use std::cmp::Ordering;

/// Convex hull of the corners of every cell in `cells`, counter-clockwise and open.
///
/// Returns an empty list for an empty cell set.
///
/// # Example
/// ```
/// use geohash_cover::cells_to_hull;
///
/// # fn main() -> Result<(), geohash_cover::CoverError> {
/// let hull = cells_to_hull(&["gcpv", "gcpy"])?;
/// assert_eq!(hull.len(), 4);
/// # Ok(())
/// # }
/// ```
pub fn cells_to_hull<S: AsRef<str>>(cells: &[S]) -> Result<Vec<Coord<f64>>> {
    hull_with_grid(&Geohash, cells)
}

/// Same as [`cells_to_hull`], closed into a `geo_types::Polygon` for editing.
pub fn cells_to_polygon<S: AsRef<str>>(cells: &[S]) -> Result<Polygon<f64>> {
    let hull = cells_to_hull(cells)?;
    Ok(Polygon::new(LineString::from(hull), vec![]))
}

pub fn hull_with_grid<G: Grid, S: AsRef<str>>(grid: &G, cells: &[S]) -> Result<Vec<Coord<f64>>> {
    let mut points: Vec<Coord<f64>> = Vec::with_capacity(cells.len() * 4);
    for cell in cells {
        let rect = grid.bounds(cell.as_ref())?;
        let (min, max) = (rect.min(), rect.max());
        points.extend([
            coord! { x: min.x, y: min.y },
            coord! { x: max.x, y: min.y },
            coord! { x: max.x, y: max.y },
            coord! { x: min.x, y: max.y },
        ]);
    }

    points.sort_by(compare_lon_lat);
    points.dedup();

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Ok(Vec::new());
    };
    let span = last.x - first.x;
    if span > MAX_EDGE_LON_SPAN {
        return Err(CoverError::HullAntimeridian { span });
    }

    Ok(monotone_chain(&points))
}

fn compare_lon_lat(a: &Coord<f64>, b: &Coord<f64>) -> Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}

fn cross(o: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

// Andrew's monotone chain over points sorted by (lon, lat).
fn monotone_chain(points: &[Coord<f64>]) -> Vec<Coord<f64>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut lower: Vec<Coord<f64>> = Vec::new();
    for &p in points {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Coord<f64>> = Vec::new();
    for &p in points.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::coverage::polygon_to_cells;
    use crate::api::options::CoverageOptions;
    use crate::core::grid::decode_bounds;
    use crate::core::predicates::point_in_polygon;
    use geo::Contains;
    use geo_types::Point;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input() -> Result<()> {
        let cells: [&str; 0] = [];
        assert!(cells_to_hull(&cells)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_single_cell_hull_is_its_rectangle() -> Result<()> {
        let hull = cells_to_hull(&["gcp"])?;
        let rect = decode_bounds("gcp")?;
        assert_eq!(hull.len(), 4);
        assert_eq!(hull[0], rect.min());
        assert!(hull.contains(&rect.max()));
        Ok(())
    }

    #[test]
    fn test_hull_is_counter_clockwise() -> Result<()> {
        let hull = cells_to_hull(&["u09t", "u09w", "u0d0", "u09m"])?;
        let n = hull.len();
        assert!(n >= 3);
        for i in 0..n {
            assert!(cross(hull[i], hull[(i + 1) % n], hull[(i + 2) % n]) > 0.0);
        }
        Ok(())
    }

    #[test]
    fn test_hull_rejects_antimeridian_span() {
        // "2" sits west of -135°, "r" east of 135°.
        let result = cells_to_hull(&["2", "r"]);
        assert!(matches!(result, Err(CoverError::HullAntimeridian { .. })));
    }

    #[test]
    fn test_hull_rejects_invalid_cell() {
        assert!(matches!(
            cells_to_hull(&["gcp", "ilo"]),
            Err(CoverError::InvalidCell(_))
        ));
    }

    #[test]
    fn test_hull_contains_cell_centres() -> Result<()> {
        let ring = vec![(2.0, 48.0), (2.3, 48.05), (2.2, 48.3), (2.05, 48.2)];
        let cells = polygon_to_cells(ring, &CoverageOptions::new().with_max_precision(5))?;
        let hull = cells_to_hull(&cells)?;
        let polygon = cells_to_polygon(&cells)?;

        for cell in &cells {
            let centre = decode_bounds(cell)?.center();
            assert!(point_in_polygon(centre, &hull));
            assert!(polygon.contains(&Point::from(centre)));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_hull_contains_every_corner(
            indices in proptest::collection::vec(0usize..1024, 1..40)
        ) {
            let cells: Vec<String> = indices
                .iter()
                .map(|i| {
                    let a = crate::core::constants::BASE32_ALPHABET[i / 32] as char;
                    let b = crate::core::constants::BASE32_ALPHABET[i % 32] as char;
                    format!("u{}{}", a, b)
                })
                .collect();
            let hull = cells_to_hull(&cells).map_err(|e| TestCaseError::fail(e.to_string()))?;
            for cell in &cells {
                let rect = decode_bounds(cell).map_err(|e| TestCaseError::fail(e.to_string()))?;
                for corner in rect.to_polygon().exterior().coords() {
                    prop_assert!(point_in_polygon(*corner, &hull));
                }
            }
        }
    }
}
