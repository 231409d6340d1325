use crate::core::constants::MAX_EDGE_LON_SPAN;
use crate::core::ring::{NormalisedPolygon, Ring};
use crate::util::error::{CoverError, Result};
use geo_types::{Coord, Geometry, LineString, MultiPolygon, Polygon};

/// Anything that can be covered: a bare ring, a polygon with holes, or several polygons.
#[derive(Debug, Clone, PartialEq)]
pub enum PolygonInput {
    Ring(LineString<f64>),
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl From<LineString<f64>> for PolygonInput {
    fn from(ring: LineString<f64>) -> Self {
        PolygonInput::Ring(ring)
    }
}

impl From<Vec<(f64, f64)>> for PolygonInput {
    fn from(ring: Vec<(f64, f64)>) -> Self {
        PolygonInput::Ring(LineString::from(ring))
    }
}

impl From<Polygon<f64>> for PolygonInput {
    fn from(polygon: Polygon<f64>) -> Self {
        PolygonInput::Polygon(polygon)
    }
}

impl From<MultiPolygon<f64>> for PolygonInput {
    fn from(multi: MultiPolygon<f64>) -> Self {
        PolygonInput::MultiPolygon(multi)
    }
}

impl TryFrom<Geometry<f64>> for PolygonInput {
    type Error = CoverError;

    fn try_from(geom: Geometry<f64>) -> Result<Self> {
        match geom {
            Geometry::Polygon(p) => Ok(PolygonInput::Polygon(p)),
            Geometry::MultiPolygon(mp) => Ok(PolygonInput::MultiPolygon(mp)),
            Geometry::Rect(r) => Ok(PolygonInput::Polygon(r.to_polygon())),
            Geometry::Triangle(t) => Ok(PolygonInput::Polygon(t.to_polygon())),
            Geometry::LineString(ls) if ls.is_closed() => Ok(PolygonInput::Ring(ls)),
            Geometry::LineString(_) => Err(CoverError::UnsupportedGeometry(
                "LineString must be closed to be covered".to_string(),
            )),
            Geometry::Point(_) => Err(CoverError::UnsupportedGeometry("Point".to_string())),
            Geometry::MultiPoint(_) => {
                Err(CoverError::UnsupportedGeometry("MultiPoint".to_string()))
            }
            Geometry::Line(_) => Err(CoverError::UnsupportedGeometry("Line".to_string())),
            Geometry::MultiLineString(_) => {
                Err(CoverError::UnsupportedGeometry("MultiLineString".to_string()))
            }
            _ => Err(CoverError::UnsupportedGeometry(
                "GeometryCollection".to_string(),
            )),
        }
    }
}

/// Validates and canonicalises the input into one [`NormalisedPolygon`] per part.
///
/// Every ring of every part is checked before anything is returned, so a
/// single bad part fails the whole input.
pub fn normalise(input: &PolygonInput) -> Result<Vec<NormalisedPolygon>> {
    match input {
        PolygonInput::Ring(ring) => Ok(vec![normalise_polygon(ring, &[])?]),
        PolygonInput::Polygon(p) => Ok(vec![normalise_polygon(p.exterior(), p.interiors())?]),
        PolygonInput::MultiPolygon(mp) => {
            if mp.0.is_empty() {
                return Err(CoverError::DegenerateRing { vertices: 0 });
            }
            mp.0.iter()
                .map(|p| normalise_polygon(p.exterior(), p.interiors()))
                .collect()
        }
    }
}

fn normalise_polygon(
    exterior: &LineString<f64>,
    interiors: &[LineString<f64>],
) -> Result<NormalisedPolygon> {
    let outer_coords = strip_closing_vertex(exterior);
    if outer_coords.len() < 3 {
        return Err(CoverError::DegenerateRing {
            vertices: outer_coords.len(),
        });
    }
    let outer = validated_ring(outer_coords)?;

    let mut holes = Vec::with_capacity(interiors.len());
    for interior in interiors {
        let coords = strip_closing_vertex(interior);
        if coords.len() < 3 {
            continue;
        }
        holes.push(validated_ring(coords)?);
    }

    Ok(NormalisedPolygon::new(outer, holes))
}

fn strip_closing_vertex(ring: &LineString<f64>) -> Vec<Coord<f64>> {
    let mut coords = ring.0.clone();
    if coords.len() >= 2 && coords.first() == coords.last() {
        coords.pop();
    }
    coords
}

fn validated_ring(coords: Vec<Coord<f64>>) -> Result<Ring> {
    if let Some(bad) = coords
        .iter()
        .find(|c| !(-90.0..=90.0).contains(&c.y) || !(-180.0..=180.0).contains(&c.x))
    {
        return Err(CoverError::CoordinateOutOfRange {
            lon: bad.x,
            lat: bad.y,
        });
    }

    let n = coords.len();
    for i in 0..n {
        let (from, to) = (coords[i], coords[(i + 1) % n]);
        if (to.x - from.x).abs() > MAX_EDGE_LON_SPAN {
            return Err(CoverError::Antimeridian {
                from_lon: from.x,
                to_lon: to.x,
            });
        }
    }

    Ring::new(coords).ok_or(CoverError::DegenerateRing { vertices: 0 })
}
