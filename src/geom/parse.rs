use crate::api::normalise::PolygonInput;
use crate::util::error::CoverError;
use geo_types::{Geometry, Polygon};
use geojson::GeoJson;
use std::str::FromStr;
use wkt::Wkt;

/// Parses a geometry string, auto-detecting WKT or GeoJSON format.
///
/// GeoJSON is detected by a leading `{`, everything else is tried as WKT.
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, CoverError> {
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        parse_geojson(trimmed)
    } else {
        parse_wkt(trimmed)
    }
}

/// Parses a geometry string straight into something coverable.
pub fn parse_polygon_input(s: &str) -> Result<PolygonInput, CoverError> {
    PolygonInput::try_from(parse_geometry(s)?)
}

/// Parses a GeoJSON string into a `geo_types::Geometry`.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, CoverError> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| CoverError::GeometryParse(e.to_string()))?;

    match geojson {
        GeoJson::Geometry(geom) => {
            Geometry::try_from(geom).map_err(|e| CoverError::GeometryParse(e.to_string()))
        }
        GeoJson::Feature(feat) => feat
            .geometry
            .ok_or_else(|| CoverError::GeometryParse("Feature has no geometry".to_string()))
            .and_then(|g| {
                Geometry::try_from(g).map_err(|e| CoverError::GeometryParse(e.to_string()))
            }),
        GeoJson::FeatureCollection(_) => Err(CoverError::GeometryParse(
            "FeatureCollection not supported, use individual geometries".to_string(),
        )),
    }
}

/// Parses a WKT string into a `geo_types::Geometry`.
pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, CoverError> {
    let wkt: Wkt<f64> = Wkt::from_str(s).map_err(|e| CoverError::GeometryParse(e.to_string()))?;

    wkt.try_into()
        .map_err(|_| CoverError::GeometryParse("Failed to convert WKT to geometry".to_string()))
}

pub fn polygon_to_wkt(polygon: &Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

pub fn polygon_to_geojson(polygon: &Polygon<f64>) -> String {
    let geom = geojson::Geometry::from(polygon);
    geom.to_string()
}
