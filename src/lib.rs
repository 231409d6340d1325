//! # geohash-cover
//!
//! Covers polygons (with holes, optionally multi-part) in WGS84 longitude/latitude
//! with a compact, multi-resolution set of geohash cells, and turns a cell set
//! back into an editable convex polygon.
//!
//! There are currently four main entry points.
//!
//! ### 1. `polygon_to_cells` / `cover` - Polygon Coverage
//!
//! ```
//! use geohash_cover::{CoverageOptions, cover};
//!
//! # fn main() -> Result<(), geohash_cover::CoverError> {
//! let ring = vec![(-0.14, 51.495), (-0.12, 51.495), (-0.12, 51.505), (-0.14, 51.505)];
//! let options = CoverageOptions::new()
//!     .with_max_precision(7)
//!     .with_max_cells(100)
//!     .with_merge_threshold(0.5);
//!
//! let coverage = cover(ring, &options)?;
//! assert!(coverage.len() <= 100);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `compact_cells` - Cell Set Compaction
//!
//! ```
//! use geohash_cover::{Compactor, compact_cells};
//!
//! # fn main() -> Result<(), geohash_cover::CoverError> {
//! let siblings: Vec<String> = "0123456789bcdefghjkmnpqrstuvwxyz"
//!     .chars()
//!     .map(|c| format!("gcp{}", c))
//!     .collect();
//! assert_eq!(compact_cells(&siblings, 1.0)?, vec!["gcp".to_string()]);
//!
//! // Lossy: 30 of 32 present siblings are enough.
//! assert_eq!(Compactor::new(30).compact(siblings[..30].to_vec()), vec!["gcp"]);
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `cells_to_hull` - Hull Reconstruction
//!
//! ```
//! use geohash_cover::cells_to_polygon;
//!
//! # fn main() -> Result<(), geohash_cover::CoverError> {
//! let polygon = cells_to_polygon(&["gcpv", "gcpy", "gcpu"])?;
//! assert!(polygon.exterior().is_closed());
//! # Ok(())
//! # }
//! ```
//!
//! ### 4. `CsvToCover` - CSV File Conversion
//!
//! ```no_run
//! use geohash_cover::{CoverageOptions, CsvCoverConfig, CsvToCover, GeometryFormat};
//!
//! let config = CsvCoverConfig::new("geometry")
//!     .options(CoverageOptions::new().with_max_precision(6))
//!     .with_cell_geometry(GeometryFormat::GeoJson);
//!
//! "zones.csv".to_cover_csv("zone_cells.csv", &config).unwrap();
//! ```
//!
//! Every call is a pure, synchronous computation with no shared state, so
//! independent calls can run in parallel freely.

pub mod api;
pub mod core;
pub mod geom;
pub mod util;

pub use api::{
    Compactor, Coverage, CoverageOptions, CoveragePass, CsvCoverConfig, CsvToCover,
    GeohashCell, GeometryFormat, PassOutcome, PolygonInput, cells_to_hull, cells_to_polygon,
    compact_cells, cover, cover_with_grid, csv_to_cover_csv, hull_with_grid,
    min_siblings_for_threshold, normalise, polygon_to_cells,
};
pub use core::{
    BASE32_ALPHABET, Geohash, Grid, MAX_PRECISION, MIN_PRECISION, NormalisedPolygon, Ring,
    bounds_fully_inside_polygon, bounds_overlaps_polygon, decode, decode_bounds, encode,
    point_in_polygon, segments_intersect,
};
pub use geom::{parse_geometry, parse_polygon_input};
pub use util::{Coordinate, CoverError, ErrorKind, Result};

pub use geo_types;
