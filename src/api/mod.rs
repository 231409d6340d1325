pub mod cell;
pub mod compact;
pub mod cover_csv;
pub mod coverage;
pub mod engine;
pub mod hull;
pub mod normalise;
pub mod options;

pub use cell::GeohashCell;
pub use compact::{Compactor, compact_cells, min_siblings_for_threshold};
pub use cover_csv::{CsvCoverConfig, CsvToCover, GeometryFormat, csv_to_cover_csv};
pub use coverage::{Coverage, cover, cover_with_grid, polygon_to_cells};
pub use engine::{CoveragePass, PassOutcome};
pub use hull::{cells_to_hull, cells_to_polygon, hull_with_grid};
pub use normalise::{PolygonInput, normalise};
pub use options::CoverageOptions;
