use thiserror::Error;

/// Broad classification of a [`CoverError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input geometry or options were rejected before any subdivision work.
    Input,
    /// The requested cell budget cannot be met even at the coarsest setting.
    Sizing,
    /// A geometric result cannot be represented correctly (e.g. a hull across the antimeridian).
    Geometry,
    /// Reading or writing files failed.
    Io,
}

/// Error type for geohash-cover operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoverError {
    /// A ring has fewer than three distinct vertices once the closing vertex is removed.
    #[error("Degenerate ring: {vertices} vertices after removing the closing vertex, 3 required")]
    DegenerateRing { vertices: usize },

    /// Two consecutive ring vertices are more than 180° of longitude apart.
    #[error(
        "Ring edge crosses the antimeridian: longitude jumps from {from_lon} to {to_lon}; split the polygon at ±180°"
    )]
    Antimeridian { from_lon: f64, to_lon: f64 },

    /// A vertex lies outside latitude [-90, 90] or longitude [-180, 180], or is not finite.
    #[error("Coordinate out of range: lon={lon}, lat={lat}")]
    CoordinateOutOfRange { lon: f64, lat: f64 },

    /// A coverage option is not usable (non-finite, zero budget, ...).
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// A cell id is empty, too long, or contains a symbol outside the alphabet.
    #[error("Invalid cell id: '{0}'")]
    InvalidCell(String),

    /// The budget cannot be met even with the coarsest pass.
    #[error(
        "Cannot cover polygon with max_cells={max_cells}: the coarsest covering at precision {min_precision} needs at least {min_feasible} cells; increase max_cells or lower min_precision"
    )]
    Sizing {
        max_cells: usize,
        min_feasible: usize,
        min_precision: u8,
    },

    /// The corners of a cell set span more than 180° of longitude.
    #[error(
        "Cell corners span {span}° of longitude; a planar hull would wrap across the antimeridian"
    )]
    HullAntimeridian { span: f64 },

    /// Failed to parse geometry from a string (GeoJSON or WKT).
    #[error("Geometry parse error: {0}")]
    GeometryParse(String),

    /// The geometry parsed fine but has no area to cover.
    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(String),

    /// CSV parsing or writing error.
    #[error("CSV error: {0}")]
    Csv(String),
}

impl CoverError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoverError::DegenerateRing { .. }
            | CoverError::Antimeridian { .. }
            | CoverError::CoordinateOutOfRange { .. }
            | CoverError::InvalidOption(_)
            | CoverError::InvalidCell(_)
            | CoverError::GeometryParse(_)
            | CoverError::UnsupportedGeometry(_) => ErrorKind::Input,
            CoverError::Sizing { .. } => ErrorKind::Sizing,
            CoverError::HullAntimeridian { .. } => ErrorKind::Geometry,
            CoverError::Io(_) | CoverError::Csv(_) => ErrorKind::Io,
        }
    }
}

impl From<std::io::Error> for CoverError {
    fn from(e: std::io::Error) -> Self {
        CoverError::Io(e.to_string())
    }
}

impl From<csv::Error> for CoverError {
    fn from(e: csv::Error) -> Self {
        CoverError::Csv(e.to_string())
    }
}

/// Result type for geohash-cover operations.
pub type Result<T> = std::result::Result<T, CoverError>;
