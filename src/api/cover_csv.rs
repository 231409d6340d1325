use crate::api::cell::GeohashCell;
use crate::api::coverage::polygon_to_cells;
use crate::api::options::CoverageOptions;
use crate::geom::parse::{parse_polygon_input, polygon_to_geojson, polygon_to_wkt};
use crate::util::error::{CoverError, Result};
use csv::StringRecord;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

/// Output format for cell polygon geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

/// Configuration for CSV to cell-coverage conversion.
#[derive(Debug, Clone)]
pub struct CsvCoverConfig {
    pub geometry_column: String,
    pub exclude_columns: Vec<String>,
    pub options: CoverageOptions,
    pub include_cell_geometry: Option<GeometryFormat>,
}

impl CsvCoverConfig {
    /// Create config for a CSV with a polygon geometry column (WKT or GeoJSON).
    ///
    /// # Example
    /// ```
    /// use geohash_cover::{CoverageOptions, CsvCoverConfig, GeometryFormat};
    ///
    /// let config = CsvCoverConfig::new("geometry")
    ///     .options(CoverageOptions::new().with_max_precision(6))
    ///     .with_cell_geometry(GeometryFormat::Wkt);
    /// ```
    pub fn new(geometry_column: impl Into<String>) -> Self {
        Self {
            geometry_column: geometry_column.into(),
            exclude_columns: Vec::new(),
            options: CoverageOptions::default(),
            include_cell_geometry: None,
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    pub fn options(mut self, options: CoverageOptions) -> Self {
        self.options = options;
        self
    }

    /// Include each cell's polygon in the output.
    pub fn with_cell_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_cell_geometry = Some(format);
        self
    }
}

pub trait CsvToCover {
    fn to_cover_csv(&self, output_path: impl AsRef<Path>, config: &CsvCoverConfig) -> Result<()>;
}

impl<P: AsRef<Path>> CsvToCover for P {
    fn to_cover_csv(&self, output_path: impl AsRef<Path>, config: &CsvCoverConfig) -> Result<()> {
        csv_to_cover_csv(self, output_path, config)
    }
}

/// Converts a CSV with a polygon geometry column into one row per covering cell.
///
/// Rows are covered in parallel; output keeps input order. The first row
/// that fails (bad geometry, infeasible budget) aborts the conversion.
///
/// ```no_run
/// use geohash_cover::{CsvCoverConfig, csv_to_cover_csv};
///
/// let config = CsvCoverConfig::new("Geo Shape").exclude(vec!["Geo Point".into()]);
/// csv_to_cover_csv("parks.csv", "parks_cells.csv", &config).unwrap();
/// ```
pub fn csv_to_cover_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvCoverConfig,
) -> Result<()> {
    let file = File::open(csv_path)?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers()?.clone();

    let geometry_idx = headers
        .iter()
        .position(|h| h == config.geometry_column.as_str())
        .ok_or_else(|| {
            CoverError::Csv(format!(
                "Geometry column '{}' not found",
                config.geometry_column
            ))
        })?;

    let mut exclude_indices = HashSet::new();
    exclude_indices.insert(geometry_idx);
    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name.as_str()) {
            exclude_indices.insert(idx);
        }
    }

    let records: Vec<StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;

    let coverings: Vec<Vec<String>> = records
        .par_iter()
        .enumerate()
        .map(|(row, record)| cover_record(record, geometry_idx, &config.options, row))
        .collect::<Result<_>>()?;

    let out_file = File::create(output_path)?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec!["cell_id"];
    if config.include_cell_geometry.is_some() {
        header_row.push("cell_geometry");
    }
    for (i, h) in headers.iter().enumerate() {
        if !exclude_indices.contains(&i) {
            header_row.push(h);
        }
    }
    writer.write_record(&header_row)?;

    let mut written = 0usize;
    for (record, cells) in records.iter().zip(&coverings) {
        for cell in cells {
            let mut row: Vec<String> = vec![cell.clone()];

            if let Some(format) = config.include_cell_geometry {
                let polygon = GeohashCell::from_id(cell)?.to_polygon();
                let geom_str = match format {
                    GeometryFormat::Wkt => polygon_to_wkt(&polygon),
                    GeometryFormat::GeoJson => polygon_to_geojson(&polygon),
                };
                row.push(geom_str);
            }

            for (i, field) in record.iter().enumerate() {
                if !exclude_indices.contains(&i) {
                    row.push(field.to_string());
                }
            }
            writer.write_record(&row)?;
            written += 1;
        }
    }

    writer.flush()?;
    tracing::info!(rows = records.len(), cells = written, "csv coverage written");

    Ok(())
}

fn cover_record(
    record: &StringRecord,
    geometry_idx: usize,
    options: &CoverageOptions,
    row: usize,
) -> Result<Vec<String>> {
    let geom_str = record.get(geometry_idx).ok_or_else(|| {
        CoverError::Csv(format!(
            "Missing geometry column at index {} in row {}",
            geometry_idx, row
        ))
    })?;
    let input = parse_polygon_input(geom_str)?;
    polygon_to_cells(input, options)
}
