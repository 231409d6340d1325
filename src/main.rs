use clap::{Args, Parser, Subcommand};
use geohash_cover::geom::{parse_polygon_input, polygon_to_geojson, polygon_to_wkt};
use geohash_cover::{
    CoverError, CoverageOptions, CsvCoverConfig, CsvToCover, GeometryFormat, cells_to_polygon,
    compact_cells, cover,
};
use std::io::Read;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "geohash-cover")]
#[command(about = "Cover polygons with geohash cells and rebuild polygons from cells")]
struct Cmd {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Cover a WKT or GeoJSON polygon and print the covering as JSON
    Cover {
        /// Geometry text; read from stdin when omitted
        #[arg(long)]
        geometry: Option<String>,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Print the convex hull of a cell set as a polygon
    Hull {
        cells: Vec<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::GeoJson)]
        format: OutputFormat,
    },
    /// Deduplicate and merge a cell set
    Compact {
        cells: Vec<String>,
        #[arg(long, default_value_t = 1.0)]
        merge_threshold: f64,
    },
    /// Cover every geometry in a CSV column, one output row per cell
    Csv {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "geometry")]
        geometry_column: String,
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
        /// Add each cell's polygon as a column
        #[arg(long, value_enum)]
        cell_geometry: Option<OutputFormat>,
        #[command(flatten)]
        options: OptionArgs,
    },
}

#[derive(Args)]
struct OptionArgs {
    /// JSON file with coverage options; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    min_precision: Option<u8>,
    #[arg(long)]
    max_precision: Option<u8>,
    #[arg(long)]
    max_cells: Option<usize>,
    #[arg(long)]
    merge_threshold: Option<f64>,
}

impl OptionArgs {
    fn load(&self) -> Result<CoverageOptions, CoverError> {
        let mut options = match &self.config {
            Some(path) => CoverageOptions::from_json_str(&std::fs::read_to_string(path)?)?,
            None => CoverageOptions::default(),
        };
        if let Some(p) = self.min_precision {
            options = options.with_min_precision(p);
        }
        if let Some(p) = self.max_precision {
            options = options.with_max_precision(p);
        }
        if let Some(n) = self.max_cells {
            options = options.with_max_cells(n);
        }
        if let Some(t) = self.merge_threshold {
            options = options.with_merge_threshold(t);
        }
        Ok(options)
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Wkt,
    #[value(name = "geojson")]
    GeoJson,
}

impl From<OutputFormat> for GeometryFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Wkt => GeometryFormat::Wkt,
            OutputFormat::GeoJson => GeometryFormat::GeoJson,
        }
    }
}

fn main() -> Result<(), CoverError> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cmd.action {
        Action::Cover { geometry, options } => run_cover(geometry, &options.load()?),
        Action::Hull { cells, format } => run_hull(&cells, format),
        Action::Compact {
            cells,
            merge_threshold,
        } => run_compact(&cells, merge_threshold),
        Action::Csv {
            input,
            out,
            geometry_column,
            exclude,
            cell_geometry,
            options,
        } => {
            let mut config = CsvCoverConfig::new(geometry_column)
                .exclude(exclude)
                .options(options.load()?);
            if let Some(format) = cell_geometry {
                config = config.with_cell_geometry(format.into());
            }
            tracing::info!(input = %input.display(), out = %out.display(), "csv");
            input.to_cover_csv(&out, &config)
        }
    }
}

fn run_cover(geometry: Option<String>, options: &CoverageOptions) -> Result<(), CoverError> {
    let text = match geometry {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let coverage = cover(parse_polygon_input(&text)?, options)?;
    tracing::info!(
        cells = coverage.len(),
        precision = coverage.precision,
        "covered"
    );
    print_json(&coverage)
}

fn run_hull(cells: &[String], format: OutputFormat) -> Result<(), CoverError> {
    let polygon = cells_to_polygon(cells)?;
    match format {
        OutputFormat::Wkt => println!("{}", polygon_to_wkt(&polygon)),
        OutputFormat::GeoJson => println!("{}", polygon_to_geojson(&polygon)),
    }
    Ok(())
}

fn run_compact(cells: &[String], merge_threshold: f64) -> Result<(), CoverError> {
    let compacted = compact_cells(cells, merge_threshold)?;
    tracing::debug!(before = cells.len(), after = compacted.len(), "compacted");
    print_json(&compacted)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CoverError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CoverError::Io(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
