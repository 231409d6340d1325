use crate::core::constants::{BAILOUT_MULTIPLIER, DEFAULT_MAX_CELLS, MAX_PRECISION, MIN_PRECISION};
use crate::util::error::{CoverError, Result};
use serde::{Deserialize, Serialize};

/// Controls the resolution and size of a covering.
///
/// # Example
/// ```
/// use geohash_cover::CoverageOptions;
///
/// let options = CoverageOptions::new()
///     .with_min_precision(3)
///     .with_max_precision(7)
///     .with_max_cells(200)
///     .with_merge_threshold(0.75);
/// assert_eq!(options.max_cells, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageOptions {
    /// Coarsest cell length allowed (1-9).
    pub min_precision: u8,
    /// Finest cell length allowed (1-9).
    pub max_precision: u8,
    /// Upper bound on the number of returned cells.
    pub max_cells: usize,
    /// 0 favours few coarse cells, 1 favours an exact fine boundary.
    pub merge_threshold: f64,
}

impl Default for CoverageOptions {
    fn default() -> Self {
        Self {
            min_precision: MIN_PRECISION,
            max_precision: MAX_PRECISION,
            max_cells: DEFAULT_MAX_CELLS,
            merge_threshold: 1.0,
        }
    }
}

impl CoverageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_precision(mut self, precision: u8) -> Self {
        self.min_precision = precision;
        self
    }

    pub fn with_max_precision(mut self, precision: u8) -> Self {
        self.max_precision = precision;
        self
    }

    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    pub fn with_merge_threshold(mut self, threshold: f64) -> Self {
        self.merge_threshold = threshold;
        self
    }

    /// Loads options from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| CoverError::InvalidOption(e.to_string()))
    }

    /// Validates and clamps the options into their usable ranges.
    ///
    /// Precisions are clamped into 1-9 and `min_precision` is lowered to
    /// `max_precision` if it exceeds it; `merge_threshold` is clamped into
    /// `[0, 1]`. A non-finite threshold or a zero budget is an error.
    pub fn resolve(&self) -> Result<Self> {
        if !self.merge_threshold.is_finite() {
            return Err(CoverError::InvalidOption(format!(
                "merge_threshold must be finite, got {}",
                self.merge_threshold
            )));
        }
        if self.max_cells == 0 {
            return Err(CoverError::InvalidOption(
                "max_cells must be at least 1".to_string(),
            ));
        }

        let max_precision = self.max_precision.clamp(MIN_PRECISION, MAX_PRECISION);
        let min_precision = self
            .min_precision
            .clamp(MIN_PRECISION, MAX_PRECISION)
            .min(max_precision);

        Ok(Self {
            min_precision,
            max_precision,
            max_cells: self.max_cells,
            merge_threshold: self.merge_threshold.clamp(0.0, 1.0),
        })
    }

    /// Committed-cell count at which a subdivision pass is abandoned.
    pub fn bailout_limit(&self) -> usize {
        self.max_cells.saturating_mul(BAILOUT_MULTIPLIER)
    }
}
