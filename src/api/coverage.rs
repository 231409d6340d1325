use crate::api::compact::Compactor;
use crate::api::engine::{CoveragePass, PassOutcome};
use crate::api::normalise::{PolygonInput, normalise};
use crate::api::options::CoverageOptions;
use crate::core::grid::{Geohash, Grid};
use crate::core::ring::NormalisedPolygon;
use crate::util::error::{CoverError, Result};
use serde::Serialize;
use std::collections::BTreeSet;

/// A budget-satisfying covering together with the setting that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coverage {
    /// Sorted cell ids; no cell is an ancestor of another.
    pub cells: Vec<String>,
    /// Finest precision used by the accepted pass.
    pub precision: u8,
    /// Threshold used by the accepted pass.
    pub merge_threshold: f64,
    /// True when the result came from the coarse pass at `min_precision` with threshold 0.
    pub coarse_fallback: bool,
}

impl Coverage {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(String::as_str)
    }
}

/// Covers a polygon with geohash cells, returning just the sorted cell ids.
///
/// # Example
/// ```
/// use geohash_cover::{CoverageOptions, polygon_to_cells};
///
/// # fn main() -> Result<(), geohash_cover::CoverError> {
/// let ring = vec![(-0.14, 51.495), (-0.12, 51.495), (-0.12, 51.505), (-0.14, 51.505)];
/// let options = CoverageOptions::new().with_max_precision(7).with_max_cells(500);
/// let cells = polygon_to_cells(ring, &options)?;
/// assert!(!cells.is_empty());
/// assert!(cells.iter().all(|c| c.len() <= 7));
/// # Ok(())
/// # }
/// ```
pub fn polygon_to_cells(
    input: impl Into<PolygonInput>,
    options: &CoverageOptions,
) -> Result<Vec<String>> {
    Ok(cover(input, options)?.cells)
}

/// Covers a polygon with geohash cells.
pub fn cover(input: impl Into<PolygonInput>, options: &CoverageOptions) -> Result<Coverage> {
    cover_with_grid(&Geohash, input, options)
}

/// Budget search over any [`Grid`].
///
/// Tries `max_precision` down to just above `min_precision` and keeps the
/// first compacted result that fits `max_cells`. The last rung is the coarse
/// pass at `min_precision` with threshold 0; if that is still too large the
/// call fails with [`CoverError::Sizing`]. Every rung, the coarse one
/// included, is abandoned once it commits more than `4 * max_cells` distinct
/// cells, in which case the reported count is a lower bound.
///
/// No returned cell is shorter than `min_precision`. Multi-part inputs are
/// validated up front, covered part by part under one shared bailout limit,
/// and merged before each budget check.
pub fn cover_with_grid<G: Grid>(
    grid: &G,
    input: impl Into<PolygonInput>,
    options: &CoverageOptions,
) -> Result<Coverage> {
    let options = options.resolve()?;
    let parts = normalise(&input.into())?;
    let limit = options.bailout_limit();
    let compactor =
        Compactor::from_threshold(options.merge_threshold).with_floor(options.min_precision);

    for precision in (options.min_precision + 1..=options.max_precision).rev() {
        let pass = CoveragePass::new(options.min_precision, precision, options.merge_threshold)
            .with_bailout(Some(limit));

        match cover_parts(grid, &parts, &pass)? {
            PassOutcome::Complete(raw) => {
                let raw_len = raw.len();
                let cells = compactor.compact(raw);
                tracing::debug!(
                    precision,
                    raw = raw_len,
                    compacted = cells.len(),
                    max_cells = options.max_cells,
                    "coverage attempt"
                );
                if cells.len() <= options.max_cells {
                    return Ok(Coverage {
                        cells,
                        precision,
                        merge_threshold: options.merge_threshold,
                        coarse_fallback: false,
                    });
                }
            }
            PassOutcome::Bailout { committed } => {
                tracing::debug!(precision, committed, limit, "coverage attempt abandoned");
            }
        }
    }

    let coarse = CoveragePass::new(options.min_precision, options.min_precision, 0.0)
        .with_bailout(Some(limit));
    let cells = match cover_parts(grid, &parts, &coarse)? {
        PassOutcome::Complete(raw) => Compactor::from_threshold(0.0)
            .with_floor(options.min_precision)
            .compact(raw),
        PassOutcome::Bailout { committed } => {
            tracing::debug!(committed, limit, "coarse attempt abandoned");
            return Err(CoverError::Sizing {
                max_cells: options.max_cells,
                min_feasible: committed,
                min_precision: options.min_precision,
            });
        }
    };
    tracing::debug!(
        precision = options.min_precision,
        compacted = cells.len(),
        max_cells = options.max_cells,
        "coarse attempt"
    );

    if cells.len() <= options.max_cells {
        Ok(Coverage {
            cells,
            precision: options.min_precision,
            merge_threshold: 0.0,
            coarse_fallback: true,
        })
    } else {
        Err(CoverError::Sizing {
            max_cells: options.max_cells,
            min_feasible: cells.len(),
            min_precision: options.min_precision,
        })
    }
}

/// Runs `pass` over every part and unions the results.
///
/// The bailout limit applies to the number of distinct cells committed
/// across all parts, so overlapping parts are not counted twice.
fn cover_parts<G: Grid>(
    grid: &G,
    parts: &[NormalisedPolygon],
    pass: &CoveragePass,
) -> Result<PassOutcome> {
    let mut merged: BTreeSet<String> = BTreeSet::new();
    for (index, part) in parts.iter().enumerate() {
        match pass.run(grid, part)? {
            PassOutcome::Complete(cells) => {
                tracing::trace!(part = index, cells = cells.len(), "part covered");
                merged.extend(cells);
            }
            PassOutcome::Bailout { committed } => {
                return Ok(PassOutcome::Bailout {
                    committed: merged.len().max(committed),
                });
            }
        }
        if let Some(limit) = pass.bailout {
            if merged.len() > limit {
                return Ok(PassOutcome::Bailout {
                    committed: merged.len(),
                });
            }
        }
    }
    Ok(PassOutcome::Complete(merged.into_iter().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::decode_bounds;
    use geo_types::{MultiPolygon, Polygon, Rect, coord, polygon};

    fn london_rect() -> Vec<(f64, f64)> {
        vec![(-0.14, 51.495), (-0.12, 51.495), (-0.12, 51.505), (-0.14, 51.505)]
    }

    fn assert_no_ancestors(cells: &[String]) {
        for a in cells {
            for b in cells {
                assert!(a == b || !b.starts_with(a.as_str()), "{} is an ancestor of {}", a, b);
            }
        }
    }

    #[test]
    fn test_small_rectangle_near_london() -> Result<()> {
        let options = CoverageOptions::new()
            .with_min_precision(1)
            .with_max_precision(7)
            .with_max_cells(500);
        let coverage = cover(london_rect(), &options)?;

        assert!(!coverage.is_empty());
        assert!(coverage.len() <= 500);
        assert_eq!(coverage.precision, 7);
        assert!(!coverage.coarse_fallback);
        assert!(coverage.iter().all(|c| c.len() <= 7));

        let mut sorted = coverage.cells.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, coverage.cells);
        assert_no_ancestors(&coverage.cells);
        Ok(())
    }

    #[test]
    fn test_budget_steps_precision_down() -> Result<()> {
        let options = CoverageOptions::new()
            .with_min_precision(1)
            .with_max_precision(7)
            .with_max_cells(20);
        let coverage = cover(london_rect(), &options)?;
        assert!(coverage.len() <= 20);
        assert!(coverage.precision < 7);
        Ok(())
    }

    #[test]
    fn test_sizing_error_reports_minimum() {
        // At precision 6 the rectangle spans at least two cells of longitude.
        let options = CoverageOptions::new()
            .with_min_precision(6)
            .with_max_precision(7)
            .with_max_cells(1);
        match cover(london_rect(), &options) {
            Err(CoverError::Sizing {
                max_cells,
                min_feasible,
                min_precision,
            }) => {
                assert_eq!(max_cells, 1);
                assert_eq!(min_precision, 6);
                assert!(min_feasible >= 2);
            }
            other => panic!("expected sizing error, got {:?}", other),
        }
    }

    #[test]
    fn test_sizing_error_across_first_level_boundary() {
        // Straddles the prime meridian, so even precision 1 needs "g" and "u".
        let ring = vec![(-0.01, 51.49), (0.01, 51.49), (0.01, 51.51), (-0.01, 51.51)];
        let options = CoverageOptions::new().with_max_precision(7).with_max_cells(1);
        let err = cover(ring, &options).err();
        assert_eq!(
            err,
            Some(CoverError::Sizing {
                max_cells: 1,
                min_feasible: 2,
                min_precision: 1
            })
        );
        let msg = err.map(|e| e.to_string()).unwrap_or_default();
        assert!(msg.contains("needs at least 2 cells"));
    }

    #[test]
    fn test_single_cell_budget_within_one_cell() -> Result<()> {
        let coverage = cover(london_rect(), &CoverageOptions::new().with_max_cells(1))?;
        assert_eq!(coverage.len(), 1);
        let rect = decode_bounds(&coverage.cells[0])?;
        assert!(rect.min().x <= -0.14 && rect.max().x >= -0.12);
        assert!(rect.min().y <= 51.495 && rect.max().y >= 51.505);
        Ok(())
    }

    #[test]
    fn test_antimeridian_rejected_before_subdivision() {
        let ring = vec![(170.0, 10.0), (-170.0, 10.0), (-170.0, 20.0), (170.0, 20.0)];
        let result = cover(ring, &CoverageOptions::default());
        assert!(matches!(result, Err(CoverError::Antimeridian { .. })));
    }

    #[test]
    fn test_multipolygon_with_bad_part_fails_whole_call() {
        let good = polygon![(x: -0.14, y: 51.495), (x: -0.12, y: 51.495), (x: -0.12, y: 51.505)];
        let bad = polygon![(x: 170.0, y: 0.0), (x: -170.0, y: 0.0), (x: -170.0, y: 1.0)];
        let result = polygon_to_cells(
            MultiPolygon::new(vec![good, bad]),
            &CoverageOptions::default(),
        );
        assert!(matches!(result, Err(CoverError::Antimeridian { .. })));
    }

    #[test]
    fn test_multipolygon_parts_merged_and_budgeted() -> Result<()> {
        let a = rect_polygon(2.0, 48.0, 2.1, 48.1);
        let b = rect_polygon(13.0, 52.0, 13.1, 52.1);
        let options = CoverageOptions::new().with_max_precision(6).with_max_cells(300);

        let both = cover(MultiPolygon::new(vec![a.clone(), b.clone()]), &options)?;
        let only_a = cover(a, &options.with_max_precision(both.precision))?;
        let only_b = cover(b, &options.with_max_precision(both.precision))?;

        assert!(both.len() <= 300);
        assert_eq!(both.len(), only_a.len() + only_b.len());
        assert!(only_a.iter().all(|c| both.cells.contains(&c.to_string())));
        assert_no_ancestors(&both.cells);
        Ok(())
    }

    #[test]
    fn test_overlapping_parts_are_deduplicated() -> Result<()> {
        let a = rect_polygon(2.0, 48.0, 2.1, 48.1);
        let options = CoverageOptions::new().with_max_precision(5);
        let single = cover(a.clone(), &options)?;
        let doubled = cover(MultiPolygon::new(vec![a.clone(), a]), &options)?;
        assert_eq!(single.cells, doubled.cells);
        Ok(())
    }

    #[test]
    fn test_lower_threshold_never_needs_more_cells() -> Result<()> {
        let poly: Polygon<f64> = polygon![
            (x: 10.0, y: 10.0),
            (x: 10.6, y: 10.1),
            (x: 10.5, y: 10.7),
            (x: 10.2, y: 10.4),
            (x: 9.9, y: 10.6),
        ];
        let base = CoverageOptions::new()
            .with_min_precision(2)
            .with_max_precision(5)
            .with_max_cells(100_000);
        let coarse = cover(poly.clone(), &base.with_merge_threshold(0.0))?;
        let fine = cover(poly, &base.with_merge_threshold(1.0))?;
        assert_eq!(coarse.precision, fine.precision);
        assert!(coarse.len() <= fine.len());
        Ok(())
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = CoverageOptions::new().with_merge_threshold(f64::INFINITY);
        let result = cover(london_rect(), &options);
        assert!(matches!(result, Err(CoverError::InvalidOption(_))));
    }

    fn rect_polygon(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon<f64> {
        Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y }).to_polygon()
    }

    #[test]
    fn test_coarse_attempt_is_bounded_at_high_min_precision() {
        // A 1° square holds millions of precision-8 cells; the coarse attempt
        // must give up at the bailout limit instead of enumerating them.
        let options = CoverageOptions::new()
            .with_min_precision(8)
            .with_max_precision(9)
            .with_max_cells(500);
        match cover(rect_polygon(2.0, 48.0, 3.0, 49.0), &options) {
            Err(CoverError::Sizing {
                max_cells,
                min_feasible,
                min_precision,
            }) => {
                assert_eq!(max_cells, 500);
                assert_eq!(min_precision, 8);
                assert!(min_feasible > options.bailout_limit());
            }
            other => panic!("expected sizing error, got {:?}", other),
        }
    }

    #[test]
    fn test_no_cell_coarser_than_min_precision() -> Result<()> {
        let ring = vec![(-12.0, 44.0), (1.0, 44.0), (1.0, 51.0), (-12.0, 51.0)];
        for max_precision in [3, 5] {
            for threshold in [0.0, 1.0] {
                let options = CoverageOptions::new()
                    .with_min_precision(3)
                    .with_max_precision(max_precision)
                    .with_merge_threshold(threshold);
                let coverage = cover(ring.clone(), &options)?;
                assert!(coverage.len() <= 500);
                assert!(
                    coverage.iter().all(|c| c.len() >= 3),
                    "cells coarser than precision 3: {:?}",
                    coverage.cells
                );
            }
        }
        Ok(())
    }

    #[test]
    fn test_coarse_attempt_accepted_when_finer_rungs_miss() -> Result<()> {
        // West 40% of "gcpvj": one cell at precision 5, sixteen at precision 6.
        let cell = decode_bounds("gcpvj")?;
        let eps = 1e-7;
        let west = cell.min().x + cell.width() * 0.4;
        let poly = rect_polygon(cell.min().x + eps, cell.min().y + eps, west, cell.max().y - eps);
        let options = CoverageOptions::new()
            .with_min_precision(5)
            .with_max_precision(6)
            .with_max_cells(1);

        let coverage = cover(poly, &options)?;
        assert!(coverage.coarse_fallback);
        assert_eq!(coverage.precision, 5);
        assert_eq!(coverage.merge_threshold, 0.0);
        assert_eq!(coverage.cells, vec!["gcpvj"]);
        Ok(())
    }

    #[test]
    fn test_overlapping_parts_share_bailout_by_distinct_cells() -> Result<()> {
        // "u09" grown by a hair: 1024 interior and 132 rim cells at precision 5,
        // which fits under the 1200-cell bailout once but not when counted twice.
        let cell = decode_bounds("u09")?;
        let eps = 1e-6;
        let part = rect_polygon(
            cell.min().x - eps,
            cell.min().y - eps,
            cell.max().x + eps,
            cell.max().y + eps,
        );
        let options = CoverageOptions::new().with_max_precision(5).with_max_cells(300);

        let single = cover(part.clone(), &options)?;
        let doubled = cover(MultiPolygon::new(vec![part.clone(), part]), &options)?;
        assert_eq!(single.precision, 5);
        assert_eq!(doubled, single);
        Ok(())
    }
}
