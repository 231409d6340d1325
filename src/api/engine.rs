//! Single subdivision pass over one normalised polygon.
//!
//! The pass walks the cell tree depth-first from the 32 precision-1 cells
//! using an explicit work stack, so the pending set never exceeds
//! `32 * (max_precision - depth)` entries regardless of polygon size.
//!
//! For each popped cell:
//!
//! ```text
//! fully inside effective area ──► len >= interior_min ? commit : push 32 children
//! at max_precision             ──► commit if it overlaps the effective area
//! partial overlap              ──► per child: bbox reject, then
//!                                   fully inside  → commit (deep enough) or push
//!                                   overlapping   → push
//!                                   outside       → drop
//! ```
//!
//! `interior_min = ceil(min + (max - min) * threshold)`, so threshold 1 tiles
//! the interior uniformly at `max_precision` and threshold 0 lets interior
//! cells stop as coarse as `min_precision`.

use crate::core::grid::Grid;
use crate::core::predicates::rects_intersect;
use crate::core::ring::NormalisedPolygon;
use crate::util::error::Result;

/// Result of one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// Every committed cell, uncompacted, in commit order.
    Complete(Vec<String>),
    /// The committed set outgrew the bailout limit; nothing is kept.
    Bailout { committed: usize },
}

impl PassOutcome {
    pub fn into_cells(self) -> Option<Vec<String>> {
        match self {
            PassOutcome::Complete(cells) => Some(cells),
            PassOutcome::Bailout { .. } => None,
        }
    }
}

/// Parameters of a single subdivision pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoveragePass {
    pub min_precision: u8,
    pub max_precision: u8,
    pub threshold: f64,
    pub bailout: Option<usize>,
}

impl CoveragePass {
    pub fn new(min_precision: u8, max_precision: u8, threshold: f64) -> Self {
        Self {
            min_precision: min_precision.min(max_precision),
            max_precision,
            threshold: threshold.clamp(0.0, 1.0),
            bailout: None,
        }
    }

    pub fn with_bailout(mut self, limit: Option<usize>) -> Self {
        self.bailout = limit;
        self
    }

    /// Minimum length at which a fully-inside cell may be committed.
    pub fn interior_min_precision(&self) -> usize {
        let min = self.min_precision as f64;
        let span = self.max_precision.saturating_sub(self.min_precision) as f64;
        let raw = (min + span * self.threshold).ceil() as usize;
        raw.clamp(self.min_precision as usize, self.max_precision as usize)
    }

    pub fn run<G: Grid>(&self, grid: &G, polygon: &NormalisedPolygon) -> Result<PassOutcome> {
        let interior_min = self.interior_min_precision();
        let max = self.max_precision as usize;
        let bbox = *polygon.bbox();

        let mut committed: Vec<String> = Vec::new();
        let mut stack: Vec<String> = Vec::new();

        for cell in grid.children("") {
            let rect = grid.bounds(&cell)?;
            if rects_intersect(&rect, &bbox) && polygon.overlaps(&rect) {
                stack.push(cell);
            }
        }

        while let Some(cell) = stack.pop() {
            let rect = grid.bounds(&cell)?;

            if polygon.fully_covers(&rect) {
                if cell.len() >= interior_min {
                    committed.push(cell);
                } else {
                    stack.extend(grid.children(&cell));
                }
            } else if cell.len() >= max {
                if polygon.overlaps(&rect) {
                    committed.push(cell);
                }
            } else {
                for child in grid.children(&cell) {
                    let child_rect = grid.bounds(&child)?;
                    if !rects_intersect(&child_rect, &bbox) {
                        continue;
                    }
                    if polygon.fully_covers(&child_rect) {
                        if child.len() >= interior_min {
                            committed.push(child);
                        } else {
                            stack.push(child);
                        }
                    } else if polygon.overlaps(&child_rect) {
                        stack.push(child);
                    }
                }
            }

            if let Some(limit) = self.bailout {
                if committed.len() > limit {
                    tracing::debug!(
                        committed = committed.len(),
                        limit,
                        max_precision = self.max_precision,
                        "subdivision pass bailed out"
                    );
                    return Ok(PassOutcome::Bailout {
                        committed: committed.len(),
                    });
                }
            }
        }

        Ok(PassOutcome::Complete(committed))
    }
}
