use crate::core::constants::{CHILDREN_PER_CELL, MERGE_SIBLINGS_BASE, MERGE_SIBLINGS_SPAN};
use crate::core::grid::{is_valid, parent};
use crate::util::error::{CoverError, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Number of present siblings (out of 32) needed to replace them with their parent.
///
/// `round(24 + threshold * 8)`: a threshold of 1 only merges complete groups,
/// 0 merges any group with at least 24 of 32 children.
pub fn min_siblings_for_threshold(threshold: f64) -> usize {
    let t = if threshold.is_finite() {
        threshold.clamp(0.0, 1.0)
    } else {
        1.0
    };
    (MERGE_SIBLINGS_BASE + t * MERGE_SIBLINGS_SPAN).round() as usize
}

/// Bottom-up consolidation of a cell set: ancestor dedup, then sibling merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compactor {
    min_siblings: usize,
    floor: usize,
}

impl Default for Compactor {
    fn default() -> Self {
        Self::lossless()
    }
}

impl Compactor {
    /// `min_siblings` is clamped into `1..=32`.
    pub fn new(min_siblings: usize) -> Self {
        Self {
            min_siblings: min_siblings.clamp(1, CHILDREN_PER_CELL),
            floor: 1,
        }
    }

    /// Never merge into a parent shorter than `precision`.
    pub fn with_floor(mut self, precision: u8) -> Self {
        self.floor = usize::from(precision.max(1));
        self
    }

    /// Only complete 32/32 groups merge; the covered area never grows.
    pub fn lossless() -> Self {
        Self::new(CHILDREN_PER_CELL)
    }

    pub fn from_threshold(threshold: f64) -> Self {
        Self::new(min_siblings_for_threshold(threshold))
    }

    pub fn min_siblings(&self) -> usize {
        self.min_siblings
    }

    pub fn floor(&self) -> usize {
        self.floor
    }

    /// Compacts `cells`, returning them sorted and free of ancestor/descendant pairs.
    ///
    /// Merges cascade: a parent produced at one level can complete a group at
    /// the next level up.
    pub fn compact<I, S>(&self, cells: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: BTreeSet<String> = cells.into_iter().map(Into::into).collect();
        remove_descendants(&mut set);

        let finest = set.iter().map(String::len).max().unwrap_or(0);
        for level in (self.floor + 1..=finest).rev() {
            let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for cell in set.iter().filter(|c| c.len() == level) {
                if let Some(p) = parent(cell) {
                    groups.entry(p.to_string()).or_default().push(cell.clone());
                }
            }

            for (p, siblings) in groups {
                if siblings.len() >= self.min_siblings {
                    for sibling in &siblings {
                        set.remove(sibling);
                    }
                    set.insert(p);
                }
            }
        }

        // A lossy merge can swallow a partially-present sibling's descendants.
        remove_descendants(&mut set);
        tracing::trace!(cells = set.len(), min_siblings = self.min_siblings, "compacted");
        set.into_iter().collect()
    }
}

fn remove_descendants(set: &mut BTreeSet<String>) {
    let doomed: Vec<String> = set
        .iter()
        .filter(|cell| {
            (1..cell.len()).any(|k| cell.get(..k).is_some_and(|prefix| set.contains(prefix)))
        })
        .cloned()
        .collect();
    for cell in doomed {
        set.remove(&cell);
    }
}

/// Validates caller-supplied cell ids and compacts them at `merge_threshold`.
///
/// # Example
/// ```
/// use geohash_cover::compact_cells;
///
/// # fn main() -> Result<(), geohash_cover::CoverError> {
/// let cells = compact_cells(&["gcpv", "gcp", "u10"], 1.0)?;
/// assert_eq!(cells, vec!["gcp".to_string(), "u10".to_string()]);
/// # Ok(())
/// # }
/// ```
pub fn compact_cells<S: AsRef<str>>(cells: &[S], merge_threshold: f64) -> Result<Vec<String>> {
    if !merge_threshold.is_finite() {
        return Err(CoverError::InvalidOption(format!(
            "merge_threshold must be finite, got {}",
            merge_threshold
        )));
    }
    if let Some(bad) = cells.iter().find(|c| !is_valid(c.as_ref())) {
        return Err(CoverError::InvalidCell(bad.as_ref().to_string()));
    }
    Ok(Compactor::from_threshold(merge_threshold).compact(cells.iter().map(|c| c.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::children;
    use proptest::prelude::*;

    #[test]
    fn test_threshold_to_siblings() {
        assert_eq!(min_siblings_for_threshold(1.0), 32);
        assert_eq!(min_siblings_for_threshold(0.0), 24);
        assert_eq!(min_siblings_for_threshold(0.75), 30);
        assert_eq!(min_siblings_for_threshold(0.5), 28);
        assert_eq!(min_siblings_for_threshold(7.0), 32);
    }

    #[test]
    fn test_all_siblings_collapse_to_parent() {
        let cells = children("gcp");
        assert_eq!(Compactor::from_threshold(1.0).compact(cells), vec!["gcp"]);
    }

    #[test]
    fn test_thirty_of_thirty_two_siblings() {
        let cells: Vec<String> = children("gcp").into_iter().take(30).collect();

        let lossless = Compactor::from_threshold(1.0).compact(cells.clone());
        assert_eq!(lossless.len(), 30);
        assert_eq!(lossless.iter().collect::<BTreeSet<_>>().len(), 30);

        let lossy = Compactor::new(30).compact(cells);
        assert_eq!(lossy, vec!["gcp"]);
    }

    #[test]
    fn test_ancestor_dedup() {
        let compacted = Compactor::lossless().compact(["u4pr", "u4p", "u4prs", "u5"]);
        assert_eq!(compacted, vec!["u4p", "u5"]);
    }

    #[test]
    fn test_merges_cascade_upward() {
        let cells: Vec<String> = children("gc").iter().flat_map(|c| children(c)).collect();
        assert_eq!(cells.len(), 1024);
        assert_eq!(Compactor::lossless().compact(cells), vec!["gc"]);
    }

    #[test]
    fn test_lossy_merge_drops_swallowed_descendants() {
        // 31 children of "gcp" plus grandchildren under the missing 32nd child.
        let mut cells: Vec<String> = children("gcp").into_iter().take(31).collect();
        cells.extend(children("gcpz").into_iter().take(3));
        let compacted = Compactor::new(30).compact(cells);
        assert_eq!(compacted, vec!["gcp"]);
    }

    #[test]
    fn test_floor_stops_merging_above_it() {
        let cells: Vec<String> = children("gc").iter().flat_map(|c| children(c)).collect();
        let compacted = Compactor::lossless().with_floor(3).compact(cells);
        assert_eq!(compacted.len(), 32);
        assert!(compacted.iter().all(|c| c.len() == 3));

        // Nothing to merge when every cell already sits at the floor.
        let at_floor = Compactor::new(24).with_floor(3).compact(children("gc"));
        assert_eq!(at_floor, children("gc"));
    }

    #[test]
    fn test_output_is_sorted() {
        let compacted = Compactor::lossless().compact(["u10", "9q8", "gcp", "dr5"]);
        assert_eq!(compacted, vec!["9q8", "dr5", "gcp", "u10"]);
    }

    #[test]
    fn test_compact_cells_validates() {
        assert!(matches!(
            compact_cells(&["gcp", "ail"], 1.0),
            Err(CoverError::InvalidCell(_))
        ));
        assert!(matches!(
            compact_cells(&["gcp"], f64::NAN),
            Err(CoverError::InvalidOption(_))
        ));
    }

    fn cell_strategy() -> impl Strategy<Value = String> {
        proptest::collection::vec(0usize..32, 1..5).prop_map(|digits| {
            digits
                .into_iter()
                .map(|d| crate::core::constants::BASE32_ALPHABET[d] as char)
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_compaction_is_idempotent(
            cells in proptest::collection::vec(cell_strategy(), 0..200),
            min_siblings in 1usize..=32,
        ) {
            let compactor = Compactor::new(min_siblings);
            let once = compactor.compact(cells);
            let twice = compactor.compact(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_no_ancestor_pairs(
            cells in proptest::collection::vec(cell_strategy(), 0..200),
            min_siblings in 1usize..=32,
        ) {
            let out = Compactor::new(min_siblings).compact(cells);
            for a in &out {
                for b in &out {
                    prop_assert!(a == b || !b.starts_with(a.as_str()));
                }
            }
        }
    }
}
