/// The 32-symbol geohash alphabet, indexed by 5-bit value.
pub const BASE32_ALPHABET: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Number of children of every cell.
pub const CHILDREN_PER_CELL: usize = 32;

/// Coarsest precision a covering may use.
pub const MIN_PRECISION: u8 = 1;

/// Finest precision a covering may use.
pub const MAX_PRECISION: u8 = 9;

/// Longest id the grid will decode (60 bits of interleaved lon/lat).
pub const MAX_CELL_LENGTH: usize = 12;

/// A subdivision pass is abandoned once its committed set exceeds
/// `max_cells * BAILOUT_MULTIPLIER`.
pub const BAILOUT_MULTIPLIER: usize = 4;

/// Sibling count required to merge at `merge_threshold = 0`.
pub const MERGE_SIBLINGS_BASE: f64 = 24.0;

/// Extra siblings required as `merge_threshold` goes from 0 to 1.
pub const MERGE_SIBLINGS_SPAN: f64 = 8.0;

/// Largest longitude delta allowed between consecutive ring vertices.
pub const MAX_EDGE_LON_SPAN: f64 = 180.0;

/// Default cell budget.
pub const DEFAULT_MAX_CELLS: usize = 500;
