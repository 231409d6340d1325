pub mod constants;
pub mod grid;
pub mod predicates;
pub mod ring;

pub use constants::{
    BAILOUT_MULTIPLIER, BASE32_ALPHABET, DEFAULT_MAX_CELLS, MAX_PRECISION, MERGE_SIBLINGS_BASE,
    MERGE_SIBLINGS_SPAN, MIN_PRECISION,
};
pub use grid::{Geohash, Grid, decode, decode_bounds, encode};
pub use predicates::{
    bounds_fully_inside_polygon, bounds_overlaps_polygon, point_in_polygon, segments_intersect,
};
pub use ring::{NormalisedPolygon, Ring};
