//! Planar geometry predicates over (longitude, latitude) coordinates.
//!
//! Two tie-break rules are fixed here and relied on by the coverage engine:
//!
//! - a point lying exactly on a ring edge (or vertex) is inside the ring;
//! - segments that touch, including collinear overlap and shared endpoints,
//!   intersect.
//!
//! Rings are open vertex lists: the closing edge from the last vertex back to
//! the first is implied. Every predicate is linear in the ring length, so
//! callers reject by bounding box first (see [`rects_intersect`]).

use geo_types::{Coord, Rect, coord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// Orientation of the ordered triple `(p, q, r)` by the sign of the cross product.
pub fn orientation(p: Coord<f64>, q: Coord<f64>, r: Coord<f64>) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if val == 0.0 {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Given collinear `p`, `q`, `r`, whether `q` lies on segment `pr` (endpoints included).
pub fn on_segment(p: Coord<f64>, q: Coord<f64>, r: Coord<f64>) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Whether segment `p1q1` and segment `p2q2` share at least one point.
pub fn segments_intersect(p1: Coord<f64>, q1: Coord<f64>, p2: Coord<f64>, q2: Coord<f64>) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
        || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
        || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
        || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
}

fn edges(ring: &[Coord<f64>]) -> impl Iterator<Item = (Coord<f64>, Coord<f64>)> + '_ {
    let n = ring.len();
    (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
}

fn rect_corners(rect: &Rect<f64>) -> [Coord<f64>; 4] {
    let (min, max) = (rect.min(), rect.max());
    [
        coord! { x: min.x, y: min.y },
        coord! { x: max.x, y: min.y },
        coord! { x: max.x, y: max.y },
        coord! { x: min.x, y: max.y },
    ]
}

fn rect_edges(rect: &Rect<f64>) -> [(Coord<f64>, Coord<f64>); 4] {
    let [a, b, c, d] = rect_corners(rect);
    [(a, b), (b, c), (c, d), (d, a)]
}

fn point_on_boundary(point: Coord<f64>, ring: &[Coord<f64>]) -> bool {
    edges(ring).any(|(a, b)| {
        orientation(a, b, point) == Orientation::Collinear && on_segment(a, point, b)
    })
}

/// Ray-casting parity test. Points on the boundary count as inside.
pub fn point_in_polygon(point: Coord<f64>, ring: &[Coord<f64>]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    if point_on_boundary(point, ring) {
        return true;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (pi, pj) = (ring[i], ring[j]);
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Inclusive point-in-rectangle test.
pub fn point_in_rect(point: Coord<f64>, rect: &Rect<f64>) -> bool {
    point.x >= rect.min().x
        && point.x <= rect.max().x
        && point.y >= rect.min().y
        && point.y <= rect.max().y
}

/// Inclusive overlap test between two axis-aligned rectangles.
pub fn rects_intersect(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min().x <= b.max().x
        && a.max().x >= b.min().x
        && a.min().y <= b.max().y
        && a.max().y >= b.min().y
}

/// Whether `inner` lies entirely within `outer` (boundaries may coincide).
pub fn rect_within(inner: &Rect<f64>, outer: &Rect<f64>) -> bool {
    inner.min().x >= outer.min().x
        && inner.max().x <= outer.max().x
        && inner.min().y >= outer.min().y
        && inner.max().y <= outer.max().y
}

/// All four corners are inside the ring and no ring edge touches a rectangle edge.
///
/// The edge test matters for concave rings, which can contain all four corners
/// while their boundary still cuts through the rectangle.
pub fn bounds_fully_inside_polygon(rect: &Rect<f64>, ring: &[Coord<f64>]) -> bool {
    if !rect_corners(rect)
        .iter()
        .all(|&corner| point_in_polygon(corner, ring))
    {
        return false;
    }

    let sides = rect_edges(rect);
    !edges(ring).any(|(a, b)| {
        sides
            .iter()
            .any(|&(c, d)| segments_intersect(a, b, c, d))
    })
}

/// The rectangle and the ring's interior or boundary share at least one point.
pub fn bounds_overlaps_polygon(rect: &Rect<f64>, ring: &[Coord<f64>]) -> bool {
    if rect_corners(rect)
        .iter()
        .any(|&corner| point_in_polygon(corner, ring))
    {
        return true;
    }

    if ring.iter().any(|&v| point_in_rect(v, rect)) {
        return true;
    }

    let sides = rect_edges(rect);
    edges(ring).any(|(a, b)| {
        sides
            .iter()
            .any(|&(c, d)| segments_intersect(a, b, c, d))
    })
}
