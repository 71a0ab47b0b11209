//! Segment intersection and probe casting.

use crate::geometry::{distance, is_point_equal, Point, DISTANCE_EPSILON};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Half-length of the probe used by [`find_intersection`] when the caller
/// does not provide one.
pub const DEFAULT_PROBE_LENGTH: f64 = 10_000.0;

/// A directed segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
}

impl Edge {
    #[inline]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.start.x == self.end.x && self.start.y == self.end.y
    }

    #[inline]
    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }
}

/// Edges joining consecutive points, wrapping around to the first point.
/// Edges starting at an index listed in `excluding` are skipped.
pub fn edges_from_points(points: &[Point], excluding: &[usize]) -> Vec<Edge> {
    let len = points.len();
    (0..len)
        .filter(|i| !excluding.contains(i))
        .map(|i| Edge::new(points[i], points[(i + 1) % len]))
        .collect()
}

/// Parametric coordinates `(ua, ub)` of the crossing of the lines through
/// `a` and `b`, or `None` for zero-length or parallel segments.
pub fn segment_parameters(a: &Edge, b: &Edge) -> Option<(f64, f64)> {
    if a.is_degenerate() || b.is_degenerate() {
        return None;
    }

    let denominator = (b.end.y - b.start.y) * (a.end.x - a.start.x)
        - (b.end.x - b.start.x) * (a.end.y - a.start.y);
    if denominator == 0.0 {
        return None;
    }

    let ua = ((b.end.x - b.start.x) * (a.start.y - b.start.y)
        - (b.end.y - b.start.y) * (a.start.x - b.start.x))
        / denominator;
    let ub = ((a.end.x - a.start.x) * (a.start.y - b.start.y)
        - (a.end.y - a.start.y) * (a.start.x - b.start.x))
        / denominator;
    Some((ua, ub))
}

/// Intersection point of two segments.
///
/// Returns `None` for zero-length segments, parallel segments, or when the
/// crossing lies outside either segment.
pub fn get_intersection(a: &Edge, b: &Edge) -> Option<Point> {
    let (ua, ub) = segment_parameters(a, b)?;
    if !(0.0..=1.0).contains(&ua) || !(0.0..=1.0).contains(&ub) {
        return None;
    }

    Some(Point::new(
        a.start.x + ua * (a.end.x - a.start.x),
        a.start.y + ua * (a.end.y - a.start.y),
    ))
}

/// Nearest intersection of a probe line through `start` along `angle` with
/// any of `edges`, ignoring points equal to one in `excluded`.
pub fn find_intersection(
    edges: &[Edge],
    start: Point,
    angle: f64,
    excluded: &[Point],
) -> Option<Point> {
    find_intersection_within(edges, start, angle, excluded, DEFAULT_PROBE_LENGTH)
}

/// Same as [`find_intersection`] with an explicit probe half-length.
///
/// The probe spans `start ± probe_length` along `angle`; distances are
/// measured from its far negative end, so the result is the first crossing
/// met walking along the direction of `angle`.
pub fn find_intersection_within(
    edges: &[Edge],
    start: Point,
    angle: f64,
    excluded: &[Point],
    probe_length: f64,
) -> Option<Point> {
    let (dx, dy) = (probe_length * angle.cos(), probe_length * angle.sin());
    let probe = Edge::new(
        Point::new(start.x - dx, start.y - dy),
        Point::new(start.x + dx, start.y + dy),
    );

    edges
        .iter()
        .filter_map(|edge| get_intersection(edge, &probe))
        .filter(|hit| {
            excluded
                .iter()
                .all(|option| !is_point_equal(*option, *hit, DISTANCE_EPSILON))
        })
        .min_by_key(|hit| OrderedFloat(distance(probe.start, *hit)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn edge(x1: f64, y1: f64, x2: f64, y2: f64) -> Edge {
        Edge::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn test_crossing_diagonals() {
        let hit = get_intersection(&edge(0.0, 0.0, 2.0, 2.0), &edge(0.0, 2.0, 2.0, 0.0)).unwrap();
        assert!((hit.x - 1.0).abs() < 1e-12);
        assert!((hit.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_segments() {
        assert!(get_intersection(&edge(0.0, 0.0, 1.0, 0.0), &edge(0.0, 1.0, 1.0, 1.0)).is_none());
    }

    #[test]
    fn test_zero_length_segment() {
        assert!(get_intersection(&edge(1.0, 1.0, 1.0, 1.0), &edge(0.0, 2.0, 2.0, 0.0)).is_none());
    }

    #[test]
    fn test_crossing_outside_segments() {
        assert!(get_intersection(&edge(0.0, 0.0, 1.0, 1.0), &edge(3.0, 0.0, 2.0, 1.0)).is_none());
    }

    #[test]
    fn test_edges_from_points_wraps_and_skips() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0)];
        let edges = edges_from_points(&points, &[1]);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[1].end, points[0]);
    }

    #[test]
    fn test_find_intersection_nearest_along_direction() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ];
        let edges = edges_from_points(&square, &[]);
        let hit = find_intersection(&edges, Point::new(2.0, 2.0), 0.0, &[]).unwrap();
        assert!((hit.x - 0.0).abs() < 1e-9);

        let hit = find_intersection(&edges, Point::new(2.0, 2.0), 0.0, &[Point::new(0.0, 2.0)])
            .unwrap();
        assert!((hit.x - 4.0).abs() < 1e-9);

        let up = find_intersection(&edges, Point::new(2.0, 2.0), PI / 2.0, &[]).unwrap();
        assert!(up.y.abs() < 1e-9);
    }

    #[test]
    fn test_find_intersection_none() {
        let edges = [edge(0.0, 0.0, 1.0, 0.0)];
        assert!(find_intersection_within(&edges, Point::new(0.0, 5.0), 0.0, &[], 100.0).is_none());
    }
}
