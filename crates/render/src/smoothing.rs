//! Cubic Bézier synthesis from weighted path points.
//!
//! Each interior [`PathPoint::Point`] gets two handles on the tangent through
//! its neighbours, each reaching `distance to neighbour * weight * smoothness`
//! from the vertex. [`PathPoint::Curve`] vertices bring their own handles.

use common::error::{DrawError, DrawResult};
use common::geometry::{angle, distance, PathPoint, Point};

/// One cubic segment; it starts where the previous one ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicSegment {
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

/// A smoothed path ready to be replayed on a surface.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoothPath {
    pub start: Point,
    pub segments: Vec<CubicSegment>,
    pub closed: bool,
}

impl SmoothPath {
    /// Path vertices, first included.
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.start).chain(self.segments.iter().map(|s| s.end))
    }

    /// Every control handle in path order.
    pub fn control_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments.iter().flat_map(|s| [s.control1, s.control2])
    }
}

/// Build the Bézier segments for `points`.
///
/// Endpoints contribute no curvature unless they are curve points.
pub fn smooth_path(points: &[PathPoint], smoothness: f64, closed: bool) -> DrawResult<SmoothPath> {
    if points.len() < 2 {
        return Err(DrawError::degenerate(format!(
            "smoothing needs at least 2 points, got {}",
            points.len()
        )));
    }

    let last = points.len() - 1;
    // controls[i] holds the handles of the segment from points[i] to points[i + 1].
    let mut controls: Vec<(Point, Point)> = Vec::with_capacity(last);
    let mut outgoing = match &points[0] {
        PathPoint::Curve(curve) => curve.next_control,
        PathPoint::Point(point) => *point,
    };

    for i in 1..last {
        let (incoming, next_outgoing) = match &points[i] {
            PathPoint::Curve(curve) => (curve.prev_control, curve.next_control),
            PathPoint::Point(current) => {
                let previous = points[i - 1].position();
                let next = points[i + 1].position();
                let tangent = angle(previous, next);
                let reach_back = distance(previous, *current) * current.weight * smoothness;
                let reach_forward = distance(*current, next) * current.weight * smoothness;
                (
                    current.translate_vector(-reach_back, tangent),
                    current.translate_vector(reach_forward, tangent),
                )
            }
        };
        controls.push((outgoing, incoming));
        outgoing = next_outgoing;
    }

    let incoming = match &points[last] {
        PathPoint::Curve(curve) => curve.prev_control,
        PathPoint::Point(point) => *point,
    };
    controls.push((outgoing, incoming));

    let segments = controls
        .into_iter()
        .zip(&points[1..])
        .map(|((control1, control2), end)| CubicSegment {
            control1,
            control2,
            end: end.position(),
        })
        .collect();

    Ok(SmoothPath {
        start: points[0].position(),
        segments,
        closed,
    })
}
