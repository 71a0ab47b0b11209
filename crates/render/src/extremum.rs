//! Gradient axis placement.
//!
//! A linear gradient at some angle has to start and end where the painted
//! shape does. The points are projected onto the axis perpendicular to the
//! gradient; the lowest and highest become the stops, and the far stop is
//! re-projected so the pair lies exactly along the requested angle.

use common::error::{DrawError, DrawResult};
use common::geometry::{angle, distance_from_rotated_abscissa, Point};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Signed distance of `point` from the axis through the origin at
/// `normalized`.
fn signed_distance(point: Point, normalized: f64) -> f64 {
    let distance = distance_from_rotated_abscissa(point, normalized);
    let quadrant = normalized % PI;
    if quadrant < FRAC_PI_2 && quadrant > angle(Point::ZERO, point) {
        -distance
    } else {
        distance
    }
}

/// Start and end of a linear gradient at `axis_angle` covering `points`.
pub fn find_extremum_points(points: &[Point], axis_angle: f64) -> DrawResult<(Point, Point)> {
    let (first, rest) = points
        .split_first()
        .ok_or_else(|| DrawError::degenerate("cannot place a gradient axis without points"))?;

    let normalized = (axis_angle + FRAC_PI_2 + TAU) % TAU;
    let invert = normalized >= 3.0 * FRAC_PI_2 || normalized < FRAC_PI_2;

    let initial = signed_distance(*first, normalized);
    let (mut min_distance, mut min_index) = (initial, 0);
    let (mut max_distance, mut max_index) = (initial, 0);
    for (offset, point) in rest.iter().enumerate() {
        let distance = signed_distance(*point, normalized);
        if distance < min_distance {
            min_distance = distance;
            min_index = offset + 1;
        } else if distance > max_distance {
            max_distance = distance;
            max_index = offset + 1;
        }
    }

    let min = points[min_index];
    let max = points[max_index];
    let (sin, cos) = axis_angle.sin_cos();
    let dot = (max.x - min.x) * cos + (max.y - min.y) * sin;
    let end = Point::new(min.x + dot * cos, min.y + dot * sin);

    Ok(if invert { (end, min) } else { (min, end) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::geometry::is_point_equal;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x, y + h),
            Point::new(x + w, y + h),
            Point::new(x + w, y),
        ]
    }

    #[test]
    fn test_rectangle_at_angle_zero() {
        let (start, end) = find_extremum_points(&rect(1.0, 2.0, 4.0, 3.0), 0.0).unwrap();
        assert!((start.x - 1.0).abs() < 1e-9);
        assert!((end.x - 5.0).abs() < 1e-9);
        assert!((start.y - end.y).abs() < 1e-9);
    }

    #[test]
    fn test_result_is_aligned_with_angle() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 1.0),
            Point::new(1.0, 4.0),
            Point::new(-2.0, 2.0),
        ];
        for step in 0..16 {
            let axis = step as f64 * PI / 8.0 + 0.1;
            let (start, end) = find_extremum_points(&points, axis).unwrap();
            if is_point_equal(start, end, 1e-9) {
                continue;
            }
            let direction = angle(start, end);
            let cross = (direction - axis).sin();
            assert!(cross.abs() < 1e-9, "axis {} gave direction {}", axis, direction);
        }
    }

    #[test]
    fn test_single_point() {
        let p = Point::new(2.0, 3.0);
        let (start, end) = find_extremum_points(&[p], 1.0).unwrap();
        assert!(is_point_equal(start, p, 1e-9));
        assert!(is_point_equal(end, p, 1e-9));
    }

    #[test]
    fn test_empty_points() {
        assert!(matches!(
            find_extremum_points(&[], 0.0),
            Err(DrawError::DegenerateGeometry(_))
        ));
    }
}
