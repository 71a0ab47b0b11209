//! Polygon utilities: area, centroid, containment and sampling.

use crate::error::{DrawError, DrawResult};
use crate::geometry::{angle, Point, Rect};
use crate::intersection::{segment_parameters, Edge};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Origin of the containment ray used by [`Polygon::contains`].
///
/// Geometry reaching past this point, or collinear with it and the test
/// point, can be misclassified. Use [`Polygon::contains_from`] in that case.
pub const DEFAULT_FAR_POINT: Point = Point::new(-100.0, -100.0);

/// Rejection sampling gives up after this many misses by default.
pub const DEFAULT_SAMPLE_ATTEMPTS: usize = 10_000;

/// Signed areas below this are treated as zero.
const AREA_EPSILON: f64 = 1e-12;

/// An ordered list of vertices, implicitly closed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    /// Regular polygon inscribed in a circle, first vertex at `phase`.
    pub fn from_circle(center: Point, radius: f64, edges: usize, phase: f64) -> Self {
        let points = (0..edges)
            .map(|index| {
                let theta = PI * 2.0 * (index as f64 / edges as f64) + phase;
                Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
            })
            .collect();
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Pairs of (previous vertex, vertex), wrapping around.
    fn vertex_pairs(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let len = self.points.len();
        (0..len).map(move |i| (self.points[(i + len - 1) % len], self.points[i]))
    }

    /// Shoelace area, always non-negative.
    pub fn area(&self) -> f64 {
        let twice: f64 = self
            .vertex_pairs()
            .map(|(pj, pi)| (pj.x + pi.x) * (pj.y - pi.y))
            .sum();
        (twice / 2.0).abs()
    }

    /// Centroid.
    ///
    /// Divides by the signed area accumulated from the same cross terms, so
    /// both windings give the same point. Fails on zero-area polygons.
    pub fn center(&self) -> DrawResult<Point> {
        let mut center_x = 0.0;
        let mut center_y = 0.0;
        let mut twice_area = 0.0;
        for (pj, pi) in self.vertex_pairs() {
            let coef = pj.x * pi.y - pi.x * pj.y;
            center_x += (pj.x + pi.x) * coef;
            center_y += (pj.y + pi.y) * coef;
            twice_area += coef;
        }

        let signed_area = twice_area / 2.0;
        if !signed_area.is_finite() || signed_area.abs() < AREA_EPSILON {
            return Err(DrawError::degenerate(format!(
                "polygon with {} points has zero area, no centroid",
                self.points.len()
            )));
        }
        Ok(Point::new(center_x / 6.0 / signed_area, center_y / 6.0 / signed_area))
    }

    /// Edges from each vertex to the next, wrapping around.
    pub fn edges(&self) -> Vec<Edge> {
        let len = self.points.len();
        (0..len)
            .map(|i| Edge::new(self.points[i], self.points[(i + 1) % len]))
            .collect()
    }

    /// Edges from each vertex's predecessor to the vertex, in vertex order.
    /// This is the outline a caller strokes segment by segment.
    pub fn lines(&self) -> Vec<Edge> {
        self.vertex_pairs().map(|(start, end)| Edge::new(start, end)).collect()
    }

    pub fn bounding_box(&self) -> Option<Rect> {
        Rect::bounding(self.points.iter().copied())
    }

    /// Ray-casting containment from [`DEFAULT_FAR_POINT`].
    pub fn contains(&self, point: Point) -> bool {
        self.contains_from(point, DEFAULT_FAR_POINT)
    }

    /// Ray-casting containment: an odd number of edge crossings on the
    /// segment from `far_point` to `point` means inside.
    ///
    /// Edges are half-open (end vertex excluded) so a ray passing exactly
    /// through a shared vertex counts it once.
    pub fn contains_from(&self, point: Point, far_point: Point) -> bool {
        let ray = Edge::new(far_point, point);
        let crossings = self
            .edges()
            .iter()
            .filter(|edge| match segment_parameters(&ray, edge) {
                Some((ua, ub)) => (0.0..=1.0).contains(&ua) && (0.0..1.0).contains(&ub),
                None => false,
            })
            .count();
        crossings % 2 == 1
    }

    /// Uniform rejection sampling inside the bounding box, at most
    /// `max_attempts` draws.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, max_attempts: usize) -> DrawResult<Point> {
        let bounds = self
            .bounding_box()
            .ok_or_else(|| DrawError::degenerate("cannot sample an empty polygon"))?;

        for _ in 0..max_attempts {
            let candidate = Point::new(
                bounds.x + rng.gen::<f64>() * bounds.width,
                bounds.y + rng.gen::<f64>() * bounds.height,
            );
            if self.contains(candidate) {
                return Ok(candidate);
            }
        }

        Err(DrawError::SamplingFailed { attempts: max_attempts })
    }

    /// Push every vertex `amount` units away from the centroid.
    pub fn stretch(&self, amount: f64) -> DrawResult<Polygon> {
        let center = self.center()?;
        Ok(Polygon::new(
            self.points
                .iter()
                .map(|p| p.translate_vector(amount, angle(center, *p)))
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_square() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ])
    }

    #[test]
    fn test_unit_square_area() {
        assert_eq!(unit_square().area(), 1.0);
    }

    #[test]
    fn test_unit_square_center() {
        let center = unit_square().center().unwrap();
        assert!((center.x - 0.5).abs() < 1e-12);
        assert!((center.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_center_ignores_winding() {
        let mut reversed = unit_square();
        reversed.points.reverse();
        let center = reversed.center().unwrap();
        assert!((center.x - 0.5).abs() < 1e-12);
        assert!((center.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_center() {
        let line = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
        ]);
        assert!(matches!(line.center(), Err(DrawError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_contains() {
        let square = unit_square();
        assert!(square.contains(Point::new(0.5, 0.5)));
        assert!(!square.contains(Point::new(2.0, 2.0)));
    }

    #[test]
    fn test_contains_from_custom_far_point() {
        let square = unit_square();
        assert!(square.contains_from(Point::new(0.25, 0.75), Point::new(-50.0, 13.0)));
    }

    #[test]
    fn test_sample_lands_inside() {
        let triangle = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let p = triangle.sample(&mut rng, DEFAULT_SAMPLE_ATTEMPTS).unwrap();
            assert!(triangle.contains(p));
        }
    }

    #[test]
    fn test_sample_gives_up_on_flat_polygon() {
        let flat = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
        ]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = flat.sample(&mut rng, 50).unwrap_err();
        assert!(matches!(err, DrawError::SamplingFailed { attempts: 50 }));
    }

    #[test]
    fn test_from_circle_and_stretch() {
        let hexagon = Polygon::from_circle(Point::new(1.0, 1.0), 2.0, 6, 0.0);
        assert_eq!(hexagon.len(), 6);
        assert!((hexagon.points[0].x - 3.0).abs() < 1e-12);

        let bigger = hexagon.stretch(1.0).unwrap();
        assert!((bigger.points[0].x - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_lines_close_the_outline() {
        let lines = unit_square().lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].start, Point::new(0.0, 1.0));
        assert_eq!(lines[0].end, Point::new(0.0, 0.0));
    }
}
