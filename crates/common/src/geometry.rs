//! Geometric primitives.
//!
//! Coordinates are `f64` in drawing units. The y axis points up once the
//! frame transform is applied; nothing in here depends on that.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

/// Tolerance used by [`is_point_equal`].
pub const DISTANCE_EPSILON: f64 = 0.001;

/// A 2D point carrying a smoothing weight.
///
/// The weight only matters to the smoothing engine, where it scales how far
/// synthesized control handles reach from the vertex. Equality compares
/// positions within [`DISTANCE_EPSILON`] and ignores the weight.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        is_point_equal(*self, *other, DISTANCE_EPSILON)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0, weight: 1.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, weight: 1.0 }
    }

    #[inline]
    pub const fn weighted(x: f64, y: f64, weight: f64) -> Self {
        Self { x, y, weight }
    }

    /// Same position, different weight.
    #[inline]
    pub fn with_weight(self, weight: f64) -> Self {
        Self { weight, ..self }
    }

    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        distance(*self, other)
    }

    #[inline]
    pub fn angle_to(&self, other: Point) -> f64 {
        angle(*self, other)
    }

    /// Move the point `distance` units along `angle`.
    #[inline]
    pub fn translate_vector(&self, distance: f64, angle: f64) -> Point {
        Point::weighted(
            self.x + distance * angle.cos(),
            self.y + distance * angle.sin(),
            self.weight,
        )
    }

    #[inline]
    pub fn translate(&self, dx: f64, dy: f64) -> Point {
        Point::weighted(self.x + dx, self.y + dy, self.weight)
    }

    #[inline]
    pub fn mirror_x(&self) -> Point {
        Point::weighted(-self.x, self.y, self.weight)
    }

    /// Rotate around `center` by `rotation` radians.
    pub fn rotate(&self, center: Point, rotation: f64) -> Point {
        let own_angle = angle(Point::ZERO, Point::new(self.x - center.x, self.y - center.y));
        let moved = center.translate_vector(distance(center, *self), own_angle + rotation);
        moved.with_weight(self.weight)
    }

    #[inline]
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        in_between(*self, other, t)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::weighted(self.x + rhs.x, self.y + rhs.y, self.weight)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::weighted(self.x - rhs.x, self.y - rhs.y, self.weight)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::weighted(self.x * rhs, self.y * rhs, self.weight)
    }
}

/// A vertex with explicit incoming and outgoing Bézier handles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
    pub prev_control: Point,
    pub next_control: Point,
}

impl CurvePoint {
    pub const fn new(x: f64, y: f64, prev_control: Point, next_control: Point) -> Self {
        Self { x, y, prev_control, next_control }
    }

    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A path vertex: either a weighted point or a curve point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PathPoint {
    Point(Point),
    Curve(CurvePoint),
}

impl From<Point> for PathPoint {
    fn from(point: Point) -> Self {
        PathPoint::Point(point)
    }
}

impl From<CurvePoint> for PathPoint {
    fn from(point: CurvePoint) -> Self {
        PathPoint::Curve(point)
    }
}

impl PathPoint {
    #[inline]
    pub fn x(&self) -> f64 {
        match self {
            PathPoint::Point(p) => p.x,
            PathPoint::Curve(c) => c.x,
        }
    }

    #[inline]
    pub fn y(&self) -> f64 {
        match self {
            PathPoint::Point(p) => p.y,
            PathPoint::Curve(c) => c.y,
        }
    }

    /// The vertex position. Curve points report a weight of 1.
    #[inline]
    pub fn position(&self) -> Point {
        match self {
            PathPoint::Point(p) => *p,
            PathPoint::Curve(c) => c.position(),
        }
    }

    /// Move the vertex (and any handles) `distance` units along `angle`.
    pub fn translate_vector(&self, distance: f64, angle: f64) -> PathPoint {
        match self {
            PathPoint::Point(p) => PathPoint::Point(p.translate_vector(distance, angle)),
            PathPoint::Curve(c) => {
                let moved = c.position().translate_vector(distance, angle);
                PathPoint::Curve(CurvePoint::new(
                    moved.x,
                    moved.y,
                    c.prev_control.translate_vector(distance, angle),
                    c.next_control.translate_vector(distance, angle),
                ))
            }
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> PathPoint {
        match self {
            PathPoint::Point(p) => PathPoint::Point(p.translate(dx, dy)),
            PathPoint::Curve(c) => PathPoint::Curve(CurvePoint::new(
                c.x + dx,
                c.y + dy,
                Point::new(c.prev_control.x + dx, c.prev_control.y + dy),
                Point::new(c.next_control.x + dx, c.next_control.y + dy),
            )),
        }
    }

    /// Mirror across the y axis. Curve handles swap roles so the path
    /// direction stays consistent.
    pub fn mirror_x(&self) -> PathPoint {
        match self {
            PathPoint::Point(p) => PathPoint::Point(p.mirror_x()),
            PathPoint::Curve(c) => PathPoint::Curve(CurvePoint::new(
                -c.x,
                c.y,
                Point::new(-c.next_control.x, c.next_control.y),
                Point::new(-c.prev_control.x, c.prev_control.y),
            )),
        }
    }

    pub fn rotate(&self, center: Point, rotation: f64) -> PathPoint {
        match self {
            PathPoint::Point(p) => PathPoint::Point(p.rotate(center, rotation)),
            PathPoint::Curve(c) => {
                let moved = c.position().rotate(center, rotation);
                PathPoint::Curve(CurvePoint::new(
                    moved.x,
                    moved.y,
                    Point::new(c.prev_control.x, c.prev_control.y).rotate(center, rotation),
                    Point::new(c.next_control.x, c.next_control.y).rotate(center, rotation),
                ))
            }
        }
    }

    /// Replace the vertex by a plain point with the given weight.
    pub fn weighted(&self, weight: f64) -> PathPoint {
        PathPoint::Point(Point::weighted(self.x(), self.y(), weight))
    }

    /// Jitter the vertex and its handles by up to `amount / 2` on each axis.
    pub fn displace<R: Rng + ?Sized>(&self, amount: f64, rng: &mut R) -> PathPoint {
        let mut jitter = |p: Point| {
            let dx = (rng.gen::<f64>() - 0.5) * amount;
            let dy = (rng.gen::<f64>() - 0.5) * amount;
            p.translate(dx, dy)
        };
        match self {
            PathPoint::Point(p) => PathPoint::Point(jitter(*p)),
            PathPoint::Curve(c) => {
                let moved = jitter(c.position());
                let prev = jitter(Point::new(c.prev_control.x, c.prev_control.y));
                let next = jitter(Point::new(c.next_control.x, c.next_control.y));
                PathPoint::Curve(CurvePoint::new(moved.x, moved.y, prev, next))
            }
        }
    }
}

/// Axis-aligned rectangle, origin at its minimum corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Bounding box of a point set, `None` when the set is empty.
    pub fn bounding<I>(points: I) -> Option<Rect>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.top()
    }

    /// Overlap test. Touching edges count as intersecting so that zero-size
    /// boxes on the viewport border are still observed.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.top()
            && self.top() >= other.y
    }

    #[inline]
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    #[inline]
    pub fn inflate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x - dx, self.y - dy, self.width + dx * 2.0, self.height + dy * 2.0)
    }

    #[inline]
    pub fn diagonal(&self) -> f64 {
        (self.width * self.width + self.height * self.height).sqrt()
    }
}

#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Angle of the vector from `a` to `b`.
#[inline]
pub fn angle(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Unsigned distance from `point` to the line through the origin at `angle`.
#[inline]
pub fn distance_from_rotated_abscissa(point: Point, angle: f64) -> f64 {
    (point.x * (-angle).sin() + point.y * (-angle).cos()).abs()
}

#[inline]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians * (180.0 / PI)
}

/// Position-only equality within `epsilon`.
#[inline]
pub fn is_point_equal(a: Point, b: Point, epsilon: f64) -> bool {
    (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon
}

/// Cubic Bézier evaluation.
pub fn bezier_at(start: Point, end: Point, control1: Point, control2: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    Point::new(
        a * start.x + b * control1.x + c * control2.x + d * end.x,
        a * start.y + b * control1.y + c * control2.y + d * end.y,
    )
}

/// Point in 3D space, for curves evaluated outside the drawing plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Cubic Bézier evaluation in 3D.
pub fn bezier_at_3d(start: Point3D, end: Point3D, control1: Point3D, control2: Point3D, t: f64) -> Point3D {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    let blend = |s: f64, c1: f64, c2: f64, e: f64| a * s + b * c1 + c * c2 + d * e;
    Point3D::new(
        blend(start.x, control1.x, control2.x, end.x),
        blend(start.y, control1.y, control2.y, end.y),
        blend(start.z, control1.z, control2.z, end.z),
    )
}

/// Linear interpolation between two positions.
#[inline]
pub fn in_between(start: Point, end: Point, t: f64) -> Point {
    Point::new(start.x * (1.0 - t) + end.x * t, start.y * (1.0 - t) + end.y * t)
}
