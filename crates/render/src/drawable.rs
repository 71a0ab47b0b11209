//! The drawable tree handed to the renderer.
//!
//! A frame is rebuilt from scratch on every call: the caller owns these values
//! and the renderer only borrows them.

use crate::interaction::EventHandler;
use crate::random::SeededRandom;
use crate::style::{CompositeOperation, Fill, Stroke};
use common::color::ColorSource;
use common::error::DrawResult;
use common::geometry::{PathPoint, Point};
use common::image::PixelBuffer;
use common::polygon::Polygon;
use gpu::{ShaderProgram, Uniform};
use std::f64::consts::TAU;
use std::fmt;
use std::sync::Arc;

/// Produces the children of a [`Seed`] from its scoped random source.
/// Errors raised while producing abort the frame.
pub type SeedProducer = Arc<dyn Fn(&mut SeededRandom) -> DrawResult<Vec<Drawable>> + Send + Sync>;

/// In-place transform of the surface pixels.
pub type ImageTransform = Arc<dyn Fn(&mut PixelBuffer) + Send + Sync>;

/// Closed polygon with straight edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub points: Vec<PathPoint>,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
}

impl Shape {
    pub fn new<P: Into<PathPoint>>(points: impl IntoIterator<Item = P>) -> Self {
        Self {
            points: points.into_iter().map(Into::into).collect(),
            fill: None,
            stroke: None,
        }
    }

    pub fn from_polygon(polygon: &Polygon) -> Self {
        Self::new(polygon.points.iter().copied())
    }

    /// One drawing unit square with its lower-left corner at `corner`.
    pub fn pixel(corner: Point, fill: impl Into<Fill>) -> Self {
        let Point { x, y, .. } = corner;
        Self::new([
            Point::new(x, y),
            Point::new(x + 1.0, y),
            Point::new(x + 1.0, y + 1.0),
            Point::new(x, y + 1.0),
        ])
        .with_fill(fill)
    }

    pub fn with_fill(mut self, fill: impl Into<Fill>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

/// Closed path through its points with synthesized curvature.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoothShape {
    pub points: Vec<PathPoint>,
    pub smoothness: f64,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
}

impl SmoothShape {
    pub fn new<P: Into<PathPoint>>(points: impl IntoIterator<Item = P>, smoothness: f64) -> Self {
        Self {
            points: points.into_iter().map(Into::into).collect(),
            smoothness,
            fill: None,
            stroke: None,
        }
    }

    pub fn with_fill(mut self, fill: impl Into<Fill>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

/// Circular arc from `start_angle` to `end_angle`, counter-clockwise in
/// frame coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct CircularArc {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
}

impl CircularArc {
    pub fn new(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
            fill: None,
            stroke: None,
        }
    }

    /// Arc over the full turn.
    pub fn circle(center: Point, radius: f64) -> Self {
        Self::new(center, radius, 0.0, TAU)
    }

    pub fn is_full_circle(&self) -> bool {
        self.start_angle == 0.0 && self.end_angle == TAU
    }

    pub fn with_fill(mut self, fill: impl Into<Fill>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

/// Open polyline.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub points: Vec<PathPoint>,
    pub stroke: Option<Stroke>,
}

impl Line {
    pub fn new<P: Into<PathPoint>>(points: impl IntoIterator<Item = P>) -> Self {
        Self {
            points: points.into_iter().map(Into::into).collect(),
            stroke: None,
        }
    }

    /// Single segment.
    pub fn segment(start: Point, end: Point) -> Self {
        Self::new([start, end])
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

/// Open path through its points with synthesized curvature.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoothLine {
    pub points: Vec<PathPoint>,
    pub smoothness: f64,
    pub stroke: Option<Stroke>,
}

impl SmoothLine {
    pub fn new<P: Into<PathPoint>>(points: impl IntoIterator<Item = P>, smoothness: f64) -> Self {
        Self {
            points: points.into_iter().map(Into::into).collect(),
            smoothness,
            stroke: None,
        }
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

/// Shapes that can bound a [`Clip`].
#[derive(Clone, Debug, PartialEq)]
pub enum ClipShape {
    Shape(Shape),
    Smooth(SmoothShape),
}

impl From<Shape> for ClipShape {
    fn from(shape: Shape) -> Self {
        ClipShape::Shape(shape)
    }
}

impl From<SmoothShape> for ClipShape {
    fn from(shape: SmoothShape) -> Self {
        ClipShape::Smooth(shape)
    }
}

/// Children drawn only inside `shape`.
#[derive(Clone, Debug)]
pub struct Clip {
    pub shape: ClipShape,
    pub elements: Vec<Drawable>,
}

impl Clip {
    pub fn new(shape: impl Into<ClipShape>, elements: Vec<Drawable>) -> Self {
        Self {
            shape: shape.into(),
            elements,
        }
    }
}

/// Children drawn with their origin moved by `(x, y)`.
#[derive(Clone, Debug)]
pub struct Translate {
    pub x: f64,
    pub y: f64,
    pub elements: Vec<Drawable>,
}

impl Translate {
    pub fn new(x: f64, y: f64, elements: Vec<Drawable>) -> Self {
        Self { x, y, elements }
    }
}

/// Children drawn on a separate layer, then composited onto the frame.
#[derive(Clone, Debug)]
pub struct Overlay {
    pub elements: Vec<Drawable>,
    pub composition: Option<CompositeOperation>,
}

impl Overlay {
    pub fn new(elements: Vec<Drawable>) -> Self {
        Self {
            elements,
            composition: None,
        }
    }

    pub fn with_composition(mut self, composition: CompositeOperation) -> Self {
        self.composition = Some(composition);
        self
    }
}

/// Children produced from a random source seeded with `id`.
#[derive(Clone)]
pub struct Seed {
    pub id: u64,
    pub elements: SeedProducer,
}

impl Seed {
    pub fn new<F>(id: u64, elements: F) -> Self
    where
        F: Fn(&mut SeededRandom) -> DrawResult<Vec<Drawable>> + Send + Sync + 'static,
    {
        Self {
            id,
            elements: Arc::new(elements),
        }
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Pointer-sensitive polygon.
#[derive(Clone, Debug)]
pub struct ClickRegion {
    pub points: Vec<Point>,
    pub events: Vec<EventHandler>,
}

impl ClickRegion {
    pub fn new(points: Vec<Point>, events: Vec<EventHandler>) -> Self {
        Self { points, events }
    }
}

/// Children drawn once, the first time the bounding box of `points` comes
/// into view.
#[derive(Clone, Debug)]
pub struct RenderOnlyWhenVisible {
    pub points: Vec<Point>,
    pub elements: Vec<Drawable>,
}

impl RenderOnlyWhenVisible {
    pub fn new(points: Vec<Point>, elements: Vec<Drawable>) -> Self {
        Self { points, elements }
    }
}

/// GPU post-process of everything drawn so far.
#[derive(Clone, Debug, PartialEq)]
pub struct Shader {
    pub program: ShaderProgram,
    pub uniforms: Vec<Uniform>,
    pub composition: Option<CompositeOperation>,
}

impl Shader {
    pub fn new(program: ShaderProgram) -> Self {
        Self {
            program,
            uniforms: Vec::new(),
            composition: None,
        }
    }

    /// Program with a custom fragment stage and the default vertex stage.
    pub fn fragment(source: impl Into<String>) -> Self {
        Self::new(ShaderProgram::new().with_fragment(source))
    }

    pub fn with_uniform(mut self, uniform: Uniform) -> Self {
        self.uniforms.push(uniform);
        self
    }

    pub fn with_composition(mut self, composition: CompositeOperation) -> Self {
        self.composition = Some(composition);
        self
    }
}

/// Read-modify-write of the surface pixels.
#[derive(Clone)]
pub struct UpdateImageData {
    pub transform: ImageTransform,
}

impl UpdateImageData {
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(&mut PixelBuffer) + Send + Sync + 'static,
    {
        Self {
            transform: Arc::new(transform),
        }
    }
}

impl fmt::Debug for UpdateImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateImageData").finish_non_exhaustive()
    }
}

/// Every node kind the renderer knows how to draw.
#[derive(Clone, Debug)]
pub enum Drawable {
    Shape(Shape),
    SmoothShape(SmoothShape),
    Arc(CircularArc),
    Line(Line),
    SmoothLine(SmoothLine),
    Clip(Clip),
    Translate(Translate),
    Overlay(Overlay),
    Seed(Seed),
    ClickRegion(ClickRegion),
    RenderOnlyWhenVisible(RenderOnlyWhenVisible),
    Shader(Shader),
    UpdateImageData(UpdateImageData),
}

impl Drawable {
    /// Variant name, used for trace spans.
    pub fn kind(&self) -> &'static str {
        match self {
            Drawable::Shape(_) => "Shape",
            Drawable::SmoothShape(_) => "SmoothShape",
            Drawable::Arc(_) => "Arc",
            Drawable::Line(_) => "Line",
            Drawable::SmoothLine(_) => "SmoothLine",
            Drawable::Clip(_) => "Clip",
            Drawable::Translate(_) => "Translate",
            Drawable::Overlay(_) => "Overlay",
            Drawable::Seed(_) => "Seed",
            Drawable::ClickRegion(_) => "ClickRegion",
            Drawable::RenderOnlyWhenVisible(_) => "RenderOnlyWhenVisible",
            Drawable::Shader(_) => "Shader",
            Drawable::UpdateImageData(_) => "UpdateImageData",
        }
    }
}

macro_rules! impl_from_variant {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Drawable {
                fn from(value: $ty) -> Self {
                    Drawable::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant! {
    Shape => Shape,
    SmoothShape => SmoothShape,
    CircularArc => Arc,
    Line => Line,
    SmoothLine => SmoothLine,
    Clip => Clip,
    Translate => Translate,
    Overlay => Overlay,
    Seed => Seed,
    ClickRegion => ClickRegion,
    RenderOnlyWhenVisible => RenderOnlyWhenVisible,
    Shader => Shader,
    UpdateImageData => UpdateImageData,
}

impl From<ClipShape> for Drawable {
    fn from(shape: ClipShape) -> Self {
        match shape {
            ClipShape::Shape(shape) => Drawable::Shape(shape),
            ClipShape::Smooth(shape) => Drawable::SmoothShape(shape),
        }
    }
}

/// Frame outline, painted under the background.
#[derive(Clone, Debug, PartialEq)]
pub struct Border {
    pub color: ColorSource,
    pub width: f64,
}

impl Border {
    pub fn new(color: impl Into<ColorSource>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

/// Root of one render call.
#[derive(Clone, Debug, Default)]
pub struct FrameDefinition {
    pub background: Option<ColorSource>,
    pub border: Option<Border>,
    pub elements: Vec<Drawable>,
    /// Applied after every element has been drawn.
    pub shader: Option<Shader>,
}

impl FrameDefinition {
    pub fn new(elements: Vec<Drawable>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }

    pub fn with_background(mut self, background: impl Into<ColorSource>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    pub fn with_shader(mut self, shader: Shader) -> Self {
        self.shader = Some(shader);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::color::Color;

    #[test]
    fn test_pixel_is_unit_square() {
        let pixel = Shape::pixel(Point::weighted(2.0, 3.0, 5.0), Color::black());
        let polygon = Polygon::new(pixel.points.iter().map(PathPoint::position).collect());
        assert_eq!(polygon.area(), 1.0);
        assert_eq!(pixel.points[0].position(), Point::new(2.0, 3.0));
        assert_eq!(pixel.points[2].position(), Point::new(3.0, 4.0));
        assert!(pixel.fill.is_some());
    }

    #[test]
    fn test_shape_from_polygon() {
        let polygon = Polygon::from_rect(0.0, 0.0, 2.0, 1.0);
        let shape = Shape::from_polygon(&polygon).with_fill(Color::white());
        assert_eq!(shape.points.len(), 4);
        assert_eq!(shape.fill.as_ref().map(|f| f.opacity), Some(1.0));
    }

    #[test]
    fn test_circle_is_full_turn() {
        assert!(CircularArc::circle(Point::ZERO, 1.0).is_full_circle());
        assert!(!CircularArc::new(Point::ZERO, 1.0, 0.0, 1.0).is_full_circle());
    }

    #[test]
    fn test_kind_names() {
        let seed: Drawable = Seed::new(3, |_| Ok(Vec::new())).into();
        assert_eq!(seed.kind(), "Seed");
        assert!(format!("{:?}", seed).contains("id: 3"));

        let clip: Drawable = ClipShape::from(Shape::new([Point::ZERO])).into();
        assert_eq!(clip.kind(), "Shape");
    }
}
