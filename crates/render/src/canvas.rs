//! Raster [`Surface`] backed by a tiny-skia pixmap.

use crate::style::{CompositeOperation, Filter, LineCap, LineJoin};
use crate::surface::{ColorStops, Paint, Rgba, Surface};
use common::error::{DrawError, DrawResult};
use common::geometry::Point;
use common::image::PixelBuffer;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::Path as FsPath;
use std::sync::Arc;
use tiny_skia::{
    BlendMode, ColorU8, FillRule, FilterQuality, GradientStop, LinearGradient, Mask, Path,
    PathBuilder, Pixmap, PixmapPaint, RadialGradient, Shader, SpreadMode, Transform,
};

/// Canvas default for `miterLimit`.
const MITER_LIMIT: f32 = 10.0;

#[derive(Clone)]
struct CanvasState {
    transform: Transform,
    global_alpha: f64,
    composite: CompositeOperation,
    filter: Filter,
    fill_paint: Paint,
    stroke_paint: Paint,
    line_width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    clip: Option<Arc<Mask>>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            global_alpha: 1.0,
            composite: CompositeOperation::SourceOver,
            filter: Filter::None,
            fill_paint: Paint::default(),
            stroke_paint: Paint::default(),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            clip: None,
        }
    }
}

/// In-memory raster canvas.
pub struct Canvas {
    pixmap: Pixmap,
    state: CanvasState,
    stack: Vec<CanvasState>,
    path: PathBuilder,
    has_current_point: bool,
}

impl Canvas {
    /// Transparent canvas of `width` x `height` device pixels.
    pub fn new(width: u32, height: u32) -> DrawResult<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| DrawError::surface(format!("cannot allocate a {}x{} pixmap", width, height)))?;
        Ok(Self {
            pixmap,
            state: CanvasState::default(),
            stack: Vec::new(),
            path: PathBuilder::new(),
            has_current_point: false,
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight RGBA value of one device pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    /// Number of saved states.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Write the canvas as a PNG file.
    pub fn save_png(&self, path: impl AsRef<FsPath>) -> DrawResult<()> {
        self.pixmap
            .save_png(path.as_ref())
            .map_err(|err| DrawError::surface(err.to_string()))
    }

    fn current_path(&self) -> Option<Path> {
        self.path.clone().finish()
    }

    fn skia_paint(&self, paint: &Paint) -> Option<tiny_skia::Paint<'static>> {
        let alpha = self.state.global_alpha.clamp(0.0, 1.0) as f32;
        let shader = match paint {
            Paint::Solid(rgba) => Shader::SolidColor(skia_color(*rgba, alpha)),
            Paint::LinearGradient { start, end, stops } => LinearGradient::new(
                skia_point(*start),
                skia_point(*end),
                gradient_stops(stops, alpha),
                SpreadMode::Pad,
                Transform::identity(),
            )?,
            Paint::RadialGradient { center, radius, stops } => RadialGradient::new(
                skia_point(*center),
                skia_point(*center),
                *radius as f32,
                gradient_stops(stops, alpha),
                SpreadMode::Pad,
                Transform::identity(),
            )?,
        };
        Some(tiny_skia::Paint {
            shader,
            blend_mode: blend_mode(self.state.composite),
            anti_alias: true,
            force_hq_pipeline: false,
        })
    }

    fn skia_stroke(&self) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width: self.state.line_width as f32,
            miter_limit: MITER_LIMIT,
            line_cap: match self.state.line_cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match self.state.line_join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            dash: None,
        }
    }

    /// Paint `path` with the current filter, transform and clip.
    fn draw_path(
        &mut self,
        path: &Path,
        mut paint: tiny_skia::Paint<'static>,
        stroke: Option<&tiny_skia::Stroke>,
    ) -> DrawResult<()> {
        let transform = self.state.transform;
        let clip = self.state.clip.as_deref();
        match self.state.filter {
            Filter::Blur(sigma) if sigma > 0.0 => {
                let blend = paint.blend_mode;
                paint.blend_mode = BlendMode::SourceOver;
                let mut layer = Pixmap::new(self.pixmap.width(), self.pixmap.height())
                    .ok_or_else(|| DrawError::surface("cannot allocate a filter layer"))?;
                render_path(&mut layer, path, &paint, stroke, transform, None);
                box_blur(&mut layer, sigma);
                self.pixmap.draw_pixmap(
                    0,
                    0,
                    layer.as_ref(),
                    &PixmapPaint {
                        opacity: 1.0,
                        blend_mode: blend,
                        quality: FilterQuality::Nearest,
                    },
                    Transform::identity(),
                    clip,
                );
            }
            _ => render_path(&mut self.pixmap, path, &paint, stroke, transform, clip),
        }
        Ok(())
    }
}

fn render_path(
    target: &mut Pixmap,
    path: &Path,
    paint: &tiny_skia::Paint<'_>,
    stroke: Option<&tiny_skia::Stroke>,
    transform: Transform,
    clip: Option<&Mask>,
) {
    match stroke {
        Some(stroke) => target.stroke_path(path, paint, stroke, transform, clip),
        None => target.fill_path(path, paint, FillRule::Winding, transform, clip),
    }
}

fn skia_point(point: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(point.x as f32, point.y as f32)
}

fn skia_color(rgba: Rgba, alpha: f32) -> tiny_skia::Color {
    let mut color = tiny_skia::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    color.apply_opacity(alpha);
    color
}

fn gradient_stops(stops: &ColorStops, alpha: f32) -> Vec<GradientStop> {
    stops
        .iter()
        .map(|stop| GradientStop::new(stop.offset as f32, skia_color(stop.color, alpha)))
        .collect()
}

pub(crate) fn blend_mode(operation: CompositeOperation) -> BlendMode {
    match operation {
        CompositeOperation::SourceOver => BlendMode::SourceOver,
        CompositeOperation::SourceIn => BlendMode::SourceIn,
        CompositeOperation::SourceOut => BlendMode::SourceOut,
        CompositeOperation::SourceAtop => BlendMode::SourceAtop,
        CompositeOperation::DestinationOver => BlendMode::DestinationOver,
        CompositeOperation::DestinationIn => BlendMode::DestinationIn,
        CompositeOperation::DestinationOut => BlendMode::DestinationOut,
        CompositeOperation::DestinationAtop => BlendMode::DestinationAtop,
        CompositeOperation::Lighter => BlendMode::Plus,
        CompositeOperation::Copy => BlendMode::Source,
        CompositeOperation::Xor => BlendMode::Xor,
        CompositeOperation::Multiply => BlendMode::Multiply,
        CompositeOperation::Screen => BlendMode::Screen,
        CompositeOperation::Overlay => BlendMode::Overlay,
        CompositeOperation::Darken => BlendMode::Darken,
        CompositeOperation::Lighten => BlendMode::Lighten,
        CompositeOperation::ColorDodge => BlendMode::ColorDodge,
        CompositeOperation::ColorBurn => BlendMode::ColorBurn,
        CompositeOperation::HardLight => BlendMode::HardLight,
        CompositeOperation::SoftLight => BlendMode::SoftLight,
        CompositeOperation::Difference => BlendMode::Difference,
        CompositeOperation::Exclusion => BlendMode::Exclusion,
        CompositeOperation::Hue => BlendMode::Hue,
        CompositeOperation::Saturation => BlendMode::Saturation,
        CompositeOperation::Color => BlendMode::Color,
        CompositeOperation::Luminosity => BlendMode::Luminosity,
    }
}

/// Three box passes approximating a gaussian of deviation `sigma`.
fn box_blur(pixmap: &mut Pixmap, sigma: f64) {
    let ideal = (12.0 * sigma * sigma / 3.0 + 1.0).sqrt();
    let radius = ((ideal - 1.0) / 2.0).round().max(1.0) as usize;
    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let data = pixmap.data_mut();
    let mut scratch = vec![0u8; data.len()];
    for _ in 0..3 {
        blur_pass(data, &mut scratch, width, height, radius, true);
        blur_pass(&scratch, data, width, height, radius, false);
    }
}

/// One box pass over premultiplied RGBA, clamping at the edges.
fn blur_pass(src: &[u8], dst: &mut [u8], width: usize, height: usize, radius: usize, horizontal: bool) {
    let (lines, length) = if horizontal { (height, width) } else { (width, height) };
    let index = |line: usize, pos: usize| {
        if horizontal {
            (line * width + pos) * 4
        } else {
            (pos * width + line) * 4
        }
    };
    let window = (2 * radius + 1) as u32;
    for line in 0..lines {
        for channel in 0..4 {
            let sample = |pos: isize| {
                let clamped = pos.clamp(0, length as isize - 1) as usize;
                src[index(line, clamped) + channel] as u32
            };
            let mut sum: u32 = (-(radius as isize)..=radius as isize).map(sample).sum();
            for pos in 0..length {
                dst[index(line, pos) + channel] = ((sum + window / 2) / window) as u8;
                sum += sample(pos as isize + radius as isize + 1);
                sum -= sample(pos as isize - radius as isize);
            }
        }
    }
}

fn premultiplied_pixmap(image: &PixelBuffer) -> DrawResult<Pixmap> {
    let mut pixmap = Pixmap::new(image.width, image.height)
        .ok_or_else(|| DrawError::surface(format!("cannot allocate a {}x{} pixmap", image.width, image.height)))?;
    for (pixel, rgba) in pixmap.pixels_mut().iter_mut().zip(image.data.chunks_exact(4)) {
        *pixel = ColorU8::from_rgba(rgba[0], rgba[1], rgba[2], rgba[3]).premultiply();
    }
    Ok(pixmap)
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform.pre_translate(dx as f32, dy as f32);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform = self.state.transform.pre_scale(sx as f32, sy as f32);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        if alpha.is_finite() {
            self.state.global_alpha = alpha;
        }
    }

    fn set_composite_operation(&mut self, operation: CompositeOperation) {
        self.state.composite = operation;
    }

    fn set_filter(&mut self, filter: Filter) {
        if let Filter::Other(expr) = &filter {
            tracing::warn!(filter = %expr, "unsupported canvas filter ignored");
        }
        self.state.filter = filter;
    }

    fn set_fill_paint(&mut self, paint: Paint) {
        self.state.fill_paint = paint;
    }

    fn set_stroke_paint(&mut self, paint: Paint) {
        self.state.stroke_paint = paint;
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    fn begin_path(&mut self) {
        self.path = PathBuilder::new();
        self.has_current_point = false;
    }

    fn move_to(&mut self, point: Point) {
        self.path.move_to(point.x as f32, point.y as f32);
        self.has_current_point = true;
    }

    fn line_to(&mut self, point: Point) {
        if self.has_current_point {
            self.path.line_to(point.x as f32, point.y as f32);
        } else {
            self.move_to(point);
        }
    }

    fn bezier_curve_to(&mut self, control1: Point, control2: Point, end: Point) {
        if !self.has_current_point {
            self.move_to(control1);
        }
        self.path.cubic_to(
            control1.x as f32,
            control1.y as f32,
            control2.x as f32,
            control2.y as f32,
            end.x as f32,
            end.y as f32,
        );
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64) {
        let sweep = if end_angle - start_angle >= TAU {
            TAU
        } else {
            (end_angle - start_angle).rem_euclid(TAU)
        };
        let first = center.translate_vector(radius, start_angle);
        self.line_to(first);
        if sweep == 0.0 || radius <= 0.0 {
            return;
        }

        let count = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = sweep / count as f64;
        let handle = radius * 4.0 / 3.0 * (step / 4.0).tan();
        let mut from = start_angle;
        for _ in 0..count {
            let to = from + step;
            let p0 = center.translate_vector(radius, from);
            let p3 = center.translate_vector(radius, to);
            let c1 = Point::new(p0.x - handle * from.sin(), p0.y + handle * from.cos());
            let c2 = Point::new(p3.x + handle * to.sin(), p3.y - handle * to.cos());
            self.bezier_curve_to(c1, c2, p3);
            from = to;
        }
    }

    fn close_path(&mut self) {
        self.path.close();
    }

    fn fill(&mut self) -> DrawResult<()> {
        let Some(path) = self.current_path() else {
            return Ok(());
        };
        let Some(paint) = self.skia_paint(&self.state.fill_paint) else {
            return Ok(());
        };
        self.draw_path(&path, paint, None)
    }

    fn stroke(&mut self) -> DrawResult<()> {
        let Some(path) = self.current_path() else {
            return Ok(());
        };
        let Some(paint) = self.skia_paint(&self.state.stroke_paint) else {
            return Ok(());
        };
        let stroke = self.skia_stroke();
        self.draw_path(&path, paint, Some(&stroke))
    }

    fn clip(&mut self) -> DrawResult<()> {
        let transform = self.state.transform;
        let mask = match (self.current_path(), &self.state.clip) {
            (Some(path), Some(existing)) => {
                let mut mask = Mask::clone(existing);
                mask.intersect_path(&path, FillRule::Winding, true, transform);
                mask
            }
            (Some(path), None) => {
                let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())
                    .ok_or_else(|| DrawError::surface("cannot allocate a clip mask"))?;
                mask.fill_path(&path, FillRule::Winding, true, transform);
                mask
            }
            // An empty path clips everything away.
            (None, _) => Mask::new(self.pixmap.width(), self.pixmap.height())
                .ok_or_else(|| DrawError::surface("cannot allocate a clip mask"))?,
        };
        self.state.clip = Some(Arc::new(mask));
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> DrawResult<()> {
        let Some(rect) = tiny_skia::Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            return Ok(());
        };
        let path = PathBuilder::from_rect(rect);
        let Some(paint) = self.skia_paint(&self.state.fill_paint) else {
            return Ok(());
        };
        self.draw_path(&path, paint, None)
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn image_data(&self) -> PixelBuffer {
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.pixels() {
            let color = pixel.demultiply();
            data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
        PixelBuffer {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
            data,
        }
    }

    fn put_image_data(&mut self, image: &PixelBuffer) -> DrawResult<()> {
        if image.width != self.pixmap.width() || image.height != self.pixmap.height() {
            return Err(DrawError::surface(format!(
                "image is {}x{}, surface is {}x{}",
                image.width,
                image.height,
                self.pixmap.width(),
                self.pixmap.height()
            )));
        }
        self.pixmap = premultiplied_pixmap(image)?;
        Ok(())
    }

    fn composite(&mut self, image: &PixelBuffer, operation: CompositeOperation) -> DrawResult<()> {
        if image.is_empty() {
            return Ok(());
        }
        let source = premultiplied_pixmap(image)?;
        self.pixmap.draw_pixmap(
            0,
            0,
            source.as_ref(),
            &PixmapPaint {
                opacity: 1.0,
                blend_mode: blend_mode(operation),
                quality: FilterQuality::Nearest,
            },
            Transform::identity(),
            self.state.clip.as_deref(),
        );
        Ok(())
    }

    fn new_layer(&self) -> DrawResult<Self> {
        let mut layer = Canvas::new(self.pixmap.width(), self.pixmap.height())?;
        layer.state.transform = self.state.transform;
        Ok(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::ColorStop;
    use smallvec::smallvec;

    const RED: Rgba = [255, 0, 0, 255];
    const BLUE: Rgba = [0, 0, 255, 255];

    fn square(canvas: &mut Canvas, x: f64, y: f64, size: f64) {
        canvas.begin_path();
        canvas.move_to(Point::new(x, y));
        canvas.line_to(Point::new(x + size, y));
        canvas.line_to(Point::new(x + size, y + size));
        canvas.line_to(Point::new(x, y + size));
        canvas.close_path();
    }

    #[test]
    fn test_fill_path() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.set_fill_paint(Paint::Solid(RED));
        square(&mut canvas, 2.0, 2.0, 4.0);
        canvas.fill().unwrap();
        assert_eq!(canvas.pixel(3, 3), Some(RED));
        assert_eq!(canvas.pixel(8, 8), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_zero_size_canvas_is_an_error() {
        assert!(matches!(Canvas::new(0, 4), Err(DrawError::Surface(_))));
    }

    #[test]
    fn test_save_restore_transform_and_alpha() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.set_fill_paint(Paint::Solid(RED));
        canvas.save();
        canvas.translate(5.0, 5.0);
        canvas.set_global_alpha(0.0);
        canvas.restore();
        assert_eq!(canvas.depth(), 0);
        canvas.fill_rect(0.0, 0.0, 2.0, 2.0).unwrap();
        assert_eq!(canvas.pixel(1, 1), Some(RED));
        assert_eq!(canvas.pixel(6, 6), Some([0, 0, 0, 0]));

        // Unbalanced restore is ignored.
        canvas.restore();
    }

    #[test]
    fn test_flipped_transform() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.translate(0.0, 10.0);
        canvas.scale(1.0, -1.0);
        canvas.set_fill_paint(Paint::Solid(RED));
        canvas.fill_rect(0.0, 0.0, 10.0, 2.0).unwrap();
        // y = 0 in user space is the bottom row.
        assert_eq!(canvas.pixel(5, 9), Some(RED));
        assert_eq!(canvas.pixel(5, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_clip_limits_drawing() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.save();
        square(&mut canvas, 0.0, 0.0, 5.0);
        canvas.clip().unwrap();
        canvas.set_fill_paint(Paint::Solid(BLUE));
        canvas.fill_rect(0.0, 0.0, 10.0, 10.0).unwrap();
        canvas.restore();
        assert_eq!(canvas.pixel(2, 2), Some(BLUE));
        assert_eq!(canvas.pixel(7, 7), Some([0, 0, 0, 0]));

        // The clip is gone after restore.
        canvas.fill_rect(0.0, 0.0, 10.0, 10.0).unwrap();
        assert_eq!(canvas.pixel(7, 7), Some(BLUE));
    }

    #[test]
    fn test_full_circle_arc() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.set_fill_paint(Paint::Solid(RED));
        canvas.begin_path();
        canvas.arc(Point::new(10.0, 10.0), 8.0, 0.0, TAU);
        canvas.fill().unwrap();
        assert_eq!(canvas.pixel(10, 10), Some(RED));
        assert_eq!(canvas.pixel(10, 3), Some(RED));
        assert_eq!(canvas.pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_linear_gradient() {
        let mut canvas = Canvas::new(10, 1).unwrap();
        canvas.set_fill_paint(Paint::LinearGradient {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 0.0),
            stops: smallvec![
                ColorStop { offset: 0.0, color: RED },
                ColorStop { offset: 1.0, color: BLUE },
            ],
        });
        canvas.fill_rect(0.0, 0.0, 10.0, 1.0).unwrap();
        let left = canvas.pixel(0, 0).unwrap();
        let right = canvas.pixel(9, 0).unwrap();
        assert!(left[0] > 200 && left[2] < 55);
        assert!(right[2] > 200 && right[0] < 55);
    }

    #[test]
    fn test_image_data_write_back() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        let mut image = canvas.image_data();
        image.set_pixel(1, 2, [10, 20, 30, 255]);
        canvas.put_image_data(&image).unwrap();
        assert_eq!(canvas.pixel(1, 2), Some([10, 20, 30, 255]));

        let wrong = PixelBuffer::new(2, 2);
        assert!(matches!(canvas.put_image_data(&wrong), Err(DrawError::Surface(_))));
    }

    #[test]
    fn test_composite_destination_out() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.set_fill_paint(Paint::Solid(RED));
        canvas.fill_rect(0.0, 0.0, 4.0, 4.0).unwrap();

        let mut hole = PixelBuffer::new(4, 4);
        hole.set_pixel(0, 0, [0, 0, 0, 255]);
        canvas.composite(&hole, CompositeOperation::DestinationOut).unwrap();
        assert_eq!(canvas.pixel(0, 0).map(|p| p[3]), Some(0));
        assert_eq!(canvas.pixel(3, 3), Some(RED));
    }

    #[test]
    fn test_new_layer_keeps_transform() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.translate(5.0, 5.0);
        let mut layer = canvas.new_layer().unwrap();
        layer.set_fill_paint(Paint::Solid(RED));
        layer.fill_rect(0.0, 0.0, 1.0, 1.0).unwrap();
        assert_eq!(layer.pixel(5, 5), Some(RED));
        assert_eq!(layer.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_blur_filter_spreads_paint() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.set_fill_paint(Paint::Solid(RED));
        canvas.set_filter(Filter::Blur(2.0));
        canvas.fill_rect(8.0, 8.0, 4.0, 4.0).unwrap();
        let edge = canvas.pixel(6, 10).unwrap();
        assert!(edge[3] > 0 && edge[3] < 255);
        assert_eq!(canvas.pixel(0, 0).map(|p| p[3]), Some(0));
    }
}
