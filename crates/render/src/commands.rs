//! Recorded surface operations.
//!
//! [`RecordingSurface`] implements [`Surface`] by appending a
//! [`SurfaceCommand`] per call instead of painting. It is used to inspect the
//! order in which the traversal talks to the surface.

use crate::style::{CompositeOperation, Filter, LineCap, LineJoin};
use crate::surface::{Paint, Surface};
use common::error::{DrawError, DrawResult};
use common::geometry::Point;
use common::image::PixelBuffer;

/// A single surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCommand {
    Save,
    Restore,
    Translate(f64, f64),
    Scale(f64, f64),
    SetGlobalAlpha(f64),
    SetCompositeOperation(CompositeOperation),
    SetFilter(Filter),
    SetFillPaint(Paint),
    SetStrokePaint(Paint),
    SetLineWidth(f64),
    SetLineCap(LineCap),
    SetLineJoin(LineJoin),
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    BezierCurveTo(Point, Point, Point),
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    ClosePath,
    Fill,
    Stroke,
    Clip,
    FillRect(f64, f64, f64, f64),
    Clear,
    GetImageData,
    PutImageData,
    Composite(CompositeOperation),
    NewLayer,
}

impl SurfaceCommand {
    /// Whether the command puts paint on the surface.
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            SurfaceCommand::Fill
                | SurfaceCommand::Stroke
                | SurfaceCommand::FillRect(..)
                | SurfaceCommand::PutImageData
                | SurfaceCommand::Composite(_)
        )
    }
}

/// Surface that records calls and keeps a plain pixel buffer for image data.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    commands: Vec<SurfaceCommand>,
    image: PixelBuffer,
    depth: usize,
    max_depth: usize,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            commands: Vec::new(),
            image: PixelBuffer::new(width, height),
            depth: 0,
            max_depth: 0,
        }
    }

    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Saves not yet matched by a restore.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Deepest save nesting seen so far.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Only the commands that put paint on the surface.
    pub fn paints(&self) -> Vec<&SurfaceCommand> {
        self.commands.iter().filter(|c| c.is_paint()).collect()
    }

    /// Index of the first command equal to `command`.
    pub fn position(&self, command: &SurfaceCommand) -> Option<usize> {
        self.commands.iter().position(|c| c == command)
    }

    fn push(&mut self, command: SurfaceCommand) {
        self.commands.push(command);
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.image.width
    }

    fn height(&self) -> u32 {
        self.image.height
    }

    fn save(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.push(SurfaceCommand::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.push(SurfaceCommand::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.push(SurfaceCommand::Translate(dx, dy));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.push(SurfaceCommand::Scale(sx, sy));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.push(SurfaceCommand::SetGlobalAlpha(alpha));
    }

    fn set_composite_operation(&mut self, operation: CompositeOperation) {
        self.push(SurfaceCommand::SetCompositeOperation(operation));
    }

    fn set_filter(&mut self, filter: Filter) {
        self.push(SurfaceCommand::SetFilter(filter));
    }

    fn set_fill_paint(&mut self, paint: Paint) {
        self.push(SurfaceCommand::SetFillPaint(paint));
    }

    fn set_stroke_paint(&mut self, paint: Paint) {
        self.push(SurfaceCommand::SetStrokePaint(paint));
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(SurfaceCommand::SetLineWidth(width));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.push(SurfaceCommand::SetLineCap(cap));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.push(SurfaceCommand::SetLineJoin(join));
    }

    fn begin_path(&mut self) {
        self.push(SurfaceCommand::BeginPath);
    }

    fn move_to(&mut self, point: Point) {
        self.push(SurfaceCommand::MoveTo(point));
    }

    fn line_to(&mut self, point: Point) {
        self.push(SurfaceCommand::LineTo(point));
    }

    fn bezier_curve_to(&mut self, control1: Point, control2: Point, end: Point) {
        self.push(SurfaceCommand::BezierCurveTo(control1, control2, end));
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64) {
        self.push(SurfaceCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn close_path(&mut self) {
        self.push(SurfaceCommand::ClosePath);
    }

    fn fill(&mut self) -> DrawResult<()> {
        self.push(SurfaceCommand::Fill);
        Ok(())
    }

    fn stroke(&mut self) -> DrawResult<()> {
        self.push(SurfaceCommand::Stroke);
        Ok(())
    }

    fn clip(&mut self) -> DrawResult<()> {
        self.push(SurfaceCommand::Clip);
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> DrawResult<()> {
        self.push(SurfaceCommand::FillRect(x, y, width, height));
        Ok(())
    }

    fn clear(&mut self) {
        self.image.clear();
        self.push(SurfaceCommand::Clear);
    }

    fn image_data(&self) -> PixelBuffer {
        self.image.clone()
    }

    fn put_image_data(&mut self, image: &PixelBuffer) -> DrawResult<()> {
        if image.width != self.image.width || image.height != self.image.height {
            return Err(DrawError::surface("image size does not match the surface"));
        }
        self.image = image.clone();
        self.push(SurfaceCommand::PutImageData);
        Ok(())
    }

    fn composite(&mut self, _image: &PixelBuffer, operation: CompositeOperation) -> DrawResult<()> {
        self.push(SurfaceCommand::Composite(operation));
        Ok(())
    }

    fn new_layer(&self) -> DrawResult<Self> {
        let mut layer = RecordingSurface::new(self.image.width, self.image.height);
        layer.push(SurfaceCommand::NewLayer);
        Ok(layer)
    }
}
