//! Frame traversal.
//!
//! [`Renderer`] walks a [`FrameDefinition`] depth first and turns every
//! [`Drawable`] into surface calls. Surface state is saved and restored around
//! each element, so siblings never see each other's style, clip or
//! translation. Traversal-local state (offset, listeners, random sources)
//! lives in a [`TraversalContext`] passed down explicitly.

use crate::canvas::Canvas;
use crate::config::{DebugOptions, RenderConfig};
use crate::debug;
use crate::drawable::{
    CircularArc, Clip, ClipShape, ClickRegion, Drawable, FrameDefinition, Line, Overlay,
    RenderOnlyWhenVisible, Seed, Shader, Shape, SmoothLine, SmoothShape, Translate, UpdateImageData,
};
use crate::extremum::find_extremum_points;
use crate::interaction::{InteractionLayer, ListenerHandle};
use crate::random::{RandomStack, SeededRandom};
use crate::smoothing::{smooth_path, SmoothPath};
use crate::style::{Fill, LineStyle, Stroke};
use crate::surface::{color_stops, Paint, Surface};
use crate::tick::FramePacer;
use common::color::ColorSource;
use common::error::{DrawError, DrawResult};
use common::geometry::{PathPoint, Point, Rect};
use common::polygon::Polygon;
use gpu::ShaderPass;
use std::f64::consts::PI;
use std::sync::Arc;

/// State threaded through one traversal.
pub struct TraversalContext {
    /// Sum of the translations enclosing the current element.
    pub offset: Point,
    /// Disposers for every listener registered so far.
    pub listeners: Vec<ListenerHandle>,
    pub random: RandomStack,
    pub debug: DebugOptions,
}

impl TraversalContext {
    pub fn new(random: SeededRandom, debug: DebugOptions) -> Self {
        Self {
            offset: Point::ZERO,
            listeners: Vec::new(),
            random: RandomStack::new(random),
            debug,
        }
    }
}

/// What a linear gradient is laid out against.
#[derive(Clone, Copy)]
enum GradientExtent<'a> {
    Path(&'a [PathPoint]),
    Points(&'a [Point]),
    Arc(&'a CircularArc),
}

impl GradientExtent<'_> {
    fn points(&self, angle: f64) -> DrawResult<Vec<Point>> {
        match *self {
            GradientExtent::Path(points) => Ok(points.iter().map(PathPoint::position).collect()),
            GradientExtent::Points(points) => Ok(points.to_vec()),
            GradientExtent::Arc(arc) if arc.is_full_circle() => Ok(vec![
                arc.center.translate_vector(arc.radius, angle),
                arc.center.translate_vector(arc.radius, angle + PI),
            ]),
            GradientExtent::Arc(_) => Err(DrawError::unsupported("linear gradient on a partial arc")),
        }
    }
}

/// Surface paint for `color` laid out over `extent`.
fn resolve_paint(color: &ColorSource, extent: GradientExtent<'_>) -> DrawResult<Paint> {
    match color {
        ColorSource::Solid(color) => Paint::solid(color),
        ColorSource::Linear(gradient) => {
            let points = extent.points(gradient.angle)?;
            let (start, end) = find_extremum_points(&points, gradient.angle)?;
            Ok(Paint::LinearGradient {
                start,
                end,
                stops: color_stops(&gradient.colors)?,
            })
        }
        ColorSource::Radial(gradient) => Ok(Paint::RadialGradient {
            center: gradient.center,
            radius: gradient.radius,
            stops: color_stops(&gradient.colors)?,
        }),
    }
}

fn apply_fill<S: Surface>(surface: &mut S, fill: &Fill, extent: GradientExtent<'_>) -> DrawResult<()> {
    let paint = resolve_paint(&fill.color, extent)?;
    surface.set_global_alpha(fill.alpha());
    surface.set_fill_paint(paint);
    surface.set_composite_operation(fill.composition.unwrap_or_default());
    surface.set_filter(fill.filter.clone().unwrap_or_default());
    Ok(())
}

fn apply_stroke<S: Surface>(surface: &mut S, stroke: &Stroke, extent: GradientExtent<'_>) -> DrawResult<()> {
    let paint = resolve_paint(&stroke.color, extent)?;
    let (cap, join) = LineStyle::cap_and_join(stroke.style);
    surface.set_global_alpha(stroke.alpha());
    surface.set_stroke_paint(paint);
    surface.set_line_width(stroke.width);
    surface.set_line_cap(cap);
    surface.set_line_join(join);
    Ok(())
}

fn fill_path<S: Surface>(surface: &mut S, fill: Option<&Fill>, extent: GradientExtent<'_>) -> DrawResult<()> {
    match fill {
        Some(fill) => {
            apply_fill(surface, fill, extent)?;
            surface.fill()
        }
        None => Ok(()),
    }
}

fn stroke_path<S: Surface>(surface: &mut S, stroke: Option<&Stroke>, extent: GradientExtent<'_>) -> DrawResult<()> {
    match stroke {
        Some(stroke) => {
            apply_stroke(surface, stroke, extent)?;
            surface.stroke()
        }
        None => Ok(()),
    }
}

/// Run `draw` between a save and a restore. The restore happens on every
/// exit path.
fn scoped<S, F>(surface: &mut S, draw: F) -> DrawResult<()>
where
    S: Surface,
    F: FnOnce(&mut S) -> DrawResult<()>,
{
    surface.save();
    let result = draw(surface);
    surface.restore();
    result
}

fn trace_polyline<S: Surface>(surface: &mut S, points: &[PathPoint], close: bool) -> DrawResult<()> {
    let (first, rest) = match points {
        [first, rest @ ..] if !rest.is_empty() => (first, rest),
        _ => {
            return Err(DrawError::degenerate(format!(
                "a path needs at least 2 points, got {}",
                points.len()
            )))
        }
    };
    surface.begin_path();
    surface.move_to(first.position());
    for point in rest {
        surface.line_to(point.position());
    }
    if close {
        surface.close_path();
    }
    Ok(())
}

fn trace_smooth<S: Surface>(surface: &mut S, path: &SmoothPath) {
    surface.begin_path();
    surface.move_to(path.start);
    for segment in &path.segments {
        surface.bezier_curve_to(segment.control1, segment.control2, segment.end);
    }
    if path.closed {
        surface.close_path();
    }
}

fn trace_clip_shape<S: Surface>(surface: &mut S, shape: &ClipShape) -> DrawResult<()> {
    match shape {
        ClipShape::Shape(shape) => trace_polyline(surface, &shape.points, true),
        ClipShape::Smooth(shape) => {
            let path = smooth_path(&shape.points, shape.smoothness, true)?;
            trace_smooth(surface, &path);
            Ok(())
        }
    }
}

/// Draws frame definitions onto surfaces.
pub struct Renderer {
    config: RenderConfig,
    interaction: Option<InteractionLayer>,
    shader_pass: Option<Arc<ShaderPass>>,
    pacer: Option<FramePacer>,
    seed: u64,
}

impl Renderer {
    /// Renderer for `config`. An interaction layer is created when the
    /// config asks for one; the shader pass must be attached separately.
    pub fn new(config: RenderConfig) -> Self {
        let interaction = config
            .interactive
            .then(|| InteractionLayer::new(config.visibility_margin));
        let pacer = config.frame_interval_ms.map(FramePacer::from_millis);
        Self {
            config,
            interaction,
            shader_pass: None,
            pacer,
            seed: rand::random(),
        }
    }

    /// Seed of the random source handed to the root of every frame.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_interaction(mut self, layer: InteractionLayer) -> Self {
        self.interaction = Some(layer);
        self
    }

    pub fn with_shader_pass(mut self, pass: Arc<ShaderPass>) -> Self {
        self.shader_pass = Some(pass);
        self
    }

    /// Attach a shader pass on the default GPU adapter.
    pub async fn with_gpu(self) -> DrawResult<Self> {
        let pass = ShaderPass::create().await?;
        tracing::info!(adapter = %pass.context().adapter_info().name, "shader pass ready");
        Ok(self.with_shader_pass(Arc::new(pass)))
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn interaction(&self) -> Option<&InteractionLayer> {
        self.interaction.as_ref()
    }

    /// Canvas sized for the configured frame.
    pub fn new_canvas(&self) -> DrawResult<Canvas> {
        let (width, height) = self.config.pixel_size();
        Canvas::new(width, height)
    }

    /// Draw `frame`, then wait for the rest of the frame interval when pacing
    /// is configured. Returns disposers for the registered listeners.
    pub async fn render<S: Surface>(
        &mut self,
        surface: &mut S,
        frame: &FrameDefinition,
    ) -> DrawResult<Vec<ListenerHandle>> {
        if let Some(pacer) = self.pacer.as_mut() {
            pacer.begin();
        }
        let listeners = self.render_now(surface, frame)?;
        if let Some(pacer) = self.pacer.as_mut() {
            pacer.tick().await;
        }
        Ok(listeners)
    }

    /// Draw `frame` without pacing.
    pub fn render_now<S: Surface>(&self, surface: &mut S, frame: &FrameDefinition) -> DrawResult<Vec<ListenerHandle>> {
        if let Some(layer) = &self.interaction {
            let generation = layer.begin_frame();
            tracing::trace!(generation, "interaction generation started");
        }

        let mut ctx = TraversalContext::new(SeededRandom::new(self.seed), self.config.debug);
        scoped(surface, |surface| {
            self.init_frame_transform(surface);
            self.draw_frame(surface, frame, &mut ctx)
        })?;
        tracing::debug!(
            elements = frame.elements.len(),
            listeners = ctx.listeners.len(),
            "frame rendered"
        );
        Ok(ctx.listeners)
    }

    /// Draw every deferred subtree released by
    /// [`InteractionLayer::update_viewport`] since the last call.
    pub fn render_visible<S: Surface>(&self, surface: &mut S) -> DrawResult<Vec<ListenerHandle>> {
        let layer = self.require_interaction()?;
        let mut ctx = TraversalContext::new(SeededRandom::new(self.seed), self.config.debug);
        for deferred in layer.take_ready() {
            let translate = Translate::new(deferred.offset.x, deferred.offset.y, deferred.elements);
            scoped(surface, |surface| {
                self.init_frame_transform(surface);
                self.draw_translate(surface, &translate, &mut ctx)
            })?;
        }
        Ok(ctx.listeners)
    }

    /// Flip the y axis and scale drawing units to device pixels.
    fn init_frame_transform<S: Surface>(&self, surface: &mut S) {
        let scale = self.config.scale();
        surface.translate(0.0, self.config.height * scale);
        surface.scale(scale, -scale);
    }

    fn draw_frame<S: Surface>(&self, surface: &mut S, frame: &FrameDefinition, ctx: &mut TraversalContext) -> DrawResult<()> {
        let (width, height) = (self.config.width, self.config.height);
        let frame_points = Polygon::from_rect(0.0, 0.0, width, height).points;
        let extent = GradientExtent::Points(&frame_points);

        if let Some(border) = &frame.border {
            apply_fill(surface, &Fill::new(border.color.clone(), 1.0), extent)?;
            surface.fill_rect(0.0, 0.0, width, height)?;
        }
        if let Some(background) = &frame.background {
            let margin = frame.border.as_ref().map_or(0.0, |border| border.width);
            apply_fill(surface, &Fill::new(background.clone(), 1.0), extent)?;
            surface.fill_rect(margin, margin, width - margin * 2.0, height - margin * 2.0)?;
        }

        self.draw_elements(surface, &frame.elements, ctx)?;

        if let Some(shader) = &frame.shader {
            self.draw_shader(surface, shader)?;
        }
        Ok(())
    }

    pub fn draw_elements<S: Surface>(
        &self,
        surface: &mut S,
        elements: &[Drawable],
        ctx: &mut TraversalContext,
    ) -> DrawResult<()> {
        for element in elements {
            if ctx.debug.trace {
                let span = tracing::debug_span!("element", kind = element.kind());
                let _enter = span.enter();
                self.draw_element(surface, element, ctx)?;
            } else {
                self.draw_element(surface, element, ctx)?;
            }
        }
        Ok(())
    }

    fn draw_element<S: Surface>(&self, surface: &mut S, element: &Drawable, ctx: &mut TraversalContext) -> DrawResult<()> {
        match element {
            Drawable::Shape(shape) => scoped(surface, |s| self.draw_shape(s, shape)),
            Drawable::SmoothShape(shape) => scoped(surface, |s| self.draw_smooth_shape(s, shape, ctx)),
            Drawable::Arc(arc) => scoped(surface, |s| self.draw_arc(s, arc)),
            Drawable::Line(line) => scoped(surface, |s| self.draw_line(s, line)),
            Drawable::SmoothLine(line) => scoped(surface, |s| self.draw_smooth_line(s, line, ctx)),
            Drawable::Clip(clip) => self.draw_clip(surface, clip, ctx),
            Drawable::Translate(translate) => self.draw_translate(surface, translate, ctx),
            Drawable::Overlay(overlay) => self.draw_overlay(surface, overlay, ctx),
            Drawable::Seed(seed) => self.draw_seed(surface, seed, ctx),
            Drawable::ClickRegion(region) => self.draw_click_region(region, ctx),
            Drawable::RenderOnlyWhenVisible(element) => self.draw_render_only_when_visible(element, ctx),
            Drawable::Shader(shader) => self.draw_shader(surface, shader),
            Drawable::UpdateImageData(update) => self.draw_image_data(surface, update),
        }
    }

    fn draw_shape<S: Surface>(&self, surface: &mut S, shape: &Shape) -> DrawResult<()> {
        trace_polyline(surface, &shape.points, true)?;
        let extent = GradientExtent::Path(&shape.points);
        fill_path(surface, shape.fill.as_ref(), extent)?;
        stroke_path(surface, shape.stroke.as_ref(), extent)
    }

    fn draw_smooth_shape<S: Surface>(&self, surface: &mut S, shape: &SmoothShape, ctx: &TraversalContext) -> DrawResult<()> {
        let path = smooth_path(&shape.points, shape.smoothness, true)?;
        trace_smooth(surface, &path);
        let extent = GradientExtent::Path(&shape.points);
        fill_path(surface, shape.fill.as_ref(), extent)?;
        stroke_path(surface, shape.stroke.as_ref(), extent)?;
        if ctx.debug.control_points {
            debug::draw_control_points(surface, &path)?;
        }
        Ok(())
    }

    fn draw_arc<S: Surface>(&self, surface: &mut S, arc: &CircularArc) -> DrawResult<()> {
        surface.begin_path();
        surface.arc(arc.center, arc.radius, arc.start_angle, arc.end_angle);
        let extent = GradientExtent::Arc(arc);
        stroke_path(surface, arc.stroke.as_ref(), extent)?;
        fill_path(surface, arc.fill.as_ref(), extent)
    }

    fn draw_line<S: Surface>(&self, surface: &mut S, line: &Line) -> DrawResult<()> {
        let Some(stroke) = &line.stroke else {
            return Ok(());
        };
        trace_polyline(surface, &line.points, false)?;
        stroke_path(surface, Some(stroke), GradientExtent::Path(&line.points))
    }

    fn draw_smooth_line<S: Surface>(&self, surface: &mut S, line: &SmoothLine, ctx: &TraversalContext) -> DrawResult<()> {
        let Some(stroke) = &line.stroke else {
            return Ok(());
        };
        let path = smooth_path(&line.points, line.smoothness, false)?;
        trace_smooth(surface, &path);
        stroke_path(surface, Some(stroke), GradientExtent::Path(&line.points))?;
        if ctx.debug.control_points {
            debug::draw_control_points(surface, &path)?;
        }
        Ok(())
    }

    fn draw_clip<S: Surface>(&self, surface: &mut S, clip: &Clip, ctx: &mut TraversalContext) -> DrawResult<()> {
        scoped(surface, |surface| {
            // The clip shape paints its own fill and stroke, if any.
            self.draw_element(surface, &Drawable::from(clip.shape.clone()), ctx)?;
            trace_clip_shape(surface, &clip.shape)?;
            surface.clip()?;
            self.draw_elements(surface, &clip.elements, ctx)
        })
    }

    fn draw_translate<S: Surface>(
        &self,
        surface: &mut S,
        translate: &Translate,
        ctx: &mut TraversalContext,
    ) -> DrawResult<()> {
        let previous = ctx.offset;
        ctx.offset = previous.translate(translate.x, translate.y);
        let result = scoped(surface, |surface| {
            surface.translate(translate.x, translate.y);
            self.draw_elements(surface, &translate.elements, ctx)
        });
        ctx.offset = previous;
        result
    }

    fn draw_overlay<S: Surface>(&self, surface: &mut S, overlay: &Overlay, ctx: &mut TraversalContext) -> DrawResult<()> {
        let mut layer = surface.new_layer()?;
        self.draw_elements(&mut layer, &overlay.elements, ctx)?;
        let image = layer.image_data();
        surface.composite(&image, overlay.composition.unwrap_or_default())
    }

    fn draw_seed<S: Surface>(&self, surface: &mut S, seed: &Seed, ctx: &mut TraversalContext) -> DrawResult<()> {
        let result = (seed.elements)(ctx.random.push(seed.id))
            .and_then(|elements| self.draw_elements(surface, &elements, ctx));
        ctx.random.pop();
        result
    }

    fn draw_click_region(&self, region: &ClickRegion, ctx: &mut TraversalContext) -> DrawResult<()> {
        let layer = self.require_interaction()?;
        let handles = layer.register_region(&region.points, ctx.offset, &region.events);
        ctx.listeners.extend(handles);
        Ok(())
    }

    fn draw_render_only_when_visible(&self, element: &RenderOnlyWhenVisible, ctx: &mut TraversalContext) -> DrawResult<()> {
        let layer = self.require_interaction()?;
        let bounds = Rect::bounding(element.points.iter().copied())
            .ok_or_else(|| DrawError::degenerate("visibility region without points"))?;
        layer.watch(bounds.translate(ctx.offset.x, ctx.offset.y), ctx.offset, element.elements.clone());
        Ok(())
    }

    fn draw_shader<S: Surface>(&self, surface: &mut S, shader: &Shader) -> DrawResult<()> {
        let pass = self
            .shader_pass
            .as_ref()
            .ok_or_else(|| DrawError::missing("shader drawn without a shader pass"))?;
        let input = surface.image_data();
        let output = pass.run(&input, &shader.program, &shader.uniforms)?;
        surface.clear();
        surface.composite(&output, shader.composition.unwrap_or_default())
    }

    fn draw_image_data<S: Surface>(&self, surface: &mut S, update: &UpdateImageData) -> DrawResult<()> {
        let mut image = surface.image_data();
        (update.transform)(&mut image);
        surface.put_image_data(&image)
    }

    fn require_interaction(&self) -> DrawResult<&InteractionLayer> {
        self.interaction
            .as_ref()
            .ok_or_else(|| DrawError::missing("interactive elements need `interactive = true`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{RecordingSurface, SurfaceCommand};
    use crate::drawable::Border;
    use crate::interaction::{EventHandler, EventKind, PointerEvent};
    use crate::style::CompositeOperation;
    use common::color::{Color, ColorSource, Gradient, RadialGradient};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn config() -> RenderConfig {
        RenderConfig::headless().with_size(10.0, 10.0)
    }

    fn unit_square() -> Vec<Point> {
        Polygon::from_rect(0.0, 0.0, 1.0, 1.0).points
    }

    fn record(renderer: &Renderer, frame: &FrameDefinition) -> DrawResult<RecordingSurface> {
        let mut surface = RecordingSurface::new(10, 10);
        renderer.render_now(&mut surface, frame)?;
        Ok(surface)
    }

    fn index(surface: &RecordingSurface, command: SurfaceCommand) -> usize {
        surface.position(&command).unwrap()
    }

    #[test]
    fn test_frame_transform_and_balance() {
        let renderer = Renderer::new(config().with_resolution(2.0));
        let surface = record(&renderer, &FrameDefinition::default()).unwrap();
        assert_eq!(
            &surface.commands()[..3],
            &[
                SurfaceCommand::Save,
                SurfaceCommand::Translate(0.0, 20.0),
                SurfaceCommand::Scale(2.0, -2.0),
            ]
        );
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_shape_fill_before_stroke() {
        let shape = Shape::new(unit_square())
            .with_stroke(Stroke::new(Color::black(), 1.0, 1.0))
            .with_fill(Color::white());
        let surface = record(&Renderer::new(config()), &FrameDefinition::new(vec![shape.into()])).unwrap();
        assert_eq!(surface.paints(), vec![&SurfaceCommand::Fill, &SurfaceCommand::Stroke]);
        assert!(surface.commands().contains(&SurfaceCommand::ClosePath));
    }

    #[test]
    fn test_arc_stroke_before_fill() {
        let arc = CircularArc::circle(Point::new(5.0, 5.0), 2.0)
            .with_fill(Color::white())
            .with_stroke(Stroke::new(Color::black(), 1.0, 1.0));
        let surface = record(&Renderer::new(config()), &FrameDefinition::new(vec![arc.into()])).unwrap();
        assert_eq!(surface.paints(), vec![&SurfaceCommand::Stroke, &SurfaceCommand::Fill]);
    }

    #[test]
    fn test_line_without_stroke_is_noop() {
        let line = Line::segment(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let surface = record(&Renderer::new(config()), &FrameDefinition::new(vec![line.into()])).unwrap();
        assert!(surface.paints().is_empty());
        assert!(!surface.commands().contains(&SurfaceCommand::BeginPath));
    }

    #[test]
    fn test_smooth_line_uses_curves() {
        let line = SmoothLine::new([Point::new(0.0, 0.0), Point::new(1.0, 2.0), Point::new(3.0, 0.0)], 0.5)
            .with_stroke(Stroke::new(Color::black(), 0.0, 2.0).with_style(LineStyle::Round));
        let surface = record(&Renderer::new(config()), &FrameDefinition::new(vec![line.into()])).unwrap();
        let curves = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, SurfaceCommand::BezierCurveTo(..)))
            .count();
        assert_eq!(curves, 2);
        // Zero stroke opacity means opaque.
        assert!(surface.commands().contains(&SurfaceCommand::SetGlobalAlpha(1.0)));
        assert!(surface.commands().contains(&SurfaceCommand::SetLineCap(crate::style::LineCap::Round)));
        assert!(!surface.commands().contains(&SurfaceCommand::ClosePath));
    }

    #[test]
    fn test_fill_resets_composite_and_filter() {
        let shape = Shape::new(unit_square()).with_fill(
            Fill::new(Color::white(), f64::NAN).with_composition(CompositeOperation::Multiply),
        );
        let surface = record(&Renderer::new(config()), &FrameDefinition::new(vec![shape.into()])).unwrap();
        let commands = surface.commands();
        assert!(commands.contains(&SurfaceCommand::SetGlobalAlpha(1.0)));
        assert!(commands.contains(&SurfaceCommand::SetCompositeOperation(CompositeOperation::Multiply)));
        assert!(commands.contains(&SurfaceCommand::SetFilter(crate::style::Filter::None)));
    }

    #[test]
    fn test_border_and_background() {
        let frame = FrameDefinition::default()
            .with_border(Border::new(Color::black(), 1.0))
            .with_background(Color::white());
        let surface = record(&Renderer::new(config()), &frame).unwrap();
        assert_eq!(
            surface.paints(),
            vec![
                &SurfaceCommand::FillRect(0.0, 0.0, 10.0, 10.0),
                &SurfaceCommand::FillRect(1.0, 1.0, 8.0, 8.0),
            ]
        );
    }

    #[test]
    fn test_clip_scopes_children() {
        let clip = Clip::new(
            Shape::new(unit_square()),
            vec![Shape::new(unit_square()).with_fill(Color::white()).into()],
        );
        let after = Shape::new(unit_square()).with_fill(Color::black());
        let surface = record(
            &Renderer::new(config()),
            &FrameDefinition::new(vec![clip.into(), after.into()]),
        )
        .unwrap();

        let clip_at = index(&surface, SurfaceCommand::Clip);
        let fills: Vec<usize> = surface
            .commands()
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == SurfaceCommand::Fill)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(fills.len(), 2);
        assert!(fills[0] > clip_at);

        // A restore closes the clip scope before the sibling paints.
        let restores_between = surface.commands()[clip_at..fills[1]]
            .iter()
            .filter(|c| **c == SurfaceCommand::Restore)
            .count();
        assert!(restores_between >= 2);
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_translate_accumulates_for_click_regions() {
        let renderer = Renderer::new(config().with_interactive(true));
        let clicks = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&clicks);
        let region = ClickRegion::new(
            unit_square(),
            vec![EventHandler::new(EventKind::Click, move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })],
        );
        let frame = FrameDefinition::new(vec![Translate::new(
            2.0,
            0.0,
            vec![Translate::new(3.0, 1.0, vec![region.into()]).into()],
        )
        .into()]);

        let mut surface = RecordingSurface::new(10, 10);
        let listeners = renderer.render_now(&mut surface, &frame).unwrap();
        assert_eq!(listeners.len(), 1);

        let layer = renderer.interaction().unwrap();
        assert!(!layer.dispatch(&PointerEvent::click(0.5, 0.5)));
        assert!(layer.dispatch(&PointerEvent::click(5.5, 1.5)));
        assert_eq!(clicks.load(Ordering::SeqCst), 1);

        listeners[0].dispose();
        assert!(!layer.dispatch(&PointerEvent::click(5.5, 1.5)));
    }

    #[test]
    fn test_missing_interaction_layer() {
        let region = ClickRegion::new(unit_square(), Vec::new());
        let err = record(&Renderer::new(config()), &FrameDefinition::new(vec![region.into()])).unwrap_err();
        assert!(matches!(err, DrawError::MissingResource(_)));

        let deferred = RenderOnlyWhenVisible::new(unit_square(), Vec::new());
        let err = record(&Renderer::new(config()), &FrameDefinition::new(vec![deferred.into()])).unwrap_err();
        assert!(matches!(err, DrawError::MissingResource(_)));
    }

    #[test]
    fn test_missing_shader_pass() {
        let shader = Shader::fragment("@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }");
        let mut surface = RecordingSurface::new(10, 10);
        let err = Renderer::new(config())
            .render_now(&mut surface, &FrameDefinition::new(vec![shader.into()]))
            .unwrap_err();
        assert!(matches!(err, DrawError::MissingResource(_)));
        // The frame scope is closed even though drawing failed.
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_error_restores_nested_state() {
        let frame = FrameDefinition::new(vec![Translate::new(
            1.0,
            1.0,
            vec![Clip::new(
                Shape::new(unit_square()),
                vec![Shape::new([Point::new(0.0, 0.0)]).with_fill(Color::white()).into()],
            )
            .into()],
        )
        .into()]);
        let mut surface = RecordingSurface::new(10, 10);
        let err = Renderer::new(config()).render_now(&mut surface, &frame).unwrap_err();
        assert!(matches!(err, DrawError::DegenerateGeometry(_)));
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_seed_scoping() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record_seed = |id: u64| {
            let seen = Arc::clone(&seen);
            Seed::new(id, move |random| {
                seen.lock().unwrap().push((random.seed(), random.value()));
                Ok(Vec::new())
            })
        };
        let outer = {
            let seen = Arc::clone(&seen);
            let inner = record_seed(2);
            Seed::new(1, move |random| {
                let first = random.value();
                seen.lock().unwrap().push((random.seed(), first));
                Ok(vec![inner.clone().into()])
            })
        };
        let frame = FrameDefinition::new(vec![outer.into(), record_seed(1).into()]);
        record(&Renderer::new(config()), &frame).unwrap();

        let seen = seen.lock().unwrap();
        let seeds: Vec<u64> = seen.iter().map(|(seed, _)| *seed).collect();
        assert_eq!(seeds, vec![1, 2, 1]);
        // The sibling with the same id starts from the same sequence.
        assert_eq!(seen[0].1, seen[2].1);
    }

    #[test]
    fn test_seed_errors_propagate() {
        let collapsed = Polygon::new(vec![Point::new(2.0, 2.0); 3]);
        let failing = Seed::new(4, move |random| {
            let center = collapsed.sample(random, 5)?;
            Ok(vec![Shape::new(Polygon::from_rect(center.x, center.y, 1.0, 1.0).points)
                .with_fill(Color::white())
                .into()])
        });
        let frame = FrameDefinition::new(vec![Translate::new(1.0, 1.0, vec![failing.clone().into()]).into()]);

        let mut surface = RecordingSurface::new(10, 10);
        let err = Renderer::new(config()).render_now(&mut surface, &frame).unwrap_err();
        assert!(matches!(err, DrawError::SamplingFailed { attempts: 5 }));
        assert_eq!(surface.depth(), 0);
        assert!(surface.paints().is_empty());

        let renderer = Renderer::new(config());
        let mut ctx = TraversalContext::new(SeededRandom::new(1), DebugOptions::default());
        let err = renderer
            .draw_elements(&mut surface, &[failing.into()], &mut ctx)
            .unwrap_err();
        assert!(matches!(err, DrawError::SamplingFailed { .. }));
        assert_eq!(ctx.random.depth(), 0);
        assert_eq!(ctx.random.current_seed(), 1);
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_update_image_data() {
        let update = UpdateImageData::new(|image| image.fill([1, 2, 3, 255]));
        let mut surface = RecordingSurface::new(4, 4);
        Renderer::new(config())
            .render_now(&mut surface, &FrameDefinition::new(vec![update.into()]))
            .unwrap();
        assert_eq!(surface.image_data().get_pixel(3, 3), [1, 2, 3, 255]);
        assert!(surface.commands().contains(&SurfaceCommand::PutImageData));
    }

    #[test]
    fn test_overlay_composites_layer() {
        let overlay = Overlay::new(vec![Shape::new(unit_square()).with_fill(Color::white()).into()])
            .with_composition(CompositeOperation::Screen);
        let surface = record(&Renderer::new(config()), &FrameDefinition::new(vec![overlay.into()])).unwrap();
        // The layer's own fill is not recorded on the parent.
        assert_eq!(
            surface.paints(),
            vec![&SurfaceCommand::Composite(CompositeOperation::Screen)]
        );
    }

    #[test]
    fn test_linear_gradient_axis() {
        let gradient = Gradient::new(vec![Color::black(), Color::white()], 0.0);
        let shape = Shape::new(Polygon::from_rect(1.0, 2.0, 4.0, 3.0).points).with_fill(ColorSource::from(gradient));
        let surface = record(&Renderer::new(config()), &FrameDefinition::new(vec![shape.into()])).unwrap();
        let paint = surface
            .commands()
            .iter()
            .find_map(|c| match c {
                SurfaceCommand::SetFillPaint(Paint::LinearGradient { start, end, stops }) => {
                    Some((*start, *end, stops.len()))
                }
                _ => None,
            })
            .unwrap();
        assert!((paint.0.x - 1.0).abs() < 1e-9);
        assert!((paint.1.x - 5.0).abs() < 1e-9);
        assert_eq!(paint.2, 2);
    }

    #[test]
    fn test_gradient_on_arcs() {
        let gradient = Gradient::new(vec![Color::black(), Color::white()], 0.0);
        let circle = CircularArc::circle(Point::new(5.0, 5.0), 2.0).with_fill(ColorSource::from(gradient.clone()));
        assert!(record(&Renderer::new(config()), &FrameDefinition::new(vec![circle.into()])).is_ok());

        let partial = CircularArc::new(Point::new(5.0, 5.0), 2.0, 0.0, PI).with_fill(ColorSource::from(gradient));
        let err = record(&Renderer::new(config()), &FrameDefinition::new(vec![partial.into()])).unwrap_err();
        assert!(matches!(err, DrawError::Unsupported(_)));

        let radial = RadialGradient::new(vec![Color::black(), Color::white()], Point::new(5.0, 5.0), 3.0);
        let partial = CircularArc::new(Point::new(5.0, 5.0), 2.0, 0.0, PI).with_fill(ColorSource::from(radial));
        assert!(record(&Renderer::new(config()), &FrameDefinition::new(vec![partial.into()])).is_ok());
    }

    #[test]
    fn test_control_point_markers() {
        let options = DebugOptions {
            trace: true,
            control_points: true,
        };
        let shape = SmoothShape::new(unit_square(), 0.3).with_fill(Color::white());
        let renderer = Renderer::new(config().with_debug(options));
        let surface = record(&renderer, &FrameDefinition::new(vec![shape.into()])).unwrap();
        let markers = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, SurfaceCommand::Arc { radius, .. } if *radius == debug::MARKER_SIZE))
            .count();
        // Four vertices and two handles per segment.
        assert_eq!(markers, 4 + 3 * 2);
    }

    #[test]
    fn test_render_only_when_visible_draws_once() {
        let renderer = Renderer::new(config().with_interactive(true));
        let deferred = RenderOnlyWhenVisible::new(
            unit_square(),
            vec![Shape::new(unit_square()).with_fill(Color::white()).into()],
        );
        let frame = FrameDefinition::new(vec![Translate::new(50.0, 0.0, vec![deferred.into()]).into()]);

        let mut surface = RecordingSurface::new(10, 10);
        renderer.render_now(&mut surface, &frame).unwrap();
        assert!(surface.paints().is_empty());

        let layer = renderer.interaction().unwrap();
        // 50 units away, inside the default 200 unit margin.
        assert_eq!(layer.update_viewport(Rect::new(0.0, 0.0, 10.0, 10.0)), 1);

        surface.clear_commands();
        renderer.render_visible(&mut surface).unwrap();
        assert_eq!(surface.paints(), vec![&SurfaceCommand::Fill]);
        assert!(surface.commands().contains(&SurfaceCommand::Translate(50.0, 0.0)));

        surface.clear_commands();
        renderer.render_visible(&mut surface).unwrap();
        assert!(surface.paints().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_paces_frames() {
        let mut renderer = Renderer::new(config().with_frame_interval(Some(16.0)));
        let mut surface = RecordingSurface::new(10, 10);
        let start = tokio::time::Instant::now();
        renderer.render(&mut surface, &FrameDefinition::default()).await.unwrap();
        assert!(tokio::time::Instant::now() - start >= std::time::Duration::from_millis(15));
    }
}
