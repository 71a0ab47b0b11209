//! Visual debugging aids.

use crate::smoothing::SmoothPath;
use crate::surface::{Paint, Surface};
use common::color::Color;
use common::ease::Easing;
use common::error::DrawResult;
use common::geometry::Point;
use std::f64::consts::TAU;

/// Marker radius in drawing units.
pub const MARKER_SIZE: f64 = 4.0;

const MARKER_ALPHA: f64 = 0.9;
const RECT_ALPHA: f64 = 0.5;

/// Side of the color and easing swatches.
pub const SWATCH_SIZE: f64 = 50.0;
/// Columns in an easing ramp, one drawing unit wide each.
pub const EASING_STEPS: usize = 100;

/// Dot of `size` at `point`, drawn in its own save/restore.
pub fn draw_marker<S: Surface>(surface: &mut S, point: Point, color: &Color, size: f64) -> DrawResult<()> {
    let paint = Paint::solid(color)?;
    surface.save();
    surface.set_global_alpha(MARKER_ALPHA);
    surface.set_fill_paint(paint);
    surface.begin_path();
    surface.arc(point, size, 0.0, TAU);
    let result = surface.fill();
    surface.restore();
    result
}

/// Cyan dots on the vertices of `path`, red dots on its handles.
pub fn draw_control_points<S: Surface>(surface: &mut S, path: &SmoothPath) -> DrawResult<()> {
    let vertex = Color::cyan();
    let control = Color::red();
    surface.save();
    let result = path
        .vertices()
        .try_for_each(|point| draw_marker(surface, point, &vertex, MARKER_SIZE))
        .and_then(|_| {
            path.control_points()
                .try_for_each(|point| draw_marker(surface, point, &control, MARKER_SIZE))
        });
    surface.restore();
    result
}

/// Translucent rectangle, for eyeballing bounds.
pub fn draw_rect<S: Surface>(surface: &mut S, x: f64, y: f64, width: f64, height: f64, color: &Color) -> DrawResult<()> {
    let paint = Paint::solid(color)?;
    surface.save();
    surface.set_global_alpha(RECT_ALPHA);
    surface.set_fill_paint(paint);
    let result = surface.fill_rect(x, y, width, height);
    surface.restore();
    result
}

/// Opaque square of `color` at the origin.
pub fn draw_color_swatch<S: Surface>(surface: &mut S, color: &Color) -> DrawResult<()> {
    let paint = Paint::solid(color)?;
    surface.save();
    surface.set_fill_paint(paint);
    let result = surface.fill_rect(0.0, 0.0, SWATCH_SIZE, SWATCH_SIZE);
    surface.restore();
    result
}

/// Grey ramp of `easing` sampled over [0, 1), black at zero.
pub fn draw_easing<S: Surface>(surface: &mut S, easing: Easing) -> DrawResult<()> {
    surface.save();
    let result = (0..EASING_STEPS).try_for_each(|step| {
        let value = easing.apply(step as f64 / EASING_STEPS as f64);
        surface.set_fill_paint(Paint::solid(&Color::new(0.0, 0.0, value))?);
        surface.fill_rect(step as f64, 0.0, 1.0, SWATCH_SIZE)
    });
    surface.restore();
    result
}
