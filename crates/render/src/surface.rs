//! The stateful 2D drawing target the renderer talks to.
//!
//! The model is the immediate-mode canvas: a current path built in user
//! space, a state stack (transform, clip, paints, line settings, alpha,
//! composite operation, filter) and whole-surface pixel access.

use crate::style::{CompositeOperation, Filter, LineCap, LineJoin};
use common::color::{stop_offset, Color};
use common::error::DrawResult;
use common::geometry::Point;
use common::image::PixelBuffer;
use smallvec::SmallVec;

/// Straight RGBA color with components in `0..=255`.
pub type Rgba = [u8; 4];

/// A gradient color stop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

pub type ColorStops = SmallVec<[ColorStop; 4]>;

/// Resolve HSV colors into evenly spaced opaque stops.
pub fn color_stops(colors: &[Color]) -> DrawResult<ColorStops> {
    colors
        .iter()
        .enumerate()
        .map(|(index, color)| {
            let [r, g, b] = color.rgb()?;
            Ok(ColorStop {
                offset: stop_offset(index, colors.len()),
                color: [r, g, b, 255],
            })
        })
        .collect()
}

/// What fills or strokes paint with. Coordinates are in user space.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    LinearGradient {
        start: Point,
        end: Point,
        stops: ColorStops,
    },
    RadialGradient {
        center: Point,
        radius: f64,
        stops: ColorStops,
    },
}

impl Paint {
    /// Opaque flat color.
    pub fn solid(color: &Color) -> DrawResult<Paint> {
        let [r, g, b] = color.rgb()?;
        Ok(Paint::Solid([r, g, b, 255]))
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid([0, 0, 0, 255])
    }
}

/// A raster drawing target with canvas semantics.
pub trait Surface {
    /// Width in device pixels.
    fn width(&self) -> u32;
    /// Height in device pixels.
    fn height(&self) -> u32;

    /// Push the drawing state.
    fn save(&mut self);
    /// Pop the drawing state. Unbalanced calls are ignored.
    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    fn set_global_alpha(&mut self, alpha: f64);
    fn set_composite_operation(&mut self, operation: CompositeOperation);
    fn set_filter(&mut self, filter: Filter);
    fn set_fill_paint(&mut self, paint: Paint);
    fn set_stroke_paint(&mut self, paint: Paint);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);

    /// Discard the current path.
    fn begin_path(&mut self);
    fn move_to(&mut self, point: Point);
    fn line_to(&mut self, point: Point);
    fn bezier_curve_to(&mut self, control1: Point, control2: Point, end: Point);
    /// Counter-clockwise arc in user space, connected to the current point.
    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64);
    fn close_path(&mut self);

    /// Fill the current path.
    fn fill(&mut self) -> DrawResult<()>;
    /// Stroke the current path.
    fn stroke(&mut self) -> DrawResult<()>;
    /// Intersect the clip with the current path.
    fn clip(&mut self) -> DrawResult<()>;
    /// Fill an axis-aligned rectangle in user space, leaving the path alone.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> DrawResult<()>;
    /// Make every pixel transparent, ignoring transform and clip.
    fn clear(&mut self);

    /// Copy of the whole surface.
    fn image_data(&self) -> PixelBuffer;
    /// Overwrite the whole surface, ignoring clip and composite state.
    fn put_image_data(&mut self, image: &PixelBuffer) -> DrawResult<()>;
    /// Draw `image` at the device origin with `operation`. Only the clip
    /// applies; the transform, alpha and filter do not.
    fn composite(&mut self, image: &PixelBuffer, operation: CompositeOperation) -> DrawResult<()>;

    /// Blank surface of the same size whose transform matches this one.
    fn new_layer(&self) -> DrawResult<Self>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_stops() {
        let stops = color_stops(&[Color::new(0.0, 1.0, 1.0), Color::white(), Color::black()]).unwrap();
        assert_eq!(stops.len(), 3);
        assert_eq!(stops[0].color, [255, 0, 0, 255]);
        assert_eq!(stops[1].offset, 0.5);
        assert_eq!(stops[2].offset, 1.0);

        let single = color_stops(&[Color::white()]).unwrap();
        assert_eq!(single[0].offset, 0.0);
    }

    #[test]
    fn test_invalid_color_stop() {
        assert!(color_stops(&[Color::new(f64::NAN, 1.0, 1.0)]).is_err());
    }
}
