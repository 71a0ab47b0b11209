//! Fill and stroke descriptions and their surface-level settings.

use common::color::{Color, ColorSource};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How new pixels combine with the ones already on the surface. Names follow
/// the 2D canvas `globalCompositeOperation` values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeOperation {
    #[default]
    SourceOver,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Lighter,
    Copy,
    Xor,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

/// Line end and corner treatment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineStyle {
    /// `round` rounds both caps and joins; `square` keeps butt caps with
    /// mitered joins.
    pub fn cap_and_join(style: Option<LineStyle>) -> (LineCap, LineJoin) {
        match style {
            Some(LineStyle::Round) => (LineCap::Round, LineJoin::Round),
            Some(LineStyle::Square) | None => (LineCap::Butt, LineJoin::Miter),
        }
    }
}

/// Per-draw raster filter.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Filter {
    #[default]
    None,
    /// Gaussian blur with the given standard deviation in pixels.
    Blur(f64),
    /// Any other filter expression, kept verbatim.
    Other(String),
}

impl FromStr for Filter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == "none" {
            return Ok(Filter::None);
        }
        let radius = trimmed
            .strip_prefix("blur(")
            .and_then(|rest| rest.strip_suffix(')'))
            .map(|inner| inner.trim().trim_end_matches("px").trim())
            .and_then(|value| value.parse::<f64>().ok());
        Ok(match radius {
            Some(radius) if radius >= 0.0 => Filter::Blur(radius),
            _ => Filter::Other(trimmed.to_string()),
        })
    }
}

impl From<&str> for Filter {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(filter) => filter,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::None => write!(f, "none"),
            Filter::Blur(radius) => write!(f, "blur({}px)", radius),
            Filter::Other(expr) => write!(f, "{}", expr),
        }
    }
}

/// Interior paint for closed shapes and arcs.
#[derive(Clone, Debug, PartialEq)]
pub struct Fill {
    pub color: ColorSource,
    pub opacity: f64,
    pub composition: Option<CompositeOperation>,
    pub filter: Option<Filter>,
}

impl Fill {
    pub fn new(color: impl Into<ColorSource>, opacity: f64) -> Self {
        Self {
            color: color.into(),
            opacity,
            composition: None,
            filter: None,
        }
    }

    pub fn with_composition(mut self, composition: CompositeOperation) -> Self {
        self.composition = Some(composition);
        self
    }

    pub fn with_filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Global alpha for the fill; NaN means opaque.
    pub fn alpha(&self) -> f64 {
        if self.opacity.is_nan() {
            1.0
        } else {
            self.opacity
        }
    }
}

impl From<Color> for Fill {
    fn from(color: Color) -> Self {
        Fill::new(color, 1.0)
    }
}

impl From<ColorSource> for Fill {
    fn from(color: ColorSource) -> Self {
        Fill::new(color, 1.0)
    }
}

/// Outline paint.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub color: ColorSource,
    pub opacity: f64,
    pub style: Option<LineStyle>,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: impl Into<ColorSource>, opacity: f64, width: f64) -> Self {
        Self {
            color: color.into(),
            opacity,
            style: None,
            width,
        }
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Global alpha for the stroke. Zero and NaN both mean opaque.
    pub fn alpha(&self) -> f64 {
        if self.opacity == 0.0 || self.opacity.is_nan() {
            1.0
        } else {
            self.opacity
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parsing() {
        assert_eq!(Filter::from("none"), Filter::None);
        assert_eq!(Filter::from(""), Filter::None);
        assert_eq!(Filter::from("blur(4px)"), Filter::Blur(4.0));
        assert_eq!(Filter::from(" blur( 2.5px ) "), Filter::Blur(2.5));
        assert_eq!(
            Filter::from("grayscale(1)"),
            Filter::Other("grayscale(1)".to_string())
        );
        assert_eq!(Filter::Blur(3.0).to_string(), "blur(3px)");
    }

    #[test]
    fn test_alpha_rules() {
        let stroke = Stroke::new(Color::black(), 0.0, 1.0);
        assert_eq!(stroke.alpha(), 1.0);
        assert_eq!(Stroke::new(Color::black(), f64::NAN, 1.0).alpha(), 1.0);
        assert_eq!(Stroke::new(Color::black(), 0.4, 1.0).alpha(), 0.4);

        assert_eq!(Fill::new(Color::black(), 0.0).alpha(), 0.0);
        assert_eq!(Fill::new(Color::black(), f64::NAN).alpha(), 1.0);
        assert_eq!(Fill::from(Color::white()).alpha(), 1.0);
    }

    #[test]
    fn test_cap_and_join() {
        assert_eq!(
            LineStyle::cap_and_join(Some(LineStyle::Round)),
            (LineCap::Round, LineJoin::Round)
        );
        assert_eq!(
            LineStyle::cap_and_join(Some(LineStyle::Square)),
            (LineCap::Butt, LineJoin::Miter)
        );
        assert_eq!(LineStyle::cap_and_join(None), (LineCap::Butt, LineJoin::Miter));
    }

    #[test]
    fn test_composite_names() {
        let op: CompositeOperation = composite_from_toml("\"destination-out\"");
        assert_eq!(op, CompositeOperation::DestinationOut);
    }

    fn composite_from_toml(value: &str) -> CompositeOperation {
        #[derive(Deserialize)]
        struct Wrapper {
            op: CompositeOperation,
        }
        let wrapper: Wrapper = toml::from_str(&format!("op = {}", value)).unwrap();
        wrapper.op
    }
}
