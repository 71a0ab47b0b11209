//! HSV colors, gradients and color arithmetic.

use crate::error::{DrawError, DrawResult};
use crate::geometry::Point;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plain HSV triple, the serialized form of [`Color`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
struct Hsv {
    h: f64,
    s: f64,
    v: f64,
}

/// An HSV color.
///
/// Saturation and value are clamped to `[0, 1]`; hue is left as given so
/// that mixing math can run past the wheel. The hex form is computed on the
/// first call to [`Color::hex`] and cached for the lifetime of the value.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "Hsv", into = "Hsv")]
pub struct Color {
    pub h: f64,
    pub s: f64,
    pub v: f64,
    hex: OnceCell<String>,
}

impl From<Hsv> for Color {
    fn from(hsv: Hsv) -> Self {
        Color::new(hsv.h, hsv.s, hsv.v)
    }
}

impl From<Color> for Hsv {
    fn from(color: Color) -> Self {
        Hsv { h: color.h, s: color.s, v: color.v }
    }
}

impl Color {
    pub fn new(h: f64, s: f64, v: f64) -> Self {
        Self {
            h,
            s: s.clamp(0.0, 1.0),
            v: v.clamp(0.0, 1.0),
            hex: OnceCell::new(),
        }
    }

    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn white() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    pub fn green() -> Self {
        Self::new(0.25, 1.0, 1.0)
    }

    pub fn cyan() -> Self {
        Self::new(0.5, 1.0, 1.0)
    }

    pub fn red() -> Self {
        Self::new(0.0, 1.0, 0.9)
    }

    /// `#rrggbb`, computed once per instance.
    ///
    /// Non-finite components cannot be converted; they are logged before the
    /// error is returned.
    pub fn hex(&self) -> DrawResult<&str> {
        self.hex
            .get_or_try_init(|| {
                let rgb = self.to_rgb().map_err(|err| {
                    tracing::error!(h = self.h, s = self.s, v = self.v, "cannot convert color to hex");
                    err
                })?;
                Ok(rgb_to_hex(rgb))
            })
            .map(String::as_str)
    }

    /// Channels decoded from the cached hex form, so repeated paints of the
    /// same color share one conversion.
    pub fn rgb(&self) -> DrawResult<[u8; 3]> {
        let hex = self.hex()?;
        let mut rgb = [0u8; 3];
        for (index, channel) in rgb.iter_mut().enumerate() {
            let start = 1 + index * 2;
            *channel = u8::from_str_radix(&hex[start..start + 2], 16)
                .map_err(|_| DrawError::InvalidColor { h: self.h, s: self.s, v: self.v })?;
        }
        Ok(rgb)
    }

    pub fn to_rgb(&self) -> DrawResult<[u8; 3]> {
        if !(self.h.is_finite() && self.s.is_finite() && self.v.is_finite()) {
            return Err(DrawError::InvalidColor { h: self.h, s: self.s, v: self.v });
        }
        Ok(hsv_to_rgb(self.h, self.s, self.v))
    }

    /// Per-channel interpolation: `factor = 1` gives `a`, `factor = 0` gives `b`.
    pub fn mix(a: &Color, b: &Color, factor: f64) -> Color {
        Color::new(
            a.h * factor + b.h * (1.0 - factor),
            a.s * factor + b.s * (1.0 - factor),
            a.v * factor + b.v * (1.0 - factor),
        )
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.h == other.h && self.s == other.s && self.v == other.v
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(h={}, s={}, v={})", self.h, self.s, self.v)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Sector-based HSV to RGB, channels in `0..=255`.
///
/// Hue is not wrapped: the sector is `floor(h * 6) % 6` with a truncated
/// remainder, so negative sectors land on the last case.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match (i as i64) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [to_channel(r), to_channel(g), to_channel(b)]
}

fn to_channel(x: f64) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

/// RGB in `0..=255` to HSV in `[0, 1]`.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max == 0.0 { 0.0 } else { delta / max };
    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        ((g - b) / delta + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if max == g {
        ((b - r) / delta + 2.0) / 6.0
    } else {
        ((r - g) / delta + 4.0) / 6.0
    };
    (h, s, max)
}

pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Weighted closeness check: `|dh| + 2|ds| + 4|dv| < approx`.
pub fn is_color_close(a: &Color, b: &Color, approx: f64) -> bool {
    let diff = (a.h - b.h).abs() + 2.0 * (a.s - b.s).abs() + 4.0 * (a.v - b.v).abs();
    diff < approx
}

/// A linear gradient along `angle` (radians).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub colors: Vec<Color>,
    #[serde(default)]
    pub angle: f64,
}

impl Gradient {
    pub fn new(colors: Vec<Color>, angle: f64) -> Self {
        Self { colors, angle }
    }
}

/// A radial gradient from `center` out to `radius`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadialGradient {
    pub colors: Vec<Color>,
    pub center: Point,
    pub radius: f64,
}

impl RadialGradient {
    pub fn new(colors: Vec<Color>, center: Point, radius: f64) -> Self {
        Self { colors, center, radius }
    }
}

/// Offset of stop `index` among `count` evenly spaced stops.
pub fn stop_offset(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

/// Anything a fill or stroke can be painted with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ColorSource {
    Solid(Color),
    Linear(Gradient),
    Radial(RadialGradient),
}

impl From<Color> for ColorSource {
    fn from(color: Color) -> Self {
        ColorSource::Solid(color)
    }
}

impl From<Gradient> for ColorSource {
    fn from(gradient: Gradient) -> Self {
        ColorSource::Linear(gradient)
    }
}

impl From<RadialGradient> for ColorSource {
    fn from(gradient: RadialGradient) -> Self {
        ColorSource::Radial(gradient)
    }
}

impl ColorSource {
    /// Representative single color.
    ///
    /// Gradient colors are folded left to right with
    /// `mix(acc, next, 1 / (index + 2))`. Order matters. Returns `None` for a
    /// gradient without colors.
    pub fn average(&self) -> Option<Color> {
        let colors = match self {
            ColorSource::Solid(color) => return Some(color.clone()),
            ColorSource::Linear(gradient) => &gradient.colors,
            ColorSource::Radial(gradient) => &gradient.colors,
        };
        let (first, rest) = colors.split_first()?;
        Some(rest.iter().enumerate().fold(first.clone(), |acc, (index, color)| {
            Color::mix(&acc, color, 1.0 / (index + 2) as f64)
        }))
    }
}
