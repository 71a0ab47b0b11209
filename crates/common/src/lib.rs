//! Common types shared by the drawing crates: geometry, colors, pixel
//! buffers and the error taxonomy.

pub mod color;
pub mod ease;
pub mod error;
pub mod geometry;
pub mod image;
pub mod intersection;
pub mod polygon;
pub mod probability;

pub use color::{Color, ColorSource, Gradient, RadialGradient};
pub use ease::Easing;
pub use error::{DrawError, DrawResult};
pub use geometry::{CurvePoint, PathPoint, Point, Point3D, Rect};
pub use image::PixelBuffer;
pub use intersection::{find_intersection, get_intersection, Edge};
pub use polygon::Polygon;
