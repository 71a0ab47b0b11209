//! Declarative drawing for the sketch workspace.
//!
//! This crate handles:
//! - The drawable tree a frame is described with
//! - Traversal of that tree onto a 2D surface
//! - Smooth-path synthesis and gradient placement
//! - Click regions, visibility-gated drawing and frame pacing

pub mod canvas;
pub mod commands;
pub mod config;
pub mod debug;
pub mod drawable;
pub mod extremum;
pub mod interaction;
pub mod random;
pub mod renderer;
pub mod smoothing;
pub mod style;
pub mod surface;
pub mod tick;

pub use canvas::Canvas;
pub use commands::{RecordingSurface, SurfaceCommand};
pub use config::{DebugOptions, RenderConfig};
pub use drawable::{
    Border, CircularArc, ClickRegion, Clip, ClipShape, Drawable, FrameDefinition, Line, Overlay,
    RenderOnlyWhenVisible, Seed, Shader, Shape, SmoothLine, SmoothShape, Translate, UpdateImageData,
};
pub use interaction::{EventHandler, EventKind, InteractionLayer, ListenerHandle, PointerEvent};
pub use random::{RandomStack, SeededRandom};
pub use renderer::{Renderer, TraversalContext};
pub use style::{CompositeOperation, Fill, Filter, LineStyle, Stroke};
pub use surface::{Paint, Surface};
