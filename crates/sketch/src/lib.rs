//! Sketch preview: renders a generative demo frame with the drawing crates.

pub mod demo;

pub use demo::{demo_frame, vignette};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
