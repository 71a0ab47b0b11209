//! Offscreen GPU post-processing using wgpu.
//!
//! A [`ShaderPass`] uploads a rendered frame, runs a WGSL program over a
//! full-screen quad and reads the result back into a [`PixelBuffer`].
//!
//! [`PixelBuffer`]: common::image::PixelBuffer

pub mod context;
pub mod pipeline;
pub mod shader_pass;
pub mod shaders;
pub mod texture;
pub mod uniforms;

pub use context::{GpuContext, GpuContextBuilder, GpuError};
pub use shader_pass::ShaderPass;
pub use shaders::ShaderProgram;
pub use uniforms::{Uniform, UniformValue};
