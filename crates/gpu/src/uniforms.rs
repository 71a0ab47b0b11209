//! Named shader uniforms: validation, WGSL declarations and byte packing.
//!
//! Scalar and vector uniforms live in the `Uniforms` struct bound at
//! `@group(0) @binding(0)` and are read as `u.<name>`. Float arrays become
//! read-only storage buffers and textures become `texture_2d<f32>` globals,
//! both addressed by their bare name.

use crate::context::GpuError;
use common::image::PixelBuffer;
use regex::Regex;
use std::collections::HashSet;

/// Names declared by the generated prelude; uniforms may not reuse them.
pub const RESERVED_NAMES: &[&str] = &[
    "u",
    "u_image",
    "u_sampler",
    "resolution",
    "texture_size",
    "Uniforms",
    "VertexOutput",
    "vs_main",
    "fs_main",
];

/// First binding slot available to array and texture uniforms.
pub(crate) const FIRST_EXTRA_BINDING: u32 = 3;

/// Value bound to a uniform name.
#[derive(Clone, Debug, PartialEq)]
pub enum UniformValue {
    Vec2([f32; 2]),
    Vec4([f32; 4]),
    Float(f32),
    FloatArray(Vec<f32>),
    Texture(PixelBuffer),
}

impl UniformValue {
    fn wgsl_type(&self) -> &'static str {
        match self {
            UniformValue::Vec2(_) => "vec2<f32>",
            UniformValue::Vec4(_) => "vec4<f32>",
            UniformValue::Float(_) => "f32",
            UniformValue::FloatArray(_) => "array<f32>",
            UniformValue::Texture(_) => "texture_2d<f32>",
        }
    }

    /// `(align, size)` inside the uniform struct, `None` for values bound
    /// outside it.
    fn struct_layout(&self) -> Option<(u64, u64)> {
        match self {
            UniformValue::Vec2(_) => Some((8, 8)),
            UniformValue::Vec4(_) => Some((16, 16)),
            UniformValue::Float(_) => Some((4, 4)),
            UniformValue::FloatArray(_) | UniformValue::Texture(_) => None,
        }
    }
}

/// A named uniform binding.
#[derive(Clone, Debug, PartialEq)]
pub struct Uniform {
    pub name: String,
    pub value: UniformValue,
}

impl Uniform {
    pub fn new(name: impl Into<String>, value: UniformValue) -> Self {
        Self { name: name.into(), value }
    }

    pub fn vec2(name: impl Into<String>, value: [f32; 2]) -> Self {
        Self::new(name, UniformValue::Vec2(value))
    }

    pub fn vec4(name: impl Into<String>, value: [f32; 4]) -> Self {
        Self::new(name, UniformValue::Vec4(value))
    }

    pub fn float(name: impl Into<String>, value: f32) -> Self {
        Self::new(name, UniformValue::Float(value))
    }

    pub fn float_array(name: impl Into<String>, value: Vec<f32>) -> Self {
        Self::new(name, UniformValue::FloatArray(value))
    }

    pub fn texture(name: impl Into<String>, value: PixelBuffer) -> Self {
        Self::new(name, UniformValue::Texture(value))
    }
}

/// Check names against WGSL identifier rules, the prelude and the user
/// sources. A uniform that no source mentions is rejected.
pub fn validate(uniforms: &[Uniform], sources: &[&str]) -> Result<(), GpuError> {
    let identifier = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")
        .map_err(|err| GpuError::InvalidUniform(err.to_string()))?;
    let mut seen = HashSet::new();
    for uniform in uniforms {
        let name = uniform.name.as_str();
        if !identifier.is_match(name) {
            return Err(GpuError::InvalidUniform(format!("`{}` is not a WGSL identifier", name)));
        }
        if RESERVED_NAMES.contains(&name) {
            return Err(GpuError::InvalidUniform(format!("`{}` is reserved", name)));
        }
        if !seen.insert(name) {
            return Err(GpuError::InvalidUniform(format!("`{}` is bound twice", name)));
        }
        if let UniformValue::Texture(image) = &uniform.value {
            if image.is_empty() {
                return Err(GpuError::InvalidUniform(format!("texture `{}` is empty", name)));
            }
        }

        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(name)))
            .map_err(|err| GpuError::InvalidUniform(err.to_string()))?;
        if !sources.iter().any(|source| pattern.is_match(source)) {
            return Err(GpuError::UnknownUniform(name.to_string()));
        }
    }
    Ok(())
}

/// Byte offsets of every field of the `Uniforms` struct.
#[derive(Clone, Debug, PartialEq)]
pub struct UniformLayout {
    /// `(name, offset)` for user fields, in declaration order.
    pub fields: Vec<(String, u64)>,
    /// Buffer size, a multiple of 16.
    pub size: u64,
}

fn align_to(value: u64, align: u64) -> u64 {
    value.div_ceil(align) * align
}

/// Lay out the struct: `resolution` and `texture_size` first, then the
/// scalar and vector uniforms in order, following WGSL alignment rules.
pub fn layout(uniforms: &[Uniform]) -> UniformLayout {
    let mut offset = 16;
    let mut fields = Vec::new();
    for uniform in uniforms {
        if let Some((align, size)) = uniform.value.struct_layout() {
            offset = align_to(offset, align);
            fields.push((uniform.name.clone(), offset));
            offset += size;
        }
    }
    UniformLayout {
        fields,
        size: align_to(offset, 16),
    }
}

/// Fill the uniform buffer contents.
pub fn pack(uniforms: &[Uniform], resolution: [f32; 2], texture_size: [f32; 2]) -> Vec<u8> {
    let layout = layout(uniforms);
    let mut bytes = vec![0u8; layout.size as usize];
    write_floats(&mut bytes, 0, &resolution);
    write_floats(&mut bytes, 8, &texture_size);

    let scalars = uniforms.iter().filter(|u| u.value.struct_layout().is_some());
    for (uniform, (_, offset)) in scalars.zip(&layout.fields) {
        let offset = *offset as usize;
        match &uniform.value {
            UniformValue::Vec2(v) => write_floats(&mut bytes, offset, v),
            UniformValue::Vec4(v) => write_floats(&mut bytes, offset, v),
            UniformValue::Float(v) => write_floats(&mut bytes, offset, &[*v]),
            UniformValue::FloatArray(_) | UniformValue::Texture(_) => {}
        }
    }
    bytes
}

fn write_floats(bytes: &mut [u8], offset: usize, values: &[f32]) {
    let src: &[u8] = bytemuck::cast_slice(values);
    bytes[offset..offset + src.len()].copy_from_slice(src);
}

/// WGSL declarations for the struct and every binding.
pub fn declarations(uniforms: &[Uniform]) -> String {
    let mut wgsl = String::from("struct Uniforms {\n    resolution: vec2<f32>,\n    texture_size: vec2<f32>,\n");
    for uniform in uniforms.iter().filter(|u| u.value.struct_layout().is_some()) {
        wgsl.push_str(&format!("    {}: {},\n", uniform.name, uniform.value.wgsl_type()));
    }
    wgsl.push_str("}\n\n");
    wgsl.push_str("@group(0) @binding(0) var<uniform> u: Uniforms;\n");
    wgsl.push_str("@group(0) @binding(1) var u_image: texture_2d<f32>;\n");
    wgsl.push_str("@group(0) @binding(2) var u_sampler: sampler;\n");

    let mut binding = FIRST_EXTRA_BINDING;
    for uniform in uniforms {
        match &uniform.value {
            UniformValue::FloatArray(_) => {
                wgsl.push_str(&format!(
                    "@group(0) @binding({}) var<storage, read> {}: array<f32>;\n",
                    binding, uniform.name
                ));
                binding += 1;
            }
            UniformValue::Texture(_) => {
                wgsl.push_str(&format!(
                    "@group(0) @binding({}) var {}: texture_2d<f32>;\n",
                    binding, uniform.name
                ));
                binding += 1;
            }
            _ => {}
        }
    }
    wgsl
}

/// Storage buffers cannot be empty; an empty array is padded with one zero.
pub(crate) fn array_bytes(values: &[f32]) -> Vec<u8> {
    if values.is_empty() {
        return vec![0; 4];
    }
    bytemuck::cast_slice(values).to_vec()
}
