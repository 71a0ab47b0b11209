//! WGSL sources for the post-process pass.
//!
//! A program is assembled from the generated uniform prelude, a vertex stage
//! (`vs_main`) and a fragment stage (`fs_main`). Either stage may be omitted
//! to use the pass-through defaults below.

use crate::uniforms::{self, Uniform};

/// Interface between the stages, declared once in the prelude.
pub const VERTEX_OUTPUT: &str = r#"
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) tex_coord: vec2<f32>,
}
"#;

/// Full-screen quad from the vertex index; texture row 0 is the top row.
pub const DEFAULT_VERTEX_SHADER: &str = r#"
@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    var positions = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
    );
    let position = positions[index];
    var output: VertexOutput;
    output.position = vec4<f32>(position, 0.0, 1.0);
    output.tex_coord = vec2<f32>((position.x + 1.0) * 0.5, (1.0 - position.y) * 0.5);
    return output;
}
"#;

/// Copies the input frame unchanged.
pub const DEFAULT_FRAGMENT_SHADER: &str = r#"
@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(u_image, u_sampler, input.tex_coord);
}
"#;

/// User-supplied stages. `None` selects the default for that stage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShaderProgram {
    pub vertex: Option<String>,
    pub fragment: Option<String>,
}

impl ShaderProgram {
    /// Pass-through program.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fragment(mut self, source: impl Into<String>) -> Self {
        self.fragment = Some(source.into());
        self
    }

    pub fn with_vertex(mut self, source: impl Into<String>) -> Self {
        self.vertex = Some(source.into());
        self
    }

    /// Sources written by the caller, for uniform reference checks.
    pub fn user_sources(&self) -> Vec<&str> {
        self.vertex
            .iter()
            .chain(self.fragment.iter())
            .map(String::as_str)
            .collect()
    }

    /// Complete WGSL module for the given uniform set.
    pub fn compose(&self, uniforms: &[Uniform]) -> String {
        let mut source = uniforms::declarations(uniforms);
        source.push_str(VERTEX_OUTPUT);
        source.push_str(self.vertex.as_deref().unwrap_or(DEFAULT_VERTEX_SHADER));
        source.push('\n');
        source.push_str(self.fragment.as_deref().unwrap_or(DEFAULT_FRAGMENT_SHADER));
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_program_composition() {
        let source = ShaderProgram::new().compose(&[]);
        assert!(source.contains("var<uniform> u: Uniforms;"));
        assert!(source.contains("fn vs_main"));
        assert!(source.contains("textureSample(u_image, u_sampler"));
        assert!(ShaderProgram::new().user_sources().is_empty());
    }

    #[test]
    fn test_custom_fragment_replaces_default() {
        let fragment = "@fragment fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> { return vec4<f32>(u.u_time); }";
        let program = ShaderProgram::new().with_fragment(fragment);
        let source = program.compose(&[Uniform::float("u_time", 1.0)]);
        assert!(source.contains("u_time: f32"));
        assert!(source.contains(fragment));
        assert!(!source.contains("textureSample(u_image, u_sampler, input.tex_coord)"));
        assert_eq!(program.user_sources(), vec![fragment]);
    }
}
