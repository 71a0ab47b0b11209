//! Render pipeline compilation and caching.

use crate::context::{GpuContext, GpuError};
use crate::texture::TEXTURE_FORMAT;
use crate::uniforms::{Uniform, UniformValue, FIRST_EXTRA_BINDING};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use wgpu::{
    BindGroupLayout, BindGroupLayoutEntry, BindingType, ColorTargetState, ColorWrites,
    FragmentState, FrontFace, MultisampleState, PolygonMode, PrimitiveState, PrimitiveTopology,
    RenderPipeline, ShaderStages, VertexState,
};

/// A compiled program and the layout its bind group must follow.
pub struct CompiledProgram {
    pub pipeline: RenderPipeline,
    pub bind_group_layout: BindGroupLayout,
}

/// Pipelines keyed by their complete WGSL source.
pub struct PipelineCache {
    context: Arc<GpuContext>,
    programs: Mutex<HashMap<String, Arc<CompiledProgram>>>,
}

impl PipelineCache {
    pub fn new(context: Arc<GpuContext>) -> Self {
        Self {
            context,
            programs: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached programs.
    pub fn len(&self) -> usize {
        self.programs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.lock().is_empty()
    }

    /// Fetch the pipeline for `source`, compiling it on first use.
    pub fn get_or_compile(&self, source: &str, uniforms: &[Uniform]) -> Result<Arc<CompiledProgram>, GpuError> {
        if let Some(program) = self.programs.lock().get(source) {
            return Ok(Arc::clone(program));
        }

        let program = Arc::new(self.compile(source, uniforms)?);
        tracing::debug!(cached = self.len() + 1, "compiled shader program");
        self.programs
            .lock()
            .insert(source.to_string(), Arc::clone(&program));
        Ok(program)
    }

    fn compile(&self, source: &str, uniforms: &[Uniform]) -> Result<CompiledProgram, GpuError> {
        let device = &self.context.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader Pass Module"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shader Pass Bind Group Layout"),
            entries: &layout_entries(uniforms),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shader Pass Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shader Pass Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(ColorTargetState {
                    format: TEXTURE_FORMAT,
                    blend: None,
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = futures::executor::block_on(device.pop_error_scope()) {
            tracing::warn!(error = %err, "shader program failed to compile");
            return Err(GpuError::Compile(err.to_string()));
        }

        Ok(CompiledProgram {
            pipeline,
            bind_group_layout,
        })
    }
}

fn texture_entry(binding: u32) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::VERTEX_FRAGMENT,
        ty: BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// Entries matching the bindings emitted by `uniforms::declarations`.
fn layout_entries(uniforms: &[Uniform]) -> Vec<BindGroupLayoutEntry> {
    let mut entries = vec![
        BindGroupLayoutEntry {
            binding: 0,
            visibility: ShaderStages::VERTEX_FRAGMENT,
            ty: BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        },
        texture_entry(1),
        BindGroupLayoutEntry {
            binding: 2,
            visibility: ShaderStages::VERTEX_FRAGMENT,
            ty: BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
    ];

    let mut binding = FIRST_EXTRA_BINDING;
    for uniform in uniforms {
        match &uniform.value {
            UniformValue::FloatArray(_) => {
                entries.push(BindGroupLayoutEntry {
                    binding,
                    visibility: ShaderStages::VERTEX_FRAGMENT,
                    ty: BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                });
                binding += 1;
            }
            UniformValue::Texture(_) => {
                entries.push(texture_entry(binding));
                binding += 1;
            }
            _ => {}
        }
    }
    entries
}
