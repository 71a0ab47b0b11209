//! Offscreen post-process pass: upload a frame, run a program over it and
//! read the result back.

use crate::context::{GpuContext, GpuError};
use crate::pipeline::{CompiledProgram, PipelineCache};
use crate::shaders::ShaderProgram;
use crate::texture::{check_size, nearest_sampler, GpuTexture};
use crate::uniforms::{self, Uniform, UniformValue, FIRST_EXTRA_BINDING};
use common::image::PixelBuffer;
use std::sync::Arc;
use wgpu::util::DeviceExt;

enum ExtraResource {
    Buffer(wgpu::Buffer),
    Texture(GpuTexture),
}

/// Runs shader programs against pixel buffers on a shared device.
pub struct ShaderPass {
    context: Arc<GpuContext>,
    cache: PipelineCache,
    sampler: wgpu::Sampler,
}

impl ShaderPass {
    pub fn new(context: Arc<GpuContext>) -> Self {
        let sampler = nearest_sampler(&context);
        Self {
            cache: PipelineCache::new(Arc::clone(&context)),
            context,
            sampler,
        }
    }

    /// Create a pass on the default adapter.
    pub async fn create() -> Result<Self, GpuError> {
        Ok(Self::new(Arc::new(GpuContext::new().await?)))
    }

    pub fn context(&self) -> &Arc<GpuContext> {
        &self.context
    }

    /// Compiled programs held by the pass.
    pub fn cached_programs(&self) -> usize {
        self.cache.len()
    }

    /// Render `program` over `input` and return the output at the same size.
    pub fn run(
        &self,
        input: &PixelBuffer,
        program: &ShaderProgram,
        uniforms: &[Uniform],
    ) -> Result<PixelBuffer, GpuError> {
        if input.is_empty() {
            return Err(GpuError::EmptyInput);
        }
        uniforms::validate(uniforms, &program.user_sources())?;

        let limit = self.context.device.limits().max_texture_dimension_2d;
        check_size(input.width, input.height, limit)?;
        for uniform in uniforms {
            if let UniformValue::Texture(pixels) = &uniform.value {
                check_size(pixels.width, pixels.height, limit)?;
            }
        }

        let source = program.compose(uniforms);
        let compiled = self.cache.get_or_compile(&source, uniforms)?;
        let device = &self.context.device;

        // Resource creation happens inside the scope so wgpu validation
        // failures come back as errors.
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let encoded = self.encode(input, &compiled, uniforms);
        let scope = futures::executor::block_on(device.pop_error_scope());
        let target = encoded?;
        if let Some(err) = scope {
            return Err(GpuError::Validation(err.to_string()));
        }

        tracing::trace!(width = input.width, height = input.height, "shader pass complete");
        target.read_pixels(&self.context)
    }

    /// Record and submit one draw of `compiled` over `input`.
    fn encode(
        &self,
        input: &PixelBuffer,
        compiled: &CompiledProgram,
        uniforms: &[Uniform],
    ) -> Result<GpuTexture, GpuError> {
        let device = &self.context.device;
        let image = GpuTexture::from_pixels(&self.context, "Shader Pass Input", input)?;
        let target = GpuTexture::render_target(&self.context, input.width, input.height)?;
        let size = [input.width as f32, input.height as f32];
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shader Pass Uniforms"),
            contents: &uniforms::pack(uniforms, size, size),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let mut extras = Vec::new();
        for uniform in uniforms {
            match &uniform.value {
                UniformValue::FloatArray(values) => {
                    extras.push(ExtraResource::Buffer(device.create_buffer_init(
                        &wgpu::util::BufferInitDescriptor {
                            label: Some(uniform.name.as_str()),
                            contents: &uniforms::array_bytes(values),
                            usage: wgpu::BufferUsages::STORAGE,
                        },
                    )));
                }
                UniformValue::Texture(pixels) => {
                    extras.push(ExtraResource::Texture(GpuTexture::from_pixels(
                        &self.context,
                        &uniform.name,
                        pixels,
                    )?));
                }
                _ => {}
            }
        }

        let mut entries = vec![
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&image.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&self.sampler),
            },
        ];
        for (binding, extra) in (FIRST_EXTRA_BINDING..).zip(&extras) {
            let resource = match extra {
                ExtraResource::Buffer(buffer) => buffer.as_entire_binding(),
                ExtraResource::Texture(texture) => wgpu::BindingResource::TextureView(&texture.view),
            };
            entries.push(wgpu::BindGroupEntry { binding, resource });
        }

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shader Pass Bind Group"),
            layout: &compiled.bind_group_layout,
            entries: &entries,
        });

        let mut encoder = self.context.create_command_encoder("Shader Pass Encoder");
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shader Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&compiled.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..6, 0..1);
        }
        self.context.submit(Some(encoder.finish()));
        Ok(target)
    }
}
