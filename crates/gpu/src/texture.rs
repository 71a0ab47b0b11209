//! GPU texture management for the offscreen pass.

use crate::context::{GpuContext, GpuError};
use common::image::PixelBuffer;
use wgpu::{
    AddressMode, Extent3d, FilterMode, Sampler, SamplerDescriptor, Texture, TextureDescriptor,
    TextureDimension, TextureFormat, TextureUsages, TextureView, TextureViewDescriptor,
};

/// Format of every texture the pass creates. Pixel buffers hold straight
/// RGBA bytes, so no sRGB conversion is applied.
pub const TEXTURE_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

/// GPU texture wrapper.
pub struct GpuTexture {
    /// The wgpu texture.
    pub texture: Texture,
    /// Texture view.
    pub view: TextureView,
    pub width: u32,
    pub height: u32,
}

impl GpuTexture {
    fn create(context: &GpuContext, label: &str, width: u32, height: u32, usage: TextureUsages) -> Self {
        let texture = context.device.create_texture(&TextureDescriptor {
            label: Some(label),
            size: extent(width, height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Upload a pixel buffer as a sampled texture.
    pub fn from_pixels(context: &GpuContext, label: &str, image: &PixelBuffer) -> Result<Self, GpuError> {
        if image.is_empty() {
            return Err(GpuError::EmptyInput);
        }
        check_size(image.width, image.height, context.device.limits().max_texture_dimension_2d)?;
        let texture = Self::create(
            context,
            label,
            image.width,
            image.height,
            TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        );

        context.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            extent(image.width, image.height),
        );

        Ok(texture)
    }

    /// Create a render target that can be copied back to the host.
    pub fn render_target(context: &GpuContext, width: u32, height: u32) -> Result<Self, GpuError> {
        check_size(width, height, context.device.limits().max_texture_dimension_2d)?;
        Ok(Self::create(
            context,
            "Shader Pass Target",
            width,
            height,
            TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
        ))
    }

    /// Copy the texture contents into a pixel buffer.
    pub fn read_pixels(&self, context: &GpuContext) -> Result<PixelBuffer, GpuError> {
        let unpadded = 4 * self.width;
        let padded = padded_bytes_per_row(self.width);
        let buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Buffer"),
            size: padded as u64 * self.height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = context.create_command_encoder("Readback Encoder");
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.height),
                },
            },
            extent(self.width, self.height),
        );
        context.submit(Some(encoder.finish()));

        let slice = buffer.slice(..);
        let (sender, receiver) = futures::channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        context.wait_idle();
        futures::executor::block_on(receiver)
            .map_err(|err| GpuError::Readback(err.to_string()))?
            .map_err(|err| GpuError::Readback(err.to_string()))?;

        let mut data = Vec::with_capacity((unpadded * self.height) as usize);
        {
            let mapped = slice.get_mapped_range();
            for row in mapped.chunks(padded as usize) {
                data.extend_from_slice(&row[..unpadded as usize]);
            }
        }
        buffer.unmap();

        PixelBuffer::from_rgba(self.width, self.height, data)
            .map_err(|err| GpuError::Readback(err.to_string()))
    }
}

/// Nearest-neighbour sampler clamped to the edges, so a pass-through
/// program reproduces its input exactly.
pub fn nearest_sampler(context: &GpuContext) -> Sampler {
    context.device.create_sampler(&SamplerDescriptor {
        label: Some("Shader Pass Sampler"),
        address_mode_u: AddressMode::ClampToEdge,
        address_mode_v: AddressMode::ClampToEdge,
        address_mode_w: AddressMode::ClampToEdge,
        mag_filter: FilterMode::Nearest,
        min_filter: FilterMode::Nearest,
        mipmap_filter: FilterMode::Nearest,
        ..Default::default()
    })
}

/// Row stride for texture-to-buffer copies.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (4 * width).div_ceil(align) * align
}

fn extent(width: u32, height: u32) -> Extent3d {
    Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

/// Reject sizes the device cannot allocate. wgpu reports those through its
/// uncaptured error handler, which panics.
pub fn check_size(width: u32, height: u32, max_dimension: u32) -> Result<(), GpuError> {
    if width > max_dimension || height > max_dimension {
        return Err(GpuError::TooLarge {
            width,
            height,
            max: max_dimension,
        });
    }
    Ok(())
}
