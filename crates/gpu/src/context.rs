//! Headless GPU context and device management.

use common::error::DrawError;
use thiserror::Error;
use wgpu::{Adapter, Device, Instance, Queue};

/// Errors that can occur during GPU operations.
#[derive(Error, Debug)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,
    #[error("Failed to request device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
    #[error("Shader compilation failed: {0}")]
    Compile(String),
    #[error("Uniform `{0}` is not referenced by the shader source")]
    UnknownUniform(String),
    #[error("Invalid uniform: {0}")]
    InvalidUniform(String),
    #[error("GPU validation error: {0}")]
    Validation(String),
    #[error("Failed to read back render target: {0}")]
    Readback(String),
    #[error("Input image is empty")]
    EmptyInput,
    #[error("Image of {width}x{height} exceeds the device texture limit of {max}")]
    TooLarge { width: u32, height: u32, max: u32 },
}

impl From<GpuError> for DrawError {
    fn from(err: GpuError) -> Self {
        match err {
            GpuError::Compile(diagnostic) => DrawError::GpuCompile(diagnostic),
            other => DrawError::Gpu(other.to_string()),
        }
    }
}

/// Device and queue shared by every shader pass.
pub struct GpuContext {
    pub instance: Instance,
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
}

impl GpuContext {
    /// Context on the preferred adapter, falling back to a software adapter
    /// when no hardware one is available.
    pub async fn new() -> Result<Self, GpuError> {
        match GpuContextBuilder::new().build().await {
            Err(GpuError::NoAdapter) => {
                tracing::warn!("no hardware adapter, trying the fallback adapter");
                GpuContextBuilder::new().software(true).build().await
            }
            result => result,
        }
    }

    pub fn create_command_encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }

    pub fn submit(&self, commands: impl IntoIterator<Item = wgpu::CommandBuffer>) {
        self.queue.submit(commands);
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Block until submitted work has finished. Readbacks rely on this to
    /// resolve their map callbacks.
    pub fn wait_idle(&self) -> bool {
        self.device.poll(wgpu::Maintain::Wait).is_queue_empty()
    }
}

/// Adapter selection for a [`GpuContext`].
pub struct GpuContextBuilder {
    backends: wgpu::Backends,
    power_preference: wgpu::PowerPreference,
    software: bool,
    label: &'static str,
}

impl GpuContextBuilder {
    pub fn new() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            software: false,
            label: "Shader Pass Device",
        }
    }

    pub fn backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }

    pub fn power_preference(mut self, preference: wgpu::PowerPreference) -> Self {
        self.power_preference = preference;
        self
    }

    /// Ask for the fallback (software) adapter.
    pub fn software(mut self, enabled: bool) -> Self {
        self.software = enabled;
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub async fn build(self) -> Result<GpuContext, GpuError> {
        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends: self.backends,
            ..Default::default()
        });

        // No compatible surface: passes only ever render offscreen.
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: self.power_preference,
                compatible_surface: None,
                force_fallback_adapter: self.software,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some(self.label),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                },
                None,
            )
            .await?;

        let info = adapter.get_info();
        tracing::info!(adapter = %info.name, backend = ?info.backend, software = self.software, "GPU context ready");

        Ok(GpuContext {
            instance,
            adapter,
            device,
            queue,
        })
    }
}

impl Default for GpuContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
