//! Headless GPU device and queue.
//!
//! The transform pipeline never presents anything, so [`GpuContext`] only
//! holds the device for creating uniform buffers and the queue for uploading
//! them. Window surfaces belong to the caller.

/// Core GPU context holding wgpu resources.
///
/// # Example
///
/// ```no_run
/// use hoplite_transform::GpuContext;
///
/// let gpu = GpuContext::headless().expect("no GPU available");
/// let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
///     label: Some("My Buffer"),
///     size: 256,
///     usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
///     mapped_at_creation: false,
/// });
/// gpu.queue.write_buffer(&buffer, 0, &[0u8; 256]);
/// ```
pub struct GpuContext {
    /// The logical GPU device for creating resources.
    pub device: wgpu::Device,
    /// The command queue for submitting work to the GPU.
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Create a device and queue without a surface.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Gpu`](crate::PipelineError::Gpu) when no
    /// adapter is available or the device cannot be created.
    pub fn headless() -> crate::PipelineResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        }))?;

        tracing::info!("Using GPU adapter: {:?}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Hoplite Transform Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: Default::default(),
            experimental_features: Default::default(),
        }))?;

        Ok(Self { device, queue })
    }
}
