//! GPU uniform buffer fed by the shader strategy.
//!
//! [`TransformUniformBuffer`] is a [`UniformUpload`] sink: the pipeline writes
//! matrices into its CPU-side [`UniformBlock`] during
//! [`apply`](crate::PipelineState::apply), and the end of each apply copies
//! that block into its own slot of a ring. Every draw binds its slot with a
//! dynamic offset, so several draws can share one submission. A single
//! [`flush`](TransformUniformBuffer::flush) before the submit uploads all slots
//! and starts the ring over.
//!
//! # Example
//!
//! ```no_run
//! use hoplite_transform::*;
//!
//! let gpu = GpuContext::headless().unwrap();
//! let mut programs = ProgramArena::new();
//! let program = WgslProgram::from_source(
//!     programs.allocate(),
//!     TRANSFORM_WGSL,
//!     "transforms",
//! )
//! .unwrap();
//!
//! let uniforms = TransformUniformBuffer::for_program(&gpu, &program, 64);
//! let mut pipeline = PipelineState::shader(&PipelineConfig::default(), uniforms);
//!
//! for x in 0..3 {
//!     pipeline.with_pushed(|p| {
//!         p.translate(Vec3::new(x as f32, 0.0, -5.0));
//!         p.apply(&program);
//!         // record the draw here, after `p.backend().uniforms().bind(&mut pass)`
//!     });
//! }
//! assert_eq!(pipeline.backend().uniforms().slots_used(), 3);
//!
//! pipeline.backend_mut().uniforms_mut().flush(&gpu.queue);
//! gpu.queue.submit([]);
//! ```

use glam::{Mat3, Mat4};

use crate::backend::UniformUpload;
use crate::gpu::GpuContext;
use crate::program::UniformLocation;
use crate::uniform_block::UniformBlock;
use crate::wgsl_program::WgslProgram;

/// CPU staging for one uniform block per draw, at aligned strides.
#[derive(Debug)]
struct UniformRing {
    data: Vec<u8>,
    stride: usize,
    capacity: usize,
    used: usize,
}

impl UniformRing {
    fn new(block_size: usize, alignment: usize, capacity: usize) -> Self {
        let stride = block_size.max(1).next_multiple_of(alignment.max(1));
        let capacity = capacity.max(1);
        Self {
            data: vec![0; stride * capacity],
            stride,
            capacity,
            used: 0,
        }
    }

    /// Copies `block` into the next free slot and returns the slot's byte
    /// offset. A full ring reuses its last slot.
    fn commit(&mut self, block: &[u8]) -> u32 {
        let slot = if self.used < self.capacity {
            self.used += 1;
            self.used - 1
        } else {
            tracing::warn!(
                "Transform uniform ring is full ({} slots), overwriting the last slot",
                self.capacity
            );
            self.capacity - 1
        };

        let start = slot * self.stride;
        let len = block.len().min(self.stride);
        self.data[start..start + len].copy_from_slice(&block[..len]);
        start as u32
    }

    /// Bytes of every slot committed since the last reset.
    fn committed(&self) -> &[u8] {
        &self.data[..self.used * self.stride]
    }

    fn reset(&mut self) {
        self.used = 0;
    }
}

/// A wgpu uniform buffer with its bind group, shadowed on the CPU.
pub struct TransformUniformBuffer {
    block: UniformBlock,
    ring: UniformRing,
    offset: u32,
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    group: u32,
}

impl TransformUniformBuffer {
    /// Creates a buffer with room for `slots` draws per submission, each a
    /// block of `size` bytes bound at `binding` of bind group `group`.
    pub fn new(gpu: &GpuContext, size: u32, group: u32, binding: u32, slots: usize) -> Self {
        let device = &gpu.device;
        // Uniform buffer sizes must be multiples of 16.
        let size = size.next_multiple_of(16).max(16);
        let alignment = device.limits().min_uniform_buffer_offset_alignment as usize;
        let ring = UniformRing::new(size as usize, alignment, slots);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Transform Uniforms"),
            size: ring.data.len() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Transform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(size as u64),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transform Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(size as u64),
                }),
            }],
        });

        tracing::debug!(
            "Transform uniform ring: {} slots of {} bytes (stride {})",
            ring.capacity,
            size,
            ring.stride
        );

        Self {
            block: UniformBlock::new(size as usize),
            ring,
            offset: 0,
            buffer,
            bind_group_layout,
            bind_group,
            group,
        }
    }

    /// Creates a buffer matching the reflected block of `program`.
    pub fn for_program(gpu: &GpuContext, program: &WgslProgram, slots: usize) -> Self {
        Self::new(
            gpu,
            program.block_size(),
            program.group(),
            program.binding(),
            slots,
        )
    }

    /// Uploads every slot committed since the last flush. Call once per
    /// submission, before `queue.submit`.
    pub fn flush(&mut self, queue: &wgpu::Queue) {
        let committed = self.ring.committed();
        if !committed.is_empty() {
            queue.write_buffer(&self.buffer, 0, committed);
        }
        self.ring.reset();
    }

    /// Binds the slot of the latest apply into a render pass.
    pub fn bind<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_bind_group(self.group, &self.bind_group, &[self.offset]);
    }

    /// Dynamic offset of the slot written by the latest apply.
    pub fn dynamic_offset(&self) -> u32 {
        self.offset
    }

    /// Slots committed since the last flush.
    pub fn slots_used(&self) -> usize {
        self.ring.used
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity
    }

    pub fn block(&self) -> &UniformBlock {
        &self.block
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

impl UniformUpload for TransformUniformBuffer {
    fn upload_mat4(&mut self, location: UniformLocation, matrix: &Mat4) {
        self.block.upload_mat4(location, matrix);
    }

    fn upload_mat3(&mut self, location: UniformLocation, matrix: &Mat3) {
        self.block.upload_mat3(location, matrix);
    }

    fn commit(&mut self) {
        self.offset = self.ring.commit(self.block.as_bytes());
        self.block.mark_clean();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn block_with(matrix: Mat4) -> UniformBlock {
        let mut block = UniformBlock::new(176);
        block.upload_mat4(UniformLocation(0), &matrix);
        block
    }

    fn slot_matrix(ring: &UniformRing, offset: u32) -> Mat4 {
        let start = offset as usize;
        let floats: Vec<f32> = ring.committed()[start..start + 64]
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned)
            .collect();
        Mat4::from_cols_slice(&floats)
    }

    #[test]
    fn every_commit_gets_its_own_aligned_slot() {
        let mut ring = UniformRing::new(176, 256, 8);
        let matrices = [
            Mat4::from_translation(Vec3::X),
            Mat4::from_translation(Vec3::Y),
            Mat4::from_translation(Vec3::Z),
        ];

        let offsets: Vec<u32> = matrices
            .iter()
            .map(|m| ring.commit(block_with(*m).as_bytes()))
            .collect();

        assert_eq!(offsets, vec![0, 256, 512]);
        assert_eq!(ring.committed().len(), 3 * 256);
        for (offset, matrix) in offsets.iter().zip(matrices) {
            assert_eq!(slot_matrix(&ring, *offset), matrix);
        }
    }

    #[test]
    fn reset_starts_over_at_first_slot() {
        let mut ring = UniformRing::new(64, 256, 4);
        ring.commit(block_with(Mat4::IDENTITY).as_bytes());
        ring.commit(block_with(Mat4::IDENTITY).as_bytes());
        ring.reset();

        assert!(ring.committed().is_empty());
        assert_eq!(ring.commit(block_with(Mat4::IDENTITY).as_bytes()), 0);
    }

    #[test]
    fn full_ring_reuses_last_slot() {
        let mut ring = UniformRing::new(64, 64, 2);
        assert_eq!(ring.commit(block_with(Mat4::IDENTITY).as_bytes()), 0);
        assert_eq!(ring.commit(block_with(Mat4::IDENTITY).as_bytes()), 64);

        let last = Mat4::from_scale(Vec3::splat(2.0));
        assert_eq!(ring.commit(block_with(last).as_bytes()), 64);
        assert_eq!(ring.committed().len(), 128);
        assert_eq!(slot_matrix(&ring, 64), last);
    }

    #[test]
    fn stride_covers_the_block() {
        let ring = UniformRing::new(300, 256, 1);
        assert_eq!(ring.stride, 512);
    }
}
