//! CPU shadow of a uniform buffer.
//!
//! Locations are byte offsets into the block. Matrices are written column by
//! column following WGSL uniform layout: a `mat4x4<f32>` is 64 contiguous
//! bytes, a `mat3x3<f32>` is three `vec3<f32>` columns on a 16-byte stride.

use glam::{Mat3, Mat4, Vec3};

use crate::backend::UniformUpload;
use crate::program::UniformLocation;

const MAT4_SIZE: usize = 64;
const MAT3_COLUMN_STRIDE: usize = 16;
const MAT3_SIZE: usize = 3 * MAT3_COLUMN_STRIDE;

/// Byte-addressed uniform data waiting to be copied to the GPU.
#[derive(Clone, Debug)]
pub struct UniformBlock {
    data: Vec<u8>,
    dirty: bool,
}

impl UniformBlock {
    /// Creates a zeroed block of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
            dirty: false,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whether anything was written since the last [`mark_clean`](Self::mark_clean).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn range(&self, location: UniformLocation, size: usize) -> Option<std::ops::Range<usize>> {
        if !location.is_valid() {
            return None;
        }
        let start = location.0 as usize;
        let end = start.checked_add(size)?;
        if end > self.data.len() {
            tracing::warn!(
                "Uniform write at offset {} ({} bytes) exceeds block of {} bytes",
                start,
                size,
                self.data.len()
            );
            return None;
        }
        Some(start..end)
    }

    fn write_floats(&mut self, offset: usize, values: &[f32]) {
        let bytes: &[u8] = bytemuck::cast_slice(values);
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self.dirty = true;
    }

    fn read_floats<const N: usize>(&self, offset: usize) -> [f32; N] {
        let mut values = [0.0f32; N];
        let bytes = &self.data[offset..offset + N * 4];
        for (value, chunk) in values.iter_mut().zip(bytes.chunks_exact(4)) {
            *value = bytemuck::pod_read_unaligned(chunk);
        }
        values
    }

    /// Reads back a 4×4 matrix written at `location`.
    pub fn read_mat4(&self, location: UniformLocation) -> Option<Mat4> {
        let range = self.range(location, MAT4_SIZE)?;
        Some(Mat4::from_cols_array(&self.read_floats::<16>(range.start)))
    }

    /// Reads back a 3×3 matrix written at `location`.
    pub fn read_mat3(&self, location: UniformLocation) -> Option<Mat3> {
        let range = self.range(location, MAT3_SIZE)?;
        let column = |i: usize| {
            let [x, y, z] = self.read_floats::<3>(range.start + i * MAT3_COLUMN_STRIDE);
            Vec3::new(x, y, z)
        };
        Some(Mat3::from_cols(column(0), column(1), column(2)))
    }
}

impl UniformUpload for UniformBlock {
    fn upload_mat4(&mut self, location: UniformLocation, matrix: &Mat4) {
        if let Some(range) = self.range(location, MAT4_SIZE) {
            self.write_floats(range.start, &matrix.to_cols_array());
        }
    }

    fn upload_mat3(&mut self, location: UniformLocation, matrix: &Mat3) {
        let Some(range) = self.range(location, MAT3_SIZE) else {
            return;
        };
        let columns = [matrix.x_axis, matrix.y_axis, matrix.z_axis];
        for (i, column) in columns.iter().enumerate() {
            // The fourth lane of each column is padding.
            let padded = [column.x, column.y, column.z, 0.0];
            self.write_floats(range.start + i * MAT3_COLUMN_STRIDE, &padded);
        }
    }
}
