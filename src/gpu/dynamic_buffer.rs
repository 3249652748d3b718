//! GPU buffers whose contents are replaced wholesale.
//!
//! A write that exceeds the current capacity reallocates with 2x growth;
//! buffers never shrink (GPU buffers cannot be resized in place), so
//! `len` tracks how much of the allocation holds live data.

use wgpu::util::DeviceExt;

/// Smallest allocation handed to wgpu.
const MIN_CAPACITY: usize = 64;

/// A larger allocation made by [`DynamicBuffer::prepare_growth`] but not
/// yet swapped in.
pub struct PendingGrowth {
    buffer: wgpu::Buffer,
    capacity: usize,
}

/// New capacity for holding `needed` bytes: 2x growth, at least 1KB more
/// than `current`. `None` when `current` is already large enough.
#[must_use]
pub fn grown_capacity(current: usize, needed: usize) -> Option<usize> {
    (needed > current).then(|| (needed * 2).max(current + 1024))
}

/// A GPU buffer that can grow dynamically.
pub struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: usize, // Capacity in bytes
    len: usize,      // Current data length in bytes
    usage: wgpu::BufferUsages,
    label: String,
}

impl DynamicBuffer {
    /// Empty buffer with the given initial byte capacity.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        initial_capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = initial_capacity.max(MIN_CAPACITY);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            capacity,
            len: 0,
            usage,
            label: label.to_owned(),
        }
    }

    /// Buffer initialized from existing bytes.
    pub fn new_with_data(
        device: &wgpu::Device,
        label: &str,
        data: &[u8],
        usage: wgpu::BufferUsages,
    ) -> Self {
        if data.is_empty() {
            return Self::new(device, label, 0, usage);
        }

        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            });

        Self {
            buffer,
            capacity: data.len(),
            len: data.len(),
            usage,
            label: label.to_owned(),
        }
    }

    /// A larger allocation able to hold `needed` bytes, or `None` when the
    /// current one suffices.
    ///
    /// Nothing about `self` changes; the old buffer stays valid until
    /// [`commit_growth`](Self::commit_growth). Callers checking allocation
    /// errors (error scopes) can drop the result instead of committing.
    pub fn prepare_growth(
        &self,
        device: &wgpu::Device,
        needed: usize,
    ) -> Option<PendingGrowth> {
        let capacity = grown_capacity(self.capacity, needed)?;
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&self.label),
            size: capacity as u64,
            usage: self.usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Some(PendingGrowth { buffer, capacity })
    }

    /// Swap in a successfully allocated larger buffer. The old allocation
    /// is destroyed and the live length reset.
    pub fn commit_growth(&mut self, pending: PendingGrowth) {
        let old = std::mem::replace(&mut self.buffer, pending.buffer);
        old.destroy();
        log::debug!(
            "{}: grew {} -> {} bytes",
            self.label,
            self.capacity,
            pending.capacity
        );
        self.capacity = pending.capacity;
        self.len = 0;
    }

    /// Overwrite the contents from offset 0. `data` must fit the current
    /// capacity; grow first otherwise.
    pub fn upload(&mut self, queue: &wgpu::Queue, data: &[u8]) {
        debug_assert!(data.len() <= self.capacity);
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, data);
        }
        self.len = data.len();
    }

    /// Free the GPU allocation now rather than when the handle drops.
    pub fn destroy(self) {
        self.buffer.destroy();
    }

    /// The slice holding live data.
    pub fn live_slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..self.len as u64)
    }

    /// Allocated bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Debug label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitting_writes_do_not_grow() {
        assert_eq!(grown_capacity(MIN_CAPACITY, 0), None);
        assert_eq!(grown_capacity(MIN_CAPACITY, MIN_CAPACITY), None);
        assert_eq!(grown_capacity(4096, 100), None);
    }

    #[test]
    fn growth_doubles_with_minimum_step() {
        assert_eq!(grown_capacity(64, 65), Some(64 + 1024));
        assert_eq!(grown_capacity(1088, 2000), Some(4000));
        let grown = grown_capacity(64, 28 * 10_000).unwrap_or_default();
        assert!(grown >= 28 * 10_000);
    }
}
