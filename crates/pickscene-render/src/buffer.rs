//! GPU buffer management.

use wgpu::util::DeviceExt;

/// Creates a uniform buffer from data.
pub fn create_uniform_buffer<T: bytemuck::Pod>(
    device: &wgpu::Device,
    data: &T,
    label: Option<&str>,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label,
        contents: bytemuck::bytes_of(data),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// Updates a buffer with new data.
pub fn update_buffer<T: bytemuck::Pod>(queue: &wgpu::Queue, buffer: &wgpu::Buffer, data: &[T]) {
    queue.write_buffer(buffer, 0, bytemuck::cast_slice(data));
}

/// Smallest allocation a [`GrowableBuffer`] makes.
const MIN_CAPACITY: usize = 64;

/// Next capacity for `needed` bytes when `current` is too small.
///
/// Doubles the request and keeps the result 4-byte aligned for `write_buffer`.
pub(crate) fn grown_capacity(current: usize, needed: usize) -> usize {
    let grown = (needed * 2).max(current + MIN_CAPACITY);
    grown.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT as usize)
}

/// A GPU buffer that grows when written data exceeds its capacity.
///
/// Never shrinks.
pub struct GrowableBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: usize,
    usage: wgpu::BufferUsages,
    label: String,
}

impl GrowableBuffer {
    /// Buffer with the given initial byte capacity.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        initial_capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = initial_capacity
            .max(MIN_CAPACITY)
            .next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT as usize);

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
            label: label.to_string(),
        }
    }

    /// Writes `data` from offset 0, reallocating first if it does not fit.
    ///
    /// Returns `true` if the buffer was reallocated.
    pub fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let needed = bytes.len();

        let reallocated = if needed > self.capacity {
            let new_capacity = grown_capacity(self.capacity, needed);
            log::debug!(
                "growing {} from {} to {new_capacity} bytes",
                self.label,
                self.capacity
            );

            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&self.label),
                size: new_capacity as u64,
                usage: self.usage | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            self.capacity = new_capacity;
            true
        } else {
            false
        };

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = needed;

        reallocated
    }

    /// Slice covering the bytes written by the last [`Self::write`].
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..self.len as u64)
    }

    /// Bytes written by the last [`Self::write`].
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_doubles_request() {
        assert_eq!(grown_capacity(64, 100), 200);
        assert_eq!(grown_capacity(1024, 1030), 2060);
    }

    #[test]
    fn test_growth_is_aligned() {
        for needed in [65, 66, 67, 1001] {
            let capacity = grown_capacity(64, needed);
            assert_eq!(capacity % 4, 0);
            assert!(capacity >= needed);
        }
    }

    #[test]
    fn test_growth_always_increases() {
        assert!(grown_capacity(4096, 10) > 4096);
    }
}
