// src/wgpu_utils/uniform_buffer.rs
use std::marker::PhantomData;

fn short_type_name<T>() -> &'static str {
    let type_name = std::any::type_name::<T>();
    let pos = type_name.rfind(':').unwrap_or(0);
    if pos > 0 {
        &type_name[(pos + 1)..]
    } else {
        type_name
    }
}

/// Typed uniform buffer that skips redundant writes
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    previous_content: Vec<u8>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    /// Create a new uniform buffer
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", short_type_name::<Content>())),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: Vec::new(),
        }
    }

    /// Update buffer content (optimized to skip unnecessary writes)
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) {
        let new_content = bytemuck::bytes_of(&content);
        if self.previous_content == new_content {
            return;
        }
        queue.write_buffer(&self.buffer, 0, new_content);
        self.previous_content = new_content.to_vec();
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}

/// Vertex buffer that grows to fit whatever is uploaded
///
/// Capacity doubles on overflow and never shrinks, so a steady workload
/// stops reallocating after the first few frames.
pub struct VertexArrayBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    capacity: usize,
    len: usize,
}

impl<Content: bytemuck::Pod> VertexArrayBuffer<Content> {
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        VertexArrayBuffer {
            buffer: Self::allocate(device, capacity),
            content_type: PhantomData,
            capacity,
            len: 0,
        }
    }

    fn allocate(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("VertexArrayBuffer<{}>", short_type_name::<Content>())),
            size: (capacity * std::mem::size_of::<Content>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Replace the contents, reallocating when `data` does not fit
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[Content]) {
        if data.len() > self.capacity {
            self.capacity = data.len().next_power_of_two();
            self.buffer = Self::allocate(device, self.capacity);
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.len = data.len();
    }

    /// Slice covering the last upload
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        let bytes = (self.len * std::mem::size_of::<Content>()) as u64;
        self.buffer.slice(..bytes.max(1))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
