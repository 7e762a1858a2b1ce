use bytemuck::Pod;
use wgpu::util::DeviceExt;

/// Allocates a vertex buffer initialised with `data`.
pub fn create_vertex_buffer<T: Pod>(device: &wgpu::Device, label: &str, data: &[T]) -> wgpu::Buffer {
    log::debug!("{label}: {} bytes of vertex data", std::mem::size_of_val(data));
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

/// Allocates a 32-bit index buffer initialised with `indices`.
pub fn create_index_buffer(device: &wgpu::Device, label: &str, indices: &[u32]) -> wgpu::Buffer {
    log::debug!("{label}: {} indices", indices.len());
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX,
    })
}
