//! Stroked-line rendering
//!
//! Lines are expanded on the CPU into two triangles each and drawn with a
//! single pipeline. A [`LineBatch`] collects one frame's vertices for one
//! render target and owns the GPU buffers they are uploaded into.

use crate::wgpu_utils::{binding_types, UniformBuffer, VertexArrayBuffer};

/// One corner of a tessellated line quad
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    /// Device-pixel position, origin top-left
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl LineVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewportUniform {
    pub size: [f32; 2],
    _pad: [f32; 2],
}

impl ViewportUniform {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: [width.max(1) as f32, height.max(1) as f32],
            _pad: [0.0; 2],
        }
    }
}

/// Vertices emitted per line
pub const VERTICES_PER_LINE: usize = 6;

/// Append the two triangles covering a `width`-wide stroke from `from` to `to`
///
/// Zero-length strokes become a square dot so single-point segments stay
/// visible.
pub fn push_line_quad(
    vertices: &mut Vec<LineVertex>,
    from: [f32; 2],
    to: [f32; 2],
    width: f32,
    color: [f32; 4],
) {
    let dx = to[0] - from[0];
    let dy = to[1] - from[1];
    let length = (dx * dx + dy * dy).sqrt();
    let half = width * 0.5;

    let (ux, uy) = if length > f32::EPSILON {
        (dx / length, dy / length)
    } else {
        (1.0, 0.0)
    };
    // Normal offset, plus end caps for dots so they get an area
    let (nx, ny) = (-uy * half, ux * half);
    let (cx, cy) = if length > f32::EPSILON {
        (0.0, 0.0)
    } else {
        (ux * half, uy * half)
    };

    let a = [from[0] + nx - cx, from[1] + ny - cy];
    let b = [from[0] - nx - cx, from[1] - ny - cy];
    let c = [to[0] + nx + cx, to[1] + ny + cy];
    let d = [to[0] - nx + cx, to[1] - ny + cy];

    for position in [a, b, c, c, b, d] {
        vertices.push(LineVertex { position, color });
    }
}

/// Pipeline plus the bind group layout for its viewport uniform
pub struct LinePipeline {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
}

impl LinePipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("line.wgsl").into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Line Viewport Layout"),
            entries: &[binding_types::entry(
                0,
                wgpu::ShaderStages::VERTEX,
                binding_types::uniform(),
            )],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[LineVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self { pipeline, layout }
    }
}

/// One render target's line vertices and their GPU storage
pub struct LineBatch {
    vertices: Vec<LineVertex>,
    buffer: VertexArrayBuffer<LineVertex>,
    viewport: UniformBuffer<ViewportUniform>,
    bind_group: wgpu::BindGroup,
}

impl LineBatch {
    pub fn new(device: &wgpu::Device, pipeline: &LinePipeline) -> Self {
        let viewport = UniformBuffer::<ViewportUniform>::new(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Line Viewport Bind Group"),
            layout: &pipeline.layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport.binding_resource(),
            }],
        });

        Self {
            vertices: Vec::new(),
            buffer: VertexArrayBuffer::new(device, 4096),
            viewport,
            bind_group,
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn push(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: [f32; 4]) {
        push_line_quad(&mut self.vertices, from, to, width, color);
    }

    pub fn line_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_LINE
    }

    /// Upload the collected vertices for a target of `size` device pixels
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, size: (u32, u32)) {
        self.viewport
            .update_content(queue, ViewportUniform::new(size.0, size.1));
        self.buffer.upload(device, queue, &self.vertices);
    }

    /// Record the draw of the last upload
    pub fn draw(&self, pipeline: &LinePipeline, pass: &mut wgpu::RenderPass<'_>) {
        if self.buffer.is_empty() {
            return;
        }
        pass.set_pipeline(&pipeline.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.buffer.slice());
        pass.draw(0..self.buffer.len() as u32, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_quad_spans_stroke_width() {
        let mut vertices = Vec::new();
        push_line_quad(&mut vertices, [0.0, 5.0], [10.0, 5.0], 2.0, [1.0; 4]);

        assert_eq!(vertices.len(), VERTICES_PER_LINE);
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        assert!(ys.iter().all(|y| (*y - 4.0).abs() < 1e-6 || (*y - 6.0).abs() < 1e-6));
        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        assert!(xs.iter().all(|x| *x == 0.0 || *x == 10.0));
    }

    #[test]
    fn test_zero_length_becomes_dot() {
        let mut vertices = Vec::new();
        push_line_quad(&mut vertices, [3.0, 3.0], [3.0, 3.0], 2.0, [0.5; 4]);

        let min_x = vertices.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = vertices.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let min_y = vertices.iter().map(|v| v.position[1]).fold(f32::MAX, f32::min);
        let max_y = vertices.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_eq!((min_x, max_x, min_y, max_y), (2.0, 4.0, 2.0, 4.0));
        assert!(vertices.iter().all(|v| v.color == [0.5; 4]));
    }

    #[test]
    fn test_uniform_layout_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<ViewportUniform>(), 16);
        assert_eq!(ViewportUniform::new(0, 10).size, [1.0, 10.0]);
    }
}
