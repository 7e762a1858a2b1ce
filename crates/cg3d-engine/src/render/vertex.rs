use std::fmt;

use super::Shader;

/// One float attribute inside an interleaved vertex.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    /// Shader input slot (`@location(n)`).
    pub location: u32,
    /// Number of f32 components (1..=4).
    pub components: u32,
    /// Byte offset inside the vertex.
    pub offset: u64,
}

impl VertexAttribute {
    pub const fn float(location: u32, components: u32, offset: u64) -> Self {
        Self {
            location,
            components,
            offset,
        }
    }

    /// Bytes occupied by this attribute.
    pub const fn byte_len(self) -> u64 {
        self.components as u64 * std::mem::size_of::<f32>() as u64
    }

    /// Matching wgpu format; floats are never normalized.
    pub fn format(self) -> Option<wgpu::VertexFormat> {
        match self.components {
            1 => Some(wgpu::VertexFormat::Float32),
            2 => Some(wgpu::VertexFormat::Float32x2),
            3 => Some(wgpu::VertexFormat::Float32x3),
            4 => Some(wgpu::VertexFormat::Float32x4),
            _ => None,
        }
    }
}

/// Interleaved vertex layout: every attribute shares `stride`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttributeLayout<'a> {
    pub stride: u64,
    pub attributes: &'a [VertexAttribute],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    UnsupportedComponents { location: u32, components: u32 },
    Overflow { location: u32, end: u64, stride: u64 },
    DuplicateLocation(u32),
    Misaligned { location: u32, offset: u64 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::UnsupportedComponents { location, components } => {
                write!(f, "attribute {location}: {components} components is not supported")
            }
            LayoutError::Overflow { location, end, stride } => {
                write!(f, "attribute {location} ends at byte {end}, past stride {stride}")
            }
            LayoutError::DuplicateLocation(location) => {
                write!(f, "location {location} used by more than one attribute")
            }
            LayoutError::Misaligned { location, offset } => {
                write!(f, "attribute {location} offset {offset} is not 4-byte aligned")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

impl AttributeLayout<'_> {
    /// Checks every attribute fits inside the stride and uses a distinct location.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for (i, a) in self.attributes.iter().enumerate() {
            if a.format().is_none() {
                return Err(LayoutError::UnsupportedComponents {
                    location: a.location,
                    components: a.components,
                });
            }
            if a.offset % 4 != 0 {
                return Err(LayoutError::Misaligned { location: a.location, offset: a.offset });
            }
            let end = a.offset + a.byte_len();
            if end > self.stride {
                return Err(LayoutError::Overflow { location: a.location, end, stride: self.stride });
            }
            if self.attributes[..i].iter().any(|b| b.location == a.location) {
                return Err(LayoutError::DuplicateLocation(a.location));
            }
        }
        Ok(())
    }

    /// Validated wgpu attribute list.
    pub fn wgpu_attributes(&self) -> Result<Vec<wgpu::VertexAttribute>, LayoutError> {
        self.validate()?;
        Ok(self
            .attributes
            .iter()
            .filter_map(|a| {
                a.format().map(|format| wgpu::VertexAttribute {
                    format,
                    offset: a.offset,
                    shader_location: a.location,
                })
            })
            .collect())
    }
}

/// Everything needed to build a [`VertexArray`].
pub struct VertexArrayDescriptor<'a> {
    pub label: &'a str,
    pub shader: &'a Shader,
    pub layout: AttributeLayout<'a>,
    pub vertex_buffer: &'a wgpu::Buffer,
    /// Texture layouts for units 0, 1, ... in order.
    pub texture_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub color_format: wgpu::TextureFormat,
}

/// Vertex layout object: the pipeline built for one attribute layout plus the
/// vertex (and optionally index) buffer it reads from.
pub struct VertexArray {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<(wgpu::Buffer, wgpu::IndexFormat)>,
}

impl VertexArray {
    pub fn new(device: &wgpu::Device, desc: &VertexArrayDescriptor<'_>) -> Result<Self, LayoutError> {
        let attributes = desc.layout.wgpu_attributes()?;

        let mut bind_group_layouts: Vec<&wgpu::BindGroupLayout> =
            Vec::with_capacity(1 + desc.texture_layouts.len());
        bind_group_layouts.push(desc.shader.bind_group_layout());
        bind_group_layouts.extend_from_slice(desc.texture_layouts);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: desc.shader.module(),
                entry_point: Some(desc.shader.vertex_entry()),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: desc.layout.stride,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
            },

            fragment: Some(wgpu::FragmentState {
                module: desc.shader.module(),
                entry_point: Some(desc.shader.fragment_entry()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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
            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "vertex array '{}': {} attributes, stride {}",
            desc.label,
            attributes.len(),
            desc.layout.stride
        );

        Ok(Self {
            pipeline,
            vertex_buffer: desc.vertex_buffer.clone(),
            index_buffer: None,
        })
    }

    /// Records an index buffer so `bind` also binds it.
    pub fn set_index_buffer(&mut self, buffer: &wgpu::Buffer, format: wgpu::IndexFormat) {
        self.index_buffer = Some((buffer.clone(), format));
    }

    /// Binds the pipeline and the attached buffers.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        if let Some((ibo, format)) = &self.index_buffer {
            pass.set_index_buffer(ibo.slice(..), *format);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PCU: [VertexAttribute; 3] = [
        VertexAttribute::float(0, 3, 0),
        VertexAttribute::float(1, 3, 12),
        VertexAttribute::float(2, 2, 24),
    ];

    fn layout(stride: u64, attributes: &[VertexAttribute]) -> AttributeLayout<'_> {
        AttributeLayout { stride, attributes }
    }

    #[test]
    fn interleaved_position_color_uv_is_valid() {
        let attrs = layout(32, &PCU).wgpu_attributes().unwrap();
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(attrs[1].offset, 12);
        assert_eq!(attrs[2].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(attrs[2].shader_location, 2);
    }

    #[test]
    fn attribute_past_stride_is_rejected() {
        let err = layout(28, &PCU).validate().unwrap_err();
        assert_eq!(err, LayoutError::Overflow { location: 2, end: 32, stride: 28 });
    }

    #[test]
    fn duplicate_location_is_rejected() {
        let attrs = [VertexAttribute::float(0, 2, 0), VertexAttribute::float(0, 2, 8)];
        assert_eq!(layout(16, &attrs).validate().unwrap_err(), LayoutError::DuplicateLocation(0));
    }

    #[test]
    fn five_components_is_rejected() {
        let attrs = [VertexAttribute::float(0, 5, 0)];
        assert!(matches!(
            layout(20, &attrs).validate(),
            Err(LayoutError::UnsupportedComponents { components: 5, .. })
        ));
    }

    #[test]
    fn unaligned_offset_is_rejected() {
        let attrs = [VertexAttribute::float(0, 1, 2)];
        assert!(matches!(layout(8, &attrs).validate(), Err(LayoutError::Misaligned { .. })));
    }
}
