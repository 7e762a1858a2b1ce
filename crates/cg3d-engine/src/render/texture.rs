use std::path::Path;

use anyhow::{Context, Result};

/// Texture binding slot. Unit N is bound at bind group N + 1; group 0
/// belongs to the shader's uniform block.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum TextureUnit {
    #[default]
    Texture0,
    Texture1,
    Texture2,
}

impl TextureUnit {
    pub const fn index(self) -> u32 {
        match self {
            TextureUnit::Texture0 => 0,
            TextureUnit::Texture1 => 1,
            TextureUnit::Texture2 => 2,
        }
    }

    pub const fn bind_group(self) -> u32 {
        self.index() + 1
    }
}

/// A sampled 2D RGBA texture with its own bind group.
///
/// Group layout: `@binding(0)` texture_2d<f32>, `@binding(1)` sampler.
pub struct Texture {
    texture: wgpu::Texture,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    unit: TextureUnit,
    size: (u32, u32),
}

impl Texture {
    /// Decodes an image file and uploads it, flipped so that UV (0, 0) is the
    /// bottom-left corner of the picture.
    pub fn load_from_file(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        unit: TextureUnit,
    ) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("failed to load texture '{}'", path.display()))?
            .flipv()
            .to_rgba8();

        let (width, height) = image.dimensions();
        log::debug!("texture '{}' decoded: {width}x{height}", path.display());

        let label = path.display().to_string();
        Self::from_rgba8(device, queue, &label, width, height, image.as_raw(), unit)
    }

    /// Procedural two-tone checkerboard, `size`×`size` pixels with `cells` squares per side.
    pub fn checkerboard(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: u32,
        cells: u32,
        unit: TextureUnit,
    ) -> Result<Self> {
        let pixels = checkerboard_pixels(size, cells, [255, 255, 255, 255], [32, 32, 32, 255]);
        Self::from_rgba8(device, queue, "cg3d checkerboard", size, size, &pixels, unit)
    }

    /// Uploads tightly packed RGBA8 (sRGB) pixels.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
        unit: TextureUnit,
    ) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "texture '{label}' has zero size");
        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(
            pixels.len() == expected,
            "texture '{label}': expected {expected} bytes of RGBA8, got {}",
            pixels.len()
        );

        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Repeat + linear, the usual defaults for tutorial textures.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cg3d texture sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = Self::create_bind_group_layout(device);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cg3d texture bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Ok(Self {
            texture,
            bind_group_layout,
            bind_group,
            unit,
            size: (width, height),
        })
    }

    fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cg3d texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    pub fn unit(&self) -> TextureUnit {
        self.unit
    }

    /// Size in pixels as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Binds the texture on `unit`.
    ///
    /// The pipeline must have been built with this texture's layout at that
    /// unit's group.
    pub fn use_on(&self, pass: &mut wgpu::RenderPass<'_>, unit: TextureUnit) {
        pass.set_bind_group(unit.bind_group(), &self.bind_group, &[]);
    }

    pub fn destroy(self) {
        self.texture.destroy();
    }
}

/// RGBA8 pixels of a `size`×`size` checkerboard alternating `a` and `b`,
/// starting with `a` in the first cell.
pub fn checkerboard_pixels(size: u32, cells: u32, a: [u8; 4], b: [u8; 4]) -> Vec<u8> {
    let cell = (size / cells.max(1)).max(1);
    let mut out = Vec::with_capacity(size as usize * size as usize * 4);
    for y in 0..size {
        for x in 0..size {
            let even = ((x / cell) + (y / cell)) % 2 == 0;
            out.extend_from_slice(if even { &a } else { &b });
        }
    }
    out
}
