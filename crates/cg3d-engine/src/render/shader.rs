use std::fmt;

use crate::coords::Vec2;

/// Type of a member in a shader's uniform block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    Float,
    Vec2,
    Vec3,
    Vec4,
}

impl UniformKind {
    /// Size in bytes.
    pub const fn size(self) -> u32 {
        match self {
            UniformKind::Float => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 => 16,
        }
    }

    /// Alignment in bytes inside a WGSL uniform struct.
    pub const fn align(self) -> u32 {
        match self {
            UniformKind::Float => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 | UniformKind::Vec4 => 16,
        }
    }
}

/// One member of a uniform block, in declaration order.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformDecl {
    pub name: &'static str,
    pub kind: UniformKind,
}

impl UniformDecl {
    pub const fn new(name: &'static str, kind: UniformKind) -> Self {
        Self { name, kind }
    }
}

/// A named shader resource: WGSL source plus the layout of its uniform block
/// (`@group(0) @binding(0)`).
///
/// `uniforms` must list the struct members in the same order as the WGSL.
#[derive(Debug, Copy, Clone)]
pub struct ShaderResource {
    pub name: &'static str,
    pub wgsl: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
    pub uniforms: &'static [UniformDecl],
}

/// Looks up a shader resource by name.
pub fn find_resource<'a>(
    library: &'a [ShaderResource],
    name: &str,
) -> Result<&'a ShaderResource, ShaderError> {
    library
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| ShaderError::UnknownResource(name.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    UnknownResource(String),
    DuplicateUniform(String),
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::UnknownResource(name) => write!(f, "no shader resource named '{name}'"),
            ShaderError::DuplicateUniform(name) => write!(f, "uniform '{name}' declared twice"),
        }
    }
}

impl std::error::Error for ShaderError {}

/// Resolved position of a uniform inside its block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformLocation {
    offset: u32,
    kind: UniformKind,
}

impl UniformLocation {
    /// Byte offset inside the uniform block.
    pub fn offset(self) -> u32 {
        self.offset
    }

    pub fn kind(self) -> UniformKind {
        self.kind
    }
}

/// CPU-side copy of a uniform block, packed with WGSL alignment rules.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    members: Vec<(&'static str, UniformLocation)>,
    data: Vec<u8>,
    dirty: bool,
}

impl UniformBlock {
    /// Uniform buffers are bound in 16-byte units.
    const BLOCK_ALIGN: u32 = 16;

    pub fn new(decls: &[UniformDecl]) -> Result<Self, ShaderError> {
        let mut members: Vec<(&'static str, UniformLocation)> = Vec::with_capacity(decls.len());
        let mut cursor = 0u32;

        for decl in decls {
            if members.iter().any(|(n, _)| *n == decl.name) {
                return Err(ShaderError::DuplicateUniform(decl.name.to_string()));
            }
            let offset = cursor.next_multiple_of(decl.kind.align());
            members.push((decl.name, UniformLocation { offset, kind: decl.kind }));
            cursor = offset + decl.kind.size();
        }

        // wgpu rejects zero-sized uniform buffers.
        let size = cursor.next_multiple_of(Self::BLOCK_ALIGN).max(Self::BLOCK_ALIGN);

        Ok(Self {
            members,
            data: vec![0; size as usize],
            dirty: true,
        })
    }

    pub fn location(&self, name: &str) -> Option<UniformLocation> {
        self.members
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, loc)| *loc)
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn set_f32(&mut self, loc: UniformLocation, v: f32) {
        self.write(loc, UniformKind::Float, bytemuck::bytes_of(&v));
    }

    pub fn set_vec2(&mut self, loc: UniformLocation, v: Vec2) {
        self.write(loc, UniformKind::Vec2, bytemuck::cast_slice(&v.to_array()));
    }

    /// Returns whether the block changed since the last call, clearing the flag.
    fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    fn write(&mut self, loc: UniformLocation, kind: UniformKind, bytes: &[u8]) {
        if loc.kind != kind {
            log::warn!("uniform at offset {} is {:?}, not {:?}; write ignored", loc.offset, loc.kind, kind);
            return;
        }
        let start = loc.offset as usize;
        let Some(dst) = self.data.get_mut(start..start + bytes.len()) else {
            log::warn!("uniform at offset {} is outside the block; write ignored", loc.offset);
            return;
        };
        if *dst != *bytes {
            dst.copy_from_slice(bytes);
            self.dirty = true;
        }
    }
}

/// A compiled shader module with its uniform buffer and bind group (group 0).
pub struct Shader {
    name: &'static str,
    module: wgpu::ShaderModule,
    vertex_entry: &'static str,
    fragment_entry: &'static str,

    block: UniformBlock,
    ubo: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl Shader {
    /// Compiles `resource` and allocates its uniform buffer.
    pub fn new(device: &wgpu::Device, resource: &ShaderResource) -> Result<Self, ShaderError> {
        let block = UniformBlock::new(resource.uniforms)?;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(resource.name),
            source: wgpu::ShaderSource::Wgsl(resource.wgsl.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cg3d uniform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(block.size()),
                },
                count: None,
            }],
        });

        let ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cg3d uniform ubo"),
            size: block.size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cg3d uniform bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        log::debug!("shader '{}' compiled, uniform block {} bytes", resource.name, block.size());

        Ok(Self {
            name: resource.name,
            module,
            vertex_entry: resource.vertex_entry,
            fragment_entry: resource.fragment_entry,
            block,
            ubo,
            bind_group_layout,
            bind_group,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    pub fn vertex_entry(&self) -> &'static str {
        self.vertex_entry
    }

    pub fn fragment_entry(&self) -> &'static str {
        self.fragment_entry
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Location of a uniform by name; `None` when the block has no such member.
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.block.location(name)
    }

    pub fn set_f32(&mut self, loc: UniformLocation, v: f32) {
        self.block.set_f32(loc, v);
    }

    pub fn set_vec2(&mut self, loc: UniformLocation, v: Vec2) {
        self.block.set_vec2(loc, v);
    }

    /// Makes this shader's uniform block active for the following draws.
    pub fn use_program(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.bind_group, &[]);
    }

    /// Uploads pending uniform values. The write lands before the next queue
    /// submission, so it may be issued while the pass is still recording.
    pub fn flush(&mut self, queue: &wgpu::Queue) {
        if self.block.take_dirty() {
            queue.write_buffer(&self.ubo, 0, self.block.bytes());
        }
    }

    /// Releases the uniform buffer.
    pub fn destroy(self) {
        self.ubo.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIME_MOUSE: [UniformDecl; 2] = [
        UniformDecl::new("time", UniformKind::Float),
        UniformDecl::new("mousePosition", UniformKind::Vec2),
    ];

    fn read_f32(block: &UniformBlock, offset: usize) -> f32 {
        f32::from_ne_bytes(block.bytes()[offset..offset + 4].try_into().unwrap())
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn vec2_after_float_is_aligned_to_eight() {
        let block = UniformBlock::new(&TIME_MOUSE).unwrap();
        assert_eq!(block.location("time").unwrap().offset(), 0);
        assert_eq!(block.location("mousePosition").unwrap().offset(), 8);
        assert_eq!(block.size(), 16);
    }

    #[test]
    fn vec3_is_aligned_to_sixteen() {
        let block = UniformBlock::new(&[
            UniformDecl::new("a", UniformKind::Float),
            UniformDecl::new("b", UniformKind::Vec3),
            UniformDecl::new("c", UniformKind::Float),
        ])
        .unwrap();
        assert_eq!(block.location("b").unwrap().offset(), 16);
        // vec3 leaves its last 4 bytes for a following scalar.
        assert_eq!(block.location("c").unwrap().offset(), 28);
        assert_eq!(block.size(), 32);
    }

    #[test]
    fn empty_block_still_has_minimum_size() {
        assert_eq!(UniformBlock::new(&[]).unwrap().size(), 16);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = UniformBlock::new(&[
            UniformDecl::new("time", UniformKind::Float),
            UniformDecl::new("time", UniformKind::Float),
        ])
        .unwrap_err();
        assert_eq!(err, ShaderError::DuplicateUniform("time".into()));
    }

    #[test]
    fn unknown_name_has_no_location() {
        let block = UniformBlock::new(&TIME_MOUSE).unwrap();
        assert!(block.location("resolution").is_none());
    }

    // ── writes ────────────────────────────────────────────────────────────

    #[test]
    fn writes_land_at_their_offsets() {
        let mut block = UniformBlock::new(&TIME_MOUSE).unwrap();
        let time = block.location("time").unwrap();
        let mouse = block.location("mousePosition").unwrap();

        block.set_f32(time, 1.5);
        block.set_vec2(mouse, Vec2::new(0.25, 0.75));

        assert_eq!(read_f32(&block, 0), 1.5);
        assert_eq!(read_f32(&block, 8), 0.25);
        assert_eq!(read_f32(&block, 12), 0.75);
    }

    #[test]
    fn mismatched_kind_is_ignored() {
        let mut block = UniformBlock::new(&TIME_MOUSE).unwrap();
        let time = block.location("time").unwrap();
        block.set_vec2(time, Vec2::new(9.0, 9.0));
        assert_eq!(read_f32(&block, 0), 0.0);
        assert_eq!(read_f32(&block, 4), 0.0);
    }

    #[test]
    fn dirty_flag_tracks_changes() {
        let mut block = UniformBlock::new(&TIME_MOUSE).unwrap();
        let time = block.location("time").unwrap();

        assert!(block.take_dirty(), "new blocks need an initial upload");
        assert!(!block.take_dirty());

        block.set_f32(time, 0.0);
        assert!(!block.take_dirty(), "same value does not dirty the block");

        block.set_f32(time, 0.01);
        assert!(block.take_dirty());
    }

    // ── library ───────────────────────────────────────────────────────────

    #[test]
    fn find_resource_by_name() {
        let lib = [ShaderResource {
            name: "Flat",
            wgsl: "",
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            uniforms: &[],
        }];
        assert_eq!(find_resource(&lib, "Flat").unwrap().name, "Flat");
        assert_eq!(
            find_resource(&lib, "Missing").unwrap_err(),
            ShaderError::UnknownResource("Missing".into())
        );
    }
}
