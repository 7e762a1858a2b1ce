use cg3d_engine::render::{ShaderResource, UniformDecl, UniformKind};

/// Name of the shader used by the uniform chapters.
pub const HELLO_UNIFORM: &str = "HelloUniform";

/// Default chapter texture, relative to the working directory.
pub const CHECKER_TEXTURE: &str = "Resources/Texture/xadrez.png";

/// Every shader the chapters can load by name.
pub const SHADERS: &[ShaderResource] = &[ShaderResource {
    name: HELLO_UNIFORM,
    wgsl: include_str!("../shaders/hello_uniform.wgsl"),
    vertex_entry: "vs_main",
    fragment_entry: "fs_main",
    uniforms: &[
        UniformDecl::new("time", UniformKind::Float),
        UniformDecl::new("mousePosition", UniformKind::Vec2),
    ],
}];
