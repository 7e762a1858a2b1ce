//! GPU rendering helpers used by the chapters.
//!
//! - `Shader`: a named WGSL resource plus its uniform block
//! - `Texture`: an image bound to a texture unit
//! - `VertexArray`: vertex layout + pipeline + attached buffers
//!
//! Bind group convention: group 0 is the shader's uniform block, texture
//! unit N is bound at group N + 1.

mod buffer;
mod ctx;
mod shader;
mod texture;
mod vertex;

pub use buffer::{create_index_buffer, create_vertex_buffer};
pub use ctx::{RenderCtx, RenderTarget};
pub use shader::{
    find_resource, Shader, ShaderError, ShaderResource, UniformBlock, UniformDecl, UniformKind,
    UniformLocation,
};
pub use texture::{checkerboard_pixels, Texture, TextureUnit};
pub use vertex::{AttributeLayout, LayoutError, VertexArray, VertexArrayDescriptor, VertexAttribute};
