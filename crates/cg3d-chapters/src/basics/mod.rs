//! Basics: first steps with buffers, shaders and textures.

pub mod frame_state;
pub mod hello_index;
pub mod quad;
