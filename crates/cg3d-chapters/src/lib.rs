//! cg3d tutorial chapters.
//!
//! Each chapter is an `App` driven by the engine runtime. Shader sources and
//! asset paths live in `resources`.

pub mod basics;
pub mod cli;
pub mod resources;
