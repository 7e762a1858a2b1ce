//! Hello Index: a textured quad drawn from 4 vertices and 6 indices, with
//! `time` and `mousePosition` uniforms animating the fragment shader.

use std::path::PathBuf;

use anyhow::Result;
use winit::dpi::LogicalSize;

use cg3d_engine::coords::{ColorRgba, Vec2, Viewport};
use cg3d_engine::core::{App, AppControl, FrameCtx, LoadCtx, WindowCtx};
use cg3d_engine::input::PointerMoveEvent;
use cg3d_engine::render::{
    create_index_buffer, create_vertex_buffer, find_resource, RenderCtx, RenderTarget, Shader,
    Texture, TextureUnit, UniformLocation, VertexArray, VertexArrayDescriptor,
};
use cg3d_engine::time::FrameTime;
use cg3d_engine::window::RuntimeConfig;

use super::frame_state::{FrameState, TIME_STEP};
use super::quad::{validate_indices, QUAD_INDICES, QUAD_LAYOUT, QUAD_VERTICES};
use crate::resources::{CHECKER_TEXTURE, HELLO_UNIFORM, SHADERS};

pub const TITLE: &str = "Hello Index!";

/// The HelloUniform shader samples its texture from unit 0.
const TEXTURE_UNIT: TextureUnit = TextureUnit::Texture0;

/// Side length in pixels of the fallback checkerboard.
const FALLBACK_TEXTURE_SIZE: u32 = 256;
const FALLBACK_TEXTURE_CELLS: u32 = 8;

/// Window settings for this chapter.
pub fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        title: TITLE.to_string(),
        initial_size: LogicalSize::new(800.0, 600.0),
        ..RuntimeConfig::default()
    }
}

#[derive(Debug, Clone)]
pub struct HelloIndexConfig {
    pub texture_path: PathBuf,
    pub clear_color: ColorRgba,
    pub time_step: f32,
}

impl Default for HelloIndexConfig {
    fn default() -> Self {
        Self {
            texture_path: PathBuf::from(CHECKER_TEXTURE),
            clear_color: ColorRgba::new(0.1, 0.1, 0.2, 1.0),
            time_step: TIME_STEP,
        }
    }
}

/// GPU objects created in `on_load` and released in `on_unload`.
struct QuadResources {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    vertex_array: VertexArray,
    shader: Shader,
    texture: Texture,
    time_location: Option<UniformLocation>,
    mouse_location: Option<UniformLocation>,
}

impl QuadResources {
    fn draw(&mut self, rctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, state: &FrameState) {
        let mut pass = target.begin_pass("hello index");

        self.texture.use_on(&mut pass, self.texture.unit());
        self.shader.use_program(&mut pass);

        if let Some(loc) = self.time_location {
            self.shader.set_f32(loc, state.time());
        }
        if let Some(loc) = self.mouse_location {
            self.shader.set_vec2(loc, state.mouse_position());
        }
        self.shader.flush(rctx.queue);

        self.vertex_array.bind(&mut pass);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    fn release(self) {
        let QuadResources {
            vertex_buffer,
            index_buffer,
            vertex_array,
            shader,
            texture,
            ..
        } = self;

        drop(vertex_array);
        vertex_buffer.destroy();
        index_buffer.destroy();
        shader.destroy();
        texture.destroy();
    }
}

pub struct HelloIndex {
    config: HelloIndexConfig,
    state: FrameState,
    gpu: Option<QuadResources>,
}

impl HelloIndex {
    pub fn new(config: HelloIndexConfig) -> Self {
        Self {
            config,
            state: FrameState::new(),
            gpu: None,
        }
    }

    pub fn state(&self) -> &FrameState {
        &self.state
    }

    /// True between a successful `on_load` and `on_unload`.
    pub fn is_loaded(&self) -> bool {
        self.gpu.is_some()
    }

    /// Advances animation time by one frame step.
    pub fn update(&mut self) {
        self.state.advance(self.config.time_step);
    }

    /// Records the cursor position (logical pixels) for the next frame.
    pub fn mouse_moved(&mut self, pos: Vec2, viewport: Viewport) {
        if !self.state.set_mouse(pos, viewport) {
            log::trace!("mouse move ignored: degenerate viewport {viewport:?}");
        }
    }

    fn load_texture(&self, ctx: &LoadCtx<'_, '_>) -> Result<Texture> {
        let path = &self.config.texture_path;
        match Texture::load_from_file(ctx.device(), ctx.queue(), path, TEXTURE_UNIT) {
            Ok(texture) => Ok(texture),
            Err(err) => {
                log::warn!("{err:#}; using a generated checkerboard");
                Texture::checkerboard(
                    ctx.device(),
                    ctx.queue(),
                    FALLBACK_TEXTURE_SIZE,
                    FALLBACK_TEXTURE_CELLS,
                    TEXTURE_UNIT,
                )
            }
        }
    }
}

fn resolve_uniform(shader: &Shader, name: &str) -> Option<UniformLocation> {
    let loc = shader.uniform_location(name);
    if loc.is_none() {
        log::warn!("shader '{}' has no uniform '{name}'; it will not be updated", shader.name());
    }
    loc
}

impl App for HelloIndex {
    fn on_load(&mut self, ctx: &mut LoadCtx<'_, '_>) -> Result<()> {
        validate_indices(&QUAD_INDICES, QUAD_VERTICES.len())?;

        let device = ctx.device();

        let vertex_buffer = create_vertex_buffer(device, "hello index vertices", &QUAD_VERTICES);

        let shader = Shader::new(device, find_resource(SHADERS, HELLO_UNIFORM)?)?;
        let texture = self.load_texture(ctx)?;

        let mut vertex_array = VertexArray::new(
            device,
            &VertexArrayDescriptor {
                label: "hello index",
                shader: &shader,
                layout: QUAD_LAYOUT,
                vertex_buffer: &vertex_buffer,
                texture_layouts: &[texture.bind_group_layout()],
                color_format: ctx.surface_format(),
            },
        )?;

        let index_buffer = create_index_buffer(device, "hello index indices", &QUAD_INDICES);
        vertex_array.set_index_buffer(&index_buffer, wgpu::IndexFormat::Uint32);

        let time_location = resolve_uniform(&shader, "time");
        let mouse_location = resolve_uniform(&shader, "mousePosition");

        let (w, h) = texture.size();
        log::info!(
            "loaded {} vertices, {} indices, texture {w}x{h}",
            QUAD_VERTICES.len(),
            QUAD_INDICES.len()
        );

        self.gpu = Some(QuadResources {
            vertex_buffer,
            index_buffer,
            index_count: QUAD_INDICES.len() as u32,
            vertex_array,
            shader,
            texture,
            time_location,
            mouse_location,
        });
        Ok(())
    }

    fn on_mouse_move(&mut self, window: &WindowCtx<'_>, event: PointerMoveEvent) {
        self.mouse_moved(Vec2::new(event.x, event.y), window.viewport());
    }

    fn on_update_frame(&mut self, _time: FrameTime) -> AppControl {
        self.update();
        AppControl::Continue
    }

    fn on_render_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(resources) = self.gpu.as_mut() else {
            return AppControl::Continue;
        };
        let state = self.state;

        ctx.render(self.config.clear_color, |rctx, target| {
            resources.draw(rctx, target, &state)
        })
    }

    fn on_unload(&mut self) {
        if let Some(resources) = self.gpu.take() {
            resources.release();
            log::debug!("hello index resources released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> HelloIndex {
        HelloIndex::new(HelloIndexConfig::default())
    }

    // ── config ────────────────────────────────────────────────────────────

    #[test]
    fn window_is_titled_and_800x600() {
        let cfg = runtime_config();
        assert_eq!(cfg.title, "Hello Index!");
        assert_eq!(cfg.initial_size, LogicalSize::new(800.0, 600.0));
    }

    #[test]
    fn default_clear_color_is_dark_blue() {
        let cfg = HelloIndexConfig::default();
        assert_eq!(cfg.clear_color, ColorRgba::new(0.1, 0.1, 0.2, 1.0));
        assert_eq!(cfg.texture_path, PathBuf::from(CHECKER_TEXTURE));
    }

    #[test]
    fn texture_unit_matches_shader_group() {
        let res = find_resource(SHADERS, HELLO_UNIFORM).unwrap();
        let group = format!("@group({}) @binding(0) var tex:", TEXTURE_UNIT.bind_group());
        assert!(res.wgsl.contains(&group), "shader does not sample {group}");
    }

    // ── frame loop ────────────────────────────────────────────────────────

    #[test]
    fn starts_unloaded() {
        assert!(!app().is_loaded());
    }

    #[test]
    fn hundred_updates_then_centered_mouse() {
        let mut app = app();
        for _ in 0..100 {
            app.update();
        }
        app.mouse_moved(Vec2::new(400.0, 300.0), Viewport::new(800.0, 600.0));

        assert!((app.state().time() - 1.0).abs() < 1e-4);
        assert_eq!(app.state().mouse_position(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn update_hook_advances_time() {
        let mut app = app();
        let ft = FrameTime {
            dt: 1.0 / 60.0,
            now: std::time::Instant::now(),
            frame_index: 0,
        };
        assert_eq!(app.on_update_frame(ft), AppControl::Continue);
        assert!((app.state().time() - TIME_STEP).abs() < 1e-6);
    }

    #[test]
    fn custom_time_step_is_used() {
        let mut app = HelloIndex::new(HelloIndexConfig {
            time_step: 0.5,
            ..HelloIndexConfig::default()
        });
        app.update();
        app.update();
        assert_eq!(app.state().time(), 1.0);
    }

    #[test]
    fn minimized_window_keeps_mouse() {
        let mut app = app();
        app.mouse_moved(Vec2::new(80.0, 60.0), Viewport::new(800.0, 600.0));
        app.mouse_moved(Vec2::new(5.0, 5.0), Viewport::new(0.0, 0.0));
        assert_eq!(app.state().mouse_position(), Vec2::new(0.1, 0.1));
    }

    #[test]
    fn unload_before_load_is_a_no_op() {
        let mut app = app();
        app.on_unload();
        app.on_unload();
        assert!(!app.is_loaded());
    }
}
