use anyhow::Result;
use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::input::PointerMoveEvent;
use crate::time::FrameTime;

use super::ctx::{FrameCtx, LoadCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Lifecycle hooks driven by the runtime, all on the event-loop thread.
///
/// Order: `on_load` once, then per frame `on_update_frame` followed by
/// `on_render_frame`, with `on_mouse_move` / `on_window_event` in between as
/// events arrive, and finally `on_unload` once.
pub trait App {
    /// Called once after the window and GPU exist, before the first frame.
    /// An error aborts the runtime.
    fn on_load(&mut self, ctx: &mut LoadCtx<'_, '_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called for every window event, after the runtime updated input state.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called when the cursor moves inside the window (logical pixels).
    fn on_mouse_move(&mut self, window: &WindowCtx<'_>, event: PointerMoveEvent) {
        let _ = (window, event);
    }

    /// Called once per frame tick, before rendering.
    fn on_update_frame(&mut self, time: FrameTime) -> AppControl {
        let _ = time;
        AppControl::Continue
    }

    /// Called once per frame tick, after `on_update_frame`.
    fn on_render_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once before the window and GPU are torn down.
    fn on_unload(&mut self) {}
}
