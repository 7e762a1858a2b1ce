//! Core engine-facing contracts.
//!
//! Defines the interface between the runtime (platform loop) and the
//! chapters: lifecycle hooks plus the contexts handed to them.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, LoadCtx, WindowCtx};
