//! Frame timing.
//!
//! One `FrameClock` per window; call `tick()` once per frame to obtain the
//! `FrameTime` handed to the update hook.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
