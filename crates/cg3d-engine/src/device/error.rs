/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); the host stops the loop.
    Fatal,
}

impl SurfaceErrorAction {
    /// Returns `true` when the loop should keep running.
    #[inline]
    pub fn is_recoverable(self) -> bool {
        self != SurfaceErrorAction::Fatal
    }
}
