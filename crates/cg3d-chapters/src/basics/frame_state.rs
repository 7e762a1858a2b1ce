use cg3d_engine::coords::{Vec2, Viewport};

/// Per-frame value added to `time`.
pub const TIME_STEP: f32 = 0.01;

/// CPU-side values pushed to the shader every frame.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameState {
    time: f32,
    mouse_position: Vec2,
}

impl FrameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed animation time: frames ticked times the step, not wall time.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Last cursor position divided by the window size; top-left is (0, 0).
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    pub fn advance(&mut self, step: f32) {
        self.time += step;
    }

    /// Stores `pos` (logical pixels) normalized by `viewport`.
    ///
    /// Values are not clamped. A degenerate viewport leaves the previous
    /// position untouched and returns `false`.
    pub fn set_mouse(&mut self, pos: Vec2, viewport: Viewport) -> bool {
        match viewport.normalize(pos) {
            Some(n) => {
                self.mouse_position = n;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn window() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    // ── time ──────────────────────────────────────────────────────────────

    #[test]
    fn starts_at_zero() {
        let s = FrameState::new();
        assert_eq!(s.time(), 0.0);
        assert_eq!(s.mouse_position(), Vec2::zero());
    }

    #[test]
    fn one_hundred_frames_is_about_one() {
        let mut s = FrameState::new();
        for _ in 0..100 {
            s.advance(TIME_STEP);
        }
        assert!((s.time() - 1.0).abs() < EPS, "time = {}", s.time());
    }

    #[test]
    fn n_more_frames_add_n_steps_from_any_start() {
        let mut s = FrameState::new();
        for _ in 0..37 {
            s.advance(TIME_STEP);
        }
        let t0 = s.time();
        assert!((t0 - 0.37).abs() < EPS, "t0 = {t0}");

        for _ in 0..250 {
            s.advance(TIME_STEP);
        }
        let expected = t0 + TIME_STEP * 250.0;
        assert!((s.time() - expected).abs() < EPS, "time = {}, expected {expected}", s.time());
        assert!((s.time() - 2.87).abs() < EPS);
    }

    // ── mouse ─────────────────────────────────────────────────────────────

    #[test]
    fn window_center_is_half() {
        let mut s = FrameState::new();
        assert!(s.set_mouse(Vec2::new(400.0, 300.0), window()));
        assert_eq!(s.mouse_position(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn corners_map_to_unit_square() {
        let mut s = FrameState::new();
        s.set_mouse(Vec2::new(0.0, 0.0), window());
        assert_eq!(s.mouse_position(), Vec2::new(0.0, 0.0));
        s.set_mouse(Vec2::new(800.0, 600.0), window());
        assert_eq!(s.mouse_position(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn outside_the_window_is_not_clamped() {
        let mut s = FrameState::new();
        s.set_mouse(Vec2::new(-80.0, 900.0), window());
        let m = s.mouse_position();
        assert!((m.x + 0.1).abs() < EPS);
        assert!((m.y - 1.5).abs() < EPS);
    }

    #[test]
    fn zero_sized_window_keeps_previous_position() {
        let mut s = FrameState::new();
        s.set_mouse(Vec2::new(200.0, 150.0), window());
        assert!(!s.set_mouse(Vec2::new(10.0, 10.0), Viewport::new(0.0, 0.0)));
        assert_eq!(s.mouse_position(), Vec2::new(0.25, 0.25));
    }
}
