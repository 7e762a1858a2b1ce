use super::Vec2;

/// Window size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Maps a point in window space to `[0, 1]` per axis by dividing by the size.
    ///
    /// Points outside the window map outside `[0, 1]`; nothing is clamped.
    /// Returns `None` for a degenerate (e.g. minimized) viewport.
    #[inline]
    pub fn normalize(self, p: Vec2) -> Option<Vec2> {
        if !self.is_valid() {
            return None;
        }
        Some(Vec2::new(p.x / self.width, p.y / self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_maps_to_half() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.normalize(Vec2::new(400.0, 300.0)), Some(Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn outside_points_are_not_clamped() {
        let vp = Viewport::new(100.0, 50.0);
        assert_eq!(vp.normalize(Vec2::new(-10.0, 75.0)), Some(Vec2::new(-0.1, 1.5)));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(!Viewport::new(0.0, 600.0).is_valid());
        assert_eq!(Viewport::new(800.0, 0.0).normalize(Vec2::new(1.0, 1.0)), None);
    }
}
