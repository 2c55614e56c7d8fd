/// Visual state of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// 0.0 is fully transparent, 1.0 fully opaque.
    pub opacity: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self { opacity: 1.0 }
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the opacity, clamped to `0.0..=1.0`.
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}
