use embedded_graphics::pixelcolor::Rgb565;

use crate::color::BLACK;

/// How `fill_rectangle` decides whether a rectangle touches the clip region.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum OverlapTest {
    /// Interval test on both axes; never misses a real overlap.
    #[default]
    Exact,
    /// Corner sampling via [`Rect::overlaps`](crate::Rect::overlaps) on
    /// `(x, y)–(x + width, y + height)`. Reproduces the legacy reject
    /// decision, including fills that cross the clip region without a
    /// sampled corner inside and are therefore dropped. Accepted fills are
    /// still written exactly as in `Exact` mode.
    CornerSample,
}

/// Options for [`ClippedCanvas`](crate::ClippedCanvas).
#[derive(Debug, Copy, Clone)]
pub struct CanvasOptions {
    pub overlap_test: OverlapTest,
    /// Clip every region handed to `set_clip_region` to the canvas extent.
    pub clamp_clip_region: bool,
    /// Color the off-screen buffer starts out with.
    pub initial_color: Rgb565,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            overlap_test: OverlapTest::Exact,
            clamp_clip_region: true,
            initial_color: BLACK,
        }
    }
}

impl CanvasOptions {
    pub fn with_overlap_test(mut self, overlap_test: OverlapTest) -> Self {
        self.overlap_test = overlap_test;
        self
    }

    pub fn with_clamp_clip_region(mut self, clamp_clip_region: bool) -> Self {
        self.clamp_clip_region = clamp_clip_region;
        self
    }

    pub fn with_initial_color(mut self, initial_color: Rgb565) -> Self {
        self.initial_color = initial_color;
        self
    }
}
