use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, Primitive, PrimitiveStyle, Rectangle};
use embedded_graphics::Drawable;

use crate::color::{from_raw, to_raw};
use crate::{CanvasOptions, Error, OutputSurface, OverlapTest, Rect, Result};

/// Off-screen RGB565 buffer whose drawing primitives are clipped to a
/// movable region before they touch a single cell.
///
/// The clip region uses inclusive corners and defaults to the canvas
/// extent `(0, 0)–(width, height)`. Cells outside `0..width × 0..height`
/// do not exist, so the buffer bounds are enforced on every write as well.
/// Nothing reaches the output surface until [`ClippedCanvas::flush`].
#[derive(Debug)]
pub struct ClippedCanvas<S: OutputSurface> {
    surface: S,
    width: u32,
    height: u32,
    pixels: Vec<u16>,
    clip_region: Rect,
    options: CanvasOptions,
}

impl<S: OutputSurface> ClippedCanvas<S> {
    pub fn new(width: u32, height: u32, surface: S) -> Result<Self> {
        Self::with_options(width, height, surface, CanvasOptions::default())
    }

    pub fn with_options(
        width: u32,
        height: u32,
        surface: S,
        options: CanvasOptions,
    ) -> Result<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(Error::InvalidCanvasSize { width, height });
        }
        log::debug!(
            "creating {}x{} canvas (overlap test {:?}, clamp clip region {})",
            width,
            height,
            options.overlap_test,
            options.clamp_clip_region
        );

        let pixels = vec![to_raw(options.initial_color); width as usize * height as usize];
        Ok(Self {
            surface,
            width,
            height,
            pixels,
            clip_region: Rect::from_coords(0, 0, width as i32, height as i32),
            options,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn options(&self) -> &CanvasOptions {
        &self.options
    }

    /// The default clip region, `(0, 0)–(width, height)`.
    pub fn extent(&self) -> Rect {
        Rect::from_coords(0, 0, self.width as i32, self.height as i32)
    }

    pub fn clip_region(&self) -> Rect {
        self.clip_region
    }

    pub fn set_clip_region(&mut self, region: Rect) {
        let mut clipped = region;
        if self.options.clamp_clip_region {
            clipped.clip_to(self.extent());
            if clipped != region {
                log::debug!("clip region {:?} clamped to {:?}", region, clipped);
            }
        }
        self.clip_region = clipped;
    }

    pub fn reset_clip_region(&mut self) {
        self.clip_region = self.extent();
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb565) {
        if !self.clip_region.contains(x, y) {
            return;
        }
        if let Some(index) = self.index_of(x, y) {
            self.pixels[index] = to_raw(color);
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        self.index_of(x, y).map(|index| from_raw(self.pixels[index]))
    }

    /// Draws `length` pixels to the right of `(x, y)`, starting there.
    pub fn draw_horizontal_run(&mut self, x: i32, y: i32, length: i32, color: Rgb565) {
        let clip = self.clip_region;
        if y < clip.top_left.y || clip.bottom_right.y < y {
            return;
        }
        let Some((first, last)) = clip_span(x, length, clip.top_left.x, clip.bottom_right.x)
        else {
            return;
        };
        self.write_fill(Rect::from_coords(first, y, last, y), to_raw(color));
    }

    /// Draws `length` pixels downward from `(x, y)`, starting there.
    pub fn draw_vertical_run(&mut self, x: i32, y: i32, length: i32, color: Rgb565) {
        let clip = self.clip_region;
        if x < clip.top_left.x || clip.bottom_right.x < x {
            return;
        }
        let Some((first, last)) = clip_span(y, length, clip.top_left.y, clip.bottom_right.y)
        else {
            return;
        };
        self.write_fill(Rect::from_coords(x, first, x, last), to_raw(color));
    }

    /// Fills columns `x..x + width` and rows `y..y + height`, clipped.
    pub fn fill_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb565) {
        if width <= 0 || height <= 0 {
            return;
        }
        let area = Rect::from_coords(
            x,
            y,
            x.saturating_add(width - 1),
            y.saturating_add(height - 1),
        );
        let clip = self.clip_region;
        let touches = match self.options.overlap_test {
            OverlapTest::Exact => clip.intersects(area),
            // legacy firmware sampled the corners one past the last cell
            OverlapTest::CornerSample => clip.overlaps(Rect::from_coords(
                x,
                y,
                x.saturating_add(width),
                y.saturating_add(height),
            )),
        };
        if !touches {
            return;
        }

        let raw = to_raw(color);
        if clip.contains_rect(area) {
            self.write_fill(area, raw);
            return;
        }
        if let Some(visible) = area.intersection(clip) {
            self.write_fill(visible, raw);
        }
    }

    /// Paints every cell of the buffer, ignoring the clip region.
    pub fn fill_screen(&mut self, color: Rgb565) {
        self.pixels.fill(to_raw(color));
    }

    /// Outline of the rectangle that [`fill_rectangle`](Self::fill_rectangle)
    /// would fill, drawn as four clipped runs.
    pub fn draw_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb565) {
        if width <= 0 || height <= 0 {
            return;
        }
        let right = x.saturating_add(width - 1);
        let bottom = y.saturating_add(height - 1);
        self.draw_horizontal_run(x, y, width, color);
        self.draw_horizontal_run(x, bottom, width, color);
        self.draw_vertical_run(x, y, height, color);
        self.draw_vertical_run(right, y, height, color);
    }

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) {
        Line::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(self)
            .ok();
    }

    /// Filled disc of the given radius around `(cx, cy)`, drawn as one
    /// horizontal run per visible row.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb565) {
        if radius < 0 {
            return;
        }
        let Some(visible) = self.clip_region.intersection(self.buffer_bounds()) else {
            return;
        };
        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));
        let top = (cy - r).max(i64::from(visible.top_left.y));
        let bottom = (cy + r).min(i64::from(visible.bottom_right.y));
        let left = i64::from(visible.top_left.x);
        let right = i64::from(visible.bottom_right.x);

        for y in top..=bottom {
            let dy = y - cy;
            let half = isqrt(r * r - dy * dy);
            let x0 = (cx - half).max(left);
            let x1 = (cx + half).min(right);
            if x1 < x0 {
                continue;
            }
            self.draw_horizontal_run(x0 as i32, y as i32, (x1 - x0 + 1) as i32, color);
        }
    }

    /// Sends the whole buffer to the output surface in one session.
    ///
    /// The session is closed even when the block write fails; the first
    /// error is returned.
    pub fn flush(&mut self) -> std::result::Result<(), S::Error> {
        log::trace!("flushing {}x{} buffer", self.width, self.height);
        self.surface.begin_transfer()?;
        let written = self
            .surface
            .write_block(0, 0, self.width, self.height, &self.pixels);
        let ended = self.surface.end_transfer();
        written.and(ended)
    }

    /// Raw RGB565 cells, row-major.
    pub fn buffer(&self) -> &[u16] {
        &self.pixels
    }

    /// The buffer as native-endian bytes, two per cell.
    pub fn buffer_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn buffer_bounds(&self) -> Rect {
        Rect::from_coords(0, 0, self.width as i32 - 1, self.height as i32 - 1)
    }

    // Last stop before the cells; `area` is inclusive and may be empty.
    fn write_fill(&mut self, area: Rect, raw: u16) {
        let Some(area) = area.intersection(self.buffer_bounds()) else {
            return;
        };
        let stride = self.width as usize;
        let x0 = area.top_left.x as usize;
        let x1 = area.bottom_right.x as usize;
        for y in area.top_left.y as usize..=area.bottom_right.y as usize {
            let row = y * stride;
            self.pixels[row + x0..=row + x1].fill(raw);
        }
    }
}

/// Clips the run `start .. start + length` to the inclusive interval
/// `lo..=hi`, returning its first and last cell.
fn clip_span(start: i32, length: i32, lo: i32, hi: i32) -> Option<(i32, i32)> {
    if length <= 0 {
        return None;
    }
    let mut first = i64::from(start);
    let last = first + i64::from(length) - 1;
    let (lo, hi) = (i64::from(lo), i64::from(hi));

    if first < lo {
        if last < lo {
            return None;
        }
        first = lo;
    }
    let last = if hi < last {
        if hi < first {
            return None;
        }
        hi
    } else {
        last
    };
    Some((first as i32, last as i32))
}

fn isqrt(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    let mut root = (n as f64).sqrt() as i64;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

impl<S: OutputSurface> OriginDimensions for ClippedCanvas<S> {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl<S: OutputSurface> DrawTarget for ClippedCanvas<S> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> core::result::Result<(), Self::Error> {
        let width = i32::try_from(area.size.width).unwrap_or(i32::MAX);
        let height = i32::try_from(area.size.height).unwrap_or(i32::MAX);
        self.fill_rectangle(area.top_left.x, area.top_left.y, width, height, color);
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> core::result::Result<(), Self::Error> {
        self.fill_screen(color);
        Ok(())
    }
}
