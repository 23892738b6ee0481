use crate::{Error, Result};

/// Sink that materializes canvas pixels on a physical panel.
///
/// A flush opens a session with [`begin_transfer`](OutputSurface::begin_transfer),
/// pushes raw RGB565 cells with [`write_block`](OutputSurface::write_block) and
/// closes it with [`end_transfer`](OutputSurface::end_transfer). Bus protocol,
/// pin assignment and panel command set are entirely the implementor's concern.
pub trait OutputSurface {
    type Error: std::error::Error;

    fn begin_transfer(&mut self) -> std::result::Result<(), Self::Error>;

    /// Push a `width × height` block of row-major cells with its top-left at `(x, y)`.
    fn write_block(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: &[u16],
    ) -> std::result::Result<(), Self::Error>;

    fn end_transfer(&mut self) -> std::result::Result<(), Self::Error>;
}

impl<S: OutputSurface + ?Sized> OutputSurface for &mut S {
    type Error = S::Error;

    fn begin_transfer(&mut self) -> std::result::Result<(), Self::Error> {
        (**self).begin_transfer()
    }

    fn write_block(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: &[u16],
    ) -> std::result::Result<(), Self::Error> {
        (**self).write_block(x, y, width, height, pixels)
    }

    fn end_transfer(&mut self) -> std::result::Result<(), Self::Error> {
        (**self).end_transfer()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("no transfer session is open")]
    NoSession,
    #[error("a transfer session is already open")]
    SessionActive,
    #[error("block at ({x}, {y}) sized {width}x{height} exceeds the panel")]
    BlockOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("expected {expected} pixels, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// A panel that lives in memory.
///
/// Useful for host-side previews and tests: it enforces the session
/// protocol and keeps a copy of everything pushed to it.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    width: u32,
    height: u32,
    pixels: Vec<u16>,
    in_session: bool,
    transfers: usize,
    blocks: usize,
}

impl MemorySurface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidSurfaceSize { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0u16; width as usize * height as usize],
            in_session: false,
            transfers: 0,
            blocks: 0,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    pub fn in_session(&self) -> bool {
        self.in_session
    }

    /// Number of sessions that were opened and closed.
    pub fn transfers(&self) -> usize {
        self.transfers
    }

    /// Number of blocks accepted over the surface's lifetime.
    pub fn blocks(&self) -> usize {
        self.blocks
    }
}

impl OutputSurface for MemorySurface {
    type Error = SurfaceError;

    fn begin_transfer(&mut self) -> std::result::Result<(), SurfaceError> {
        if self.in_session {
            log::warn!("begin_transfer called while a session is open");
            return Err(SurfaceError::SessionActive);
        }
        self.in_session = true;
        Ok(())
    }

    fn write_block(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        pixels: &[u16],
    ) -> std::result::Result<(), SurfaceError> {
        if !self.in_session {
            log::warn!("write_block called outside a session");
            return Err(SurfaceError::NoSession);
        }
        let fits_x = x.checked_add(width).map_or(false, |right| right <= self.width);
        let fits_y = y.checked_add(height).map_or(false, |bottom| bottom <= self.height);
        if !fits_x || !fits_y {
            return Err(SurfaceError::BlockOutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(SurfaceError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let row_len = width as usize;
        if row_len > 0 {
            for (row, src) in pixels.chunks_exact(row_len).enumerate() {
                let dst_start = (y as usize + row) * self.width as usize + x as usize;
                self.pixels[dst_start..dst_start + row_len].copy_from_slice(src);
            }
        }
        self.blocks += 1;
        Ok(())
    }

    fn end_transfer(&mut self) -> std::result::Result<(), SurfaceError> {
        if !self.in_session {
            log::warn!("end_transfer called outside a session");
            return Err(SurfaceError::NoSession);
        }
        self.in_session = false;
        self.transfers += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_panel() {
        assert!(matches!(
            MemorySurface::new(0, 4),
            Err(Error::InvalidSurfaceSize {
                width: 0,
                height: 4
            })
        ));
    }

    #[test]
    fn write_outside_session_is_refused() {
        let mut surface = MemorySurface::new(2, 2).unwrap();
        assert_eq!(
            surface.write_block(0, 0, 1, 1, &[7]),
            Err(SurfaceError::NoSession)
        );
        assert_eq!(surface.end_transfer(), Err(SurfaceError::NoSession));
    }

    #[test]
    fn nested_begin_is_refused() {
        let mut surface = MemorySurface::new(2, 2).unwrap();
        surface.begin_transfer().unwrap();
        assert_eq!(surface.begin_transfer(), Err(SurfaceError::SessionActive));
    }

    #[test]
    fn blocks_land_at_their_offset() {
        let mut surface = MemorySurface::new(4, 3).unwrap();
        surface.begin_transfer().unwrap();
        surface.write_block(1, 1, 2, 2, &[1, 2, 3, 4]).unwrap();
        surface.end_transfer().unwrap();

        assert_eq!(surface.pixel(1, 1), Some(1));
        assert_eq!(surface.pixel(2, 1), Some(2));
        assert_eq!(surface.pixel(1, 2), Some(3));
        assert_eq!(surface.pixel(2, 2), Some(4));
        assert_eq!(surface.pixel(0, 0), Some(0));
        assert_eq!(surface.pixel(4, 0), None);
        assert_eq!(surface.transfers(), 1);
        assert_eq!(surface.blocks(), 1);
    }

    #[test]
    fn oversized_or_short_blocks_are_refused() {
        let mut surface = MemorySurface::new(4, 4).unwrap();
        surface.begin_transfer().unwrap();
        assert_eq!(
            surface.write_block(3, 0, 2, 1, &[0, 0]),
            Err(SurfaceError::BlockOutOfBounds {
                x: 3,
                y: 0,
                width: 2,
                height: 1
            })
        );
        assert_eq!(
            surface.write_block(0, 0, 2, 2, &[0; 3]),
            Err(SurfaceError::LengthMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn borrowed_surface_forwards_calls() {
        fn push_one<S: OutputSurface>(mut surface: S) {
            surface.begin_transfer().unwrap();
            surface.write_block(0, 0, 1, 1, &[9]).unwrap();
            surface.end_transfer().unwrap();
        }

        let mut surface = MemorySurface::new(1, 1).unwrap();
        push_one(&mut surface);
        assert_eq!(surface.pixel(0, 0), Some(9));
        assert_eq!(surface.transfers(), 1);
    }
}
