//! Clipped off-screen drawing for small pixel displays.
//!
//! A [`ClippedCanvas`] owns an RGB565 buffer the size of the panel and an
//! active clip [`Rect`]. Points, runs and filled rectangles are trimmed to
//! the clip region before they reach the buffer, and [`ClippedCanvas::flush`]
//! pushes the whole buffer to an [`OutputSurface`] in a single session.

mod bounce;
mod canvas;
pub mod color;
mod options;
mod rect;
mod surface;

pub use bounce::{BounceState, Edge};
pub use canvas::ClippedCanvas;
pub use options::{CanvasOptions, OverlapTest};
pub use rect::Rect;
pub use surface::{MemorySurface, OutputSurface, SurfaceError};

pub use embedded_graphics::pixelcolor::Rgb565;
pub use embedded_graphics::prelude::Point;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvasSize { width: u32, height: u32 },
    #[error("invalid surface size {width}x{height}")]
    InvalidSurfaceSize { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
