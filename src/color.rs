use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{IntoStorage, RgbColor};

pub const BLACK: Rgb565 = Rgb565::BLACK;
pub const WHITE: Rgb565 = Rgb565::WHITE;
pub const RED: Rgb565 = Rgb565::RED;
pub const GREEN: Rgb565 = Rgb565::GREEN;
pub const BLUE: Rgb565 = Rgb565::BLUE;
pub const CYAN: Rgb565 = Rgb565::CYAN;
pub const MAGENTA: Rgb565 = Rgb565::MAGENTA;
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

/// Pack 8-bit channels into RGB565, dropping the low bits of each channel.
pub fn color565(r: u8, g: u8, b: u8) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

pub fn to_raw(color: Rgb565) -> u16 {
    color.into_storage()
}

pub fn from_raw(raw: u16) -> Rgb565 {
    Rgb565::from(RawU16::new(raw))
}
