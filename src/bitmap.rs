//! Off-screen 1-bit bitmaps with an opacity mask.
//!
//! A [`Bitmap`] is what the display host would hand out from its bitmap
//! allocator. Instead of pushing it as a drawing context, callers draw into
//! it directly: it implements [`DrawTarget`] for text and primitives and
//! exposes the same `fill_rect`/`set_pixel` calls as the screen.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{OriginDimensions, Point, Size};
use embedded_graphics::primitives::{PointsIter, Rectangle};
use embedded_graphics::Pixel;

use crate::color::{is_white, LcdColor, Paint};

/// Packed 1-bit bitmap with a per-pixel opacity mask.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
    mask: Vec<u8>,
}

impl Bitmap {
    /// Allocate a bitmap filled with `background`.
    ///
    /// A [`LcdColor::Clear`] background yields a fully transparent bitmap.
    #[must_use]
    pub fn new(size: Size, background: LcdColor) -> Self {
        let stride = size.width.div_ceil(8) as usize;
        let len = stride * size.height as usize;
        let mut bitmap = Self {
            width: size.width,
            height: size.height,
            stride,
            data: vec![0; len],
            mask: vec![0; len],
        };
        bitmap.fill_rect(bitmap.bounds(), background);
        bitmap
    }

    /// Area covered by this bitmap with its top-left corner at the origin.
    #[must_use]
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), self.size())
    }

    /// Read a pixel.
    ///
    /// Returns `None` for transparent or out-of-range pixels, otherwise
    /// `Some(white)`.
    #[must_use]
    pub fn pixel(&self, p: Point) -> Option<bool> {
        let (index, bit) = self.locate(p)?;
        if self.mask[index] & bit == 0 {
            return None;
        }
        Some(self.data[index] & bit != 0)
    }

    /// Paint one pixel.
    pub fn set_pixel(&mut self, p: Point, color: LcdColor) {
        let Some((index, bit)) = self.locate(p) else {
            return;
        };
        match color.paint_at(p) {
            Paint::Set(white) => {
                self.mask[index] |= bit;
                if white {
                    self.data[index] |= bit;
                } else {
                    self.data[index] &= !bit;
                }
            }
            Paint::Invert => {
                if self.mask[index] & bit != 0 {
                    self.data[index] ^= bit;
                }
            }
            Paint::Skip => {}
        }
    }

    /// Paint every pixel of `area` that lies inside the bitmap.
    pub fn fill_rect(&mut self, area: Rectangle, color: LcdColor) {
        let area = area.intersection(&self.bounds());
        for p in area.points() {
            self.set_pixel(p, color);
        }
    }

    fn locate(&self, p: Point) -> Option<(usize, u8)> {
        if p.x < 0 || p.y < 0 {
            return None;
        }
        let (x, y) = (p.x as u32, p.y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.stride + (x / 8) as usize;
        Some((index, 0x80u8 >> (x % 8)))
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Bitmap {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            let color = if is_white(color) {
                LcdColor::White
            } else {
                LcdColor::Black
            };
            self.set_pixel(p, color);
        }
        Ok(())
    }
}

impl core::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Bitmap {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Bitmap {}x{} stride: {}", self.width, self.height, self.stride);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::format;

    use super::*;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    #[test]
    fn test_clear_bitmap_is_transparent() {
        let bitmap = Bitmap::new(Size::new(9, 3), LcdColor::Clear);
        for p in bitmap.bounds().points() {
            assert_eq!(bitmap.pixel(p), None);
        }
    }

    #[test]
    fn test_solid_backgrounds() {
        let white = Bitmap::new(Size::new(4, 4), LcdColor::White);
        let black = Bitmap::new(Size::new(4, 4), LcdColor::Black);
        assert_eq!(white.pixel(Point::new(3, 3)), Some(true));
        assert_eq!(black.pixel(Point::new(0, 0)), Some(false));
    }

    #[test]
    fn test_out_of_range_pixels() {
        let mut bitmap = Bitmap::new(Size::new(4, 4), LcdColor::White);
        bitmap.set_pixel(Point::new(-1, 0), LcdColor::Black);
        bitmap.set_pixel(Point::new(4, 0), LcdColor::Black);
        assert_eq!(bitmap.pixel(Point::new(-1, 0)), None);
        assert_eq!(bitmap.pixel(Point::new(0, 4)), None);
        for p in bitmap.bounds().points() {
            assert_eq!(bitmap.pixel(p), Some(true));
        }
    }

    #[test]
    fn test_xor_only_touches_opaque_pixels() {
        let mut bitmap = Bitmap::new(Size::new(2, 1), LcdColor::Clear);
        bitmap.set_pixel(Point::new(0, 0), LcdColor::White);
        bitmap.fill_rect(bitmap.bounds(), LcdColor::Xor);
        assert_eq!(bitmap.pixel(Point::new(0, 0)), Some(false));
        assert_eq!(bitmap.pixel(Point::new(1, 0)), None);
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut bitmap = Bitmap::new(Size::new(8, 8), LcdColor::White);
        bitmap.fill_rect(
            Rectangle::new(Point::new(6, 6), Size::new(10, 10)),
            LcdColor::Black,
        );
        assert_eq!(bitmap.pixel(Point::new(7, 7)), Some(false));
        assert_eq!(bitmap.pixel(Point::new(5, 5)), Some(true));
    }

    #[test]
    fn test_draw_target_primitives() {
        let mut bitmap = Bitmap::new(Size::new(16, 16), LcdColor::Clear);
        Rectangle::new(Point::new(2, 2), Size::new(4, 4))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut bitmap)
            .unwrap();
        assert_eq!(bitmap.pixel(Point::new(3, 3)), Some(false));
        assert_eq!(bitmap.pixel(Point::new(8, 8)), None);
    }

    #[test]
    fn test_debug_output() {
        let bitmap = Bitmap::new(Size::new(10, 2), LcdColor::Clear);
        let debug = format!("{:?}", bitmap);
        assert!(debug.contains("width: 10"));
        assert!(debug.contains("stride: 2"));
    }
}
