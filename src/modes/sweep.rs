//! Sweeping audit strip for the partial refresh window.
//!
//! An inverted vertical strip crawls across the refresh window one column
//! per frame. Rows inside the window show it moving; rows outside it are not
//! re-sent, so on the panel they keep whatever strip position they last saw.
//! After a full refresh the strip starts over at zero width and widens by a
//! column per frame until it covers half the screen.

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::status::BAND_HEIGHT;
use crate::{Graphics, LcdColor, LCD_COLUMNS};

/// Widest the strip gets.
pub const MAX_SWEEP_WIDTH: i32 = LCD_COLUMNS / 2;

/// Inverted strip state: first column and width, wrapping at the screen edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepStrip {
    x: i32,
    width: i32,
}

impl SweepStrip {
    /// Zero-width strip at column 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { x: 0, width: 0 }
    }

    /// Trailing (leftmost) column.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Current width in columns.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Forget the strip after the screen was repainted. The next strip grows
    /// from where the old one's leading edge was.
    pub fn restart(&mut self) {
        self.x = (self.x + self.width) % LCD_COLUMNS;
        self.width = 0;
    }

    /// Move the strip one column over rows `first..=last`.
    ///
    /// While narrower than [`MAX_SWEEP_WIDTH`] the strip only grows;
    /// after that the trailing column is restored and the strip shifts right.
    /// Either way the new leading column is inverted.
    pub fn advance(&mut self, gfx: &mut dyn Graphics, first: i32, last: i32) {
        let height = (last - first + 1).max(0) as u32;
        if self.width < MAX_SWEEP_WIDTH {
            self.width += 1;
        } else {
            invert_column(gfx, self.x, first, height);
            self.x = (self.x + 1) % LCD_COLUMNS;
        }
        invert_column(gfx, (self.x + self.width - 1) % LCD_COLUMNS, first, height);
    }

    /// Re-invert the strip across a text band that was just erased and
    /// redrawn, including the part that wrapped past the right edge.
    pub fn patch(&self, gfx: &mut dyn Graphics, top: i32) {
        gfx.fill_rect(
            Rectangle::new(Point::new(self.x, top), Size::new(self.width as u32, BAND_HEIGHT)),
            LcdColor::Xor,
        );
        let residue = self.x + self.width - LCD_COLUMNS;
        if residue > 0 {
            gfx.fill_rect(
                Rectangle::new(Point::new(0, top), Size::new(residue as u32, BAND_HEIGHT)),
                LcdColor::Xor,
            );
        }
    }
}

fn invert_column(gfx: &mut dyn Graphics, x: i32, top: i32, height: u32) {
    gfx.fill_rect(Rectangle::new(Point::new(x, top), Size::new(1, height)), LcdColor::Xor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LcdFrameBuffer;
    use embedded_graphics::prelude::Dimensions;

    fn column(x: i32) -> Rectangle {
        Rectangle::new(Point::new(x, 0), Size::new(1, 240))
    }

    #[test]
    fn test_grows_to_half_width_then_slides() {
        let mut fb = LcdFrameBuffer::new();
        let mut strip = SweepStrip::new();
        for expected in 1..=MAX_SWEEP_WIDTH {
            strip.advance(&mut fb, 0, 239);
            assert_eq!(strip.width(), expected);
            assert_eq!(strip.x(), 0);
        }
        strip.advance(&mut fb, 0, 239);
        assert_eq!((strip.x(), strip.width()), (1, MAX_SWEEP_WIDTH));

        // Exactly the strip's columns are inverted (white on a black screen).
        assert_eq!(fb.count_white(column(0)), 0);
        for x in 1..=MAX_SWEEP_WIDTH {
            assert_eq!(fb.count_white(column(x)), 240, "column {x}");
        }
        assert_eq!(fb.count_white(column(MAX_SWEEP_WIDTH + 1)), 0);
    }

    #[test]
    fn test_only_window_rows_inverted() {
        let mut fb = LcdFrameBuffer::new();
        let mut strip = SweepStrip::new();
        strip.advance(&mut fb, 50, 69);
        assert_eq!(fb.count_white(column(0)), 20);
        assert_eq!(fb.pixel(Point::new(0, 49)), Some(false));
        assert_eq!(fb.pixel(Point::new(0, 50)), Some(true));
        assert_eq!(fb.pixel(Point::new(0, 69)), Some(true));
        assert_eq!(fb.pixel(Point::new(0, 70)), Some(false));
    }

    #[test]
    fn test_restart_continues_from_leading_edge() {
        let mut strip = SweepStrip { x: 390, width: 30 };
        strip.restart();
        assert_eq!((strip.x(), strip.width()), (20, 0));
    }

    #[test]
    fn test_wraps_at_screen_edge() {
        let mut fb = LcdFrameBuffer::new();
        let mut strip = SweepStrip {
            x: LCD_COLUMNS - 1,
            width: MAX_SWEEP_WIDTH,
        };
        strip.advance(&mut fb, 0, 239);
        assert_eq!(strip.x(), 0);
        // Trailing column 399 restored (inverted once), leading column 199.
        assert_eq!(fb.count_white(column(399)), 240);
        assert_eq!(fb.count_white(column(199)), 240);
    }

    #[test]
    fn test_patch_covers_wrapped_residue() {
        let mut fb = LcdFrameBuffer::new();
        let strip = SweepStrip { x: 390, width: 20 };
        strip.patch(&mut fb, 100);
        let band = |x, w| Rectangle::new(Point::new(x, 100), Size::new(w, 20));
        assert_eq!(fb.count_white(band(390, 10)), 200);
        assert_eq!(fb.count_white(band(0, 10)), 200);
        assert_eq!(fb.count_white(band(10, 380)), 0);
    }

    #[test]
    fn test_zero_width_patch_is_noop() {
        let mut fb = LcdFrameBuffer::new();
        SweepStrip::new().patch(&mut fb, 0);
        assert_eq!(fb.count_white(fb.bounding_box()), 0);
    }
}
