//! Colors, fill patterns and draw modes for a 1-bit display.
//!
//! Pixels are stored as single bits where `1` is white and `0` is black,
//! matching the panel's native polarity. Text and other `embedded-graphics`
//! drawables use [`BinaryColor`], where `On` is ink (black) and `Off` is
//! paper (white).

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::Point;

/// An 8x8 fill pattern.
///
/// The first eight bytes are pixel rows and the last eight bytes are mask
/// rows. Within a byte the most significant bit is the leftmost pixel. A set
/// pixel bit is white; a cleared mask bit leaves the destination untouched.
/// Patterns are anchored to screen coordinates, not to the filled rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pattern(pub [u8; 16]);

impl Pattern {
    /// Alternating white and black columns on every row.
    pub const DOTTED_LINE: Self = Self([
        0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, //
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    ]);

    /// Black pixels on every other row, transparent elsewhere.
    pub const HORIZONTAL_STRIPES: Self = Self([
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x00, 0xff, 0x00, 0xff, 0x00, 0xff, 0x00, 0xff,
    ]);

    /// Black pixels on every other column, transparent elsewhere.
    pub const VERTICAL_STRIPES: Self = Self([
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55,
    ]);

    /// Light checkered shade used behind the pause menu.
    pub const SHADE: Self = Self([
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, //
        0xff, 0xaa, 0xff, 0x55, 0xff, 0xaa, 0xff, 0x55,
    ]);

    /// Look up the pattern at a screen position.
    ///
    /// Returns `None` when the mask is clear, otherwise `Some(white)`.
    #[must_use]
    pub fn sample(&self, p: Point) -> Option<bool> {
        let row = p.y.rem_euclid(8) as usize;
        let bit = 7 - p.x.rem_euclid(8) as u32;
        if (self.0[8 + row] >> bit) & 1 == 0 {
            return None;
        }
        Some((self.0[row] >> bit) & 1 == 1)
    }
}

/// Fill color for rectangles and pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdColor {
    /// Solid black.
    Black,
    /// Solid white.
    White,
    /// Transparent; leaves the destination untouched.
    Clear,
    /// Inverts the destination.
    Xor,
    /// Repeating 8x8 pattern.
    Pattern(Pattern),
}

/// What a fill does to one destination pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    /// Store this value (`true` = white).
    Set(bool),
    /// Flip the destination.
    Invert,
    /// Leave the destination alone.
    Skip,
}

impl LcdColor {
    /// Resolve this color at a screen position.
    #[must_use]
    pub fn paint_at(self, p: Point) -> Paint {
        match self {
            Self::Black => Paint::Set(false),
            Self::White => Paint::Set(true),
            Self::Clear => Paint::Skip,
            Self::Xor => Paint::Invert,
            Self::Pattern(pattern) => pattern.sample(p).map_or(Paint::Skip, Paint::Set),
        }
    }
}

/// How source pixels of bitmaps and text combine with the destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawMode {
    /// Source replaces destination.
    #[default]
    Copy,
    /// White source pixels invert the destination, black ones are ignored.
    Xor,
    /// Black source pixels invert the destination, white ones are ignored.
    Nxor,
}

impl DrawMode {
    /// Combine an opaque source pixel (`true` = white) with the destination.
    #[must_use]
    pub const fn paint(self, source_white: bool) -> Paint {
        match self {
            Self::Copy => Paint::Set(source_white),
            Self::Xor if source_white => Paint::Invert,
            Self::Nxor if !source_white => Paint::Invert,
            Self::Xor | Self::Nxor => Paint::Skip,
        }
    }
}

/// Convert an `embedded-graphics` binary color to the native polarity.
#[must_use]
pub const fn is_white(color: BinaryColor) -> bool {
    matches!(color, BinaryColor::Off)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_colors() {
        let p = Point::new(3, 7);
        assert_eq!(LcdColor::Black.paint_at(p), Paint::Set(false));
        assert_eq!(LcdColor::White.paint_at(p), Paint::Set(true));
        assert_eq!(LcdColor::Clear.paint_at(p), Paint::Skip);
        assert_eq!(LcdColor::Xor.paint_at(p), Paint::Invert);
    }

    #[test]
    fn test_dotted_line_alternates_columns() {
        let color = LcdColor::Pattern(Pattern::DOTTED_LINE);
        assert_eq!(color.paint_at(Point::new(0, 10)), Paint::Set(false));
        assert_eq!(color.paint_at(Point::new(1, 10)), Paint::Set(true));
        assert_eq!(color.paint_at(Point::new(8, 10)), Paint::Set(false));
        assert_eq!(color.paint_at(Point::new(9, 3)), Paint::Set(true));
    }

    #[test]
    fn test_stripe_masks() {
        let horizontal = Pattern::HORIZONTAL_STRIPES;
        assert_eq!(horizontal.sample(Point::new(5, 0)), None);
        assert_eq!(horizontal.sample(Point::new(5, 1)), Some(false));

        let vertical = Pattern::VERTICAL_STRIPES;
        assert_eq!(vertical.sample(Point::new(0, 4)), None);
        assert_eq!(vertical.sample(Point::new(1, 4)), Some(false));
    }

    #[test]
    fn test_pattern_negative_coordinates_wrap() {
        let pattern = Pattern::DOTTED_LINE;
        assert_eq!(pattern.sample(Point::new(-1, -1)), pattern.sample(Point::new(7, 7)));
    }

    #[test]
    fn test_draw_modes() {
        assert_eq!(DrawMode::Copy.paint(true), Paint::Set(true));
        assert_eq!(DrawMode::Copy.paint(false), Paint::Set(false));
        assert_eq!(DrawMode::Xor.paint(true), Paint::Invert);
        assert_eq!(DrawMode::Xor.paint(false), Paint::Skip);
        assert_eq!(DrawMode::Nxor.paint(true), Paint::Skip);
        assert_eq!(DrawMode::Nxor.paint(false), Paint::Invert);
        assert_eq!(DrawMode::default(), DrawMode::Copy);
    }

    #[test]
    fn test_binary_color_polarity() {
        assert!(!is_white(BinaryColor::On));
        assert!(is_white(BinaryColor::Off));
    }
}
