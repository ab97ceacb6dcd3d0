//! Interactive frame-rate benchmarks for small monochrome handheld displays.
//!
//! ## What It Measures
//!
//! Each benchmark mode runs a synthetic workload once per frame and shows
//! the frame rate the host measures. Workload intensity is tuned live: hold
//! a direction to pick a knob and turn the crank to change it, or hold A/B
//! to change every knob at once.
//!
//! | Mode | Knobs (left, up, right, down) |
//! |------|-------------------------------|
//! | math | integer adds, integer multiplies, float adds, float multiplies |
//! | memory | sequential writes, sequential reads, random writes, random reads |
//! | sprites | circle count, circle size, square count, square size |
//! | screen | refresh window minimum row (up/right), maximum row (down/left) |
//! | metric ruler / imperial ruler | box left, top, right, bottom edge |
//!
//! The two ruler modes are not benchmarks: they overlay a physical grid so
//! the panel can be checked against a real ruler.
//!
//! ## Partial Refresh
//!
//! Memory LCDs only re-send rows marked as updated. Every frame the active
//! mode decides between a full repaint (mode switch, reset, or any button
//! held) and a minimal incremental repaint that only touches the frame-rate
//! counter, then reports exactly one row range to the host. The screen mode
//! makes the refresh window adjustable and sweeps an inverted strip across
//! it so rows that are not being refreshed are easy to spot.
//!
//! ## Host Interfaces
//!
//! The engine talks to the device through two traits:
//! - [`Graphics`]: rectangle fills, pixels, bitmaps, text, draw mode,
//!   updated-row marking and the measured frame rate
//! - [`Input`]: the held/pushed/released button words and the crank delta
//!
//! [`framebuffer::FrameBuffer`] is an in-memory implementation of
//! [`Graphics`] suitable for simulators and tests.
//!
//! ## Available Feature Flags
//!
//! ### `defmt` Feature
//! Implements `defmt::Format` for the public types and emits log messages
//! for mode switches, resets and cache rebuilds through `defmt`.
#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod bitmap;
pub mod color;
pub mod counter;
pub mod dirty;
pub mod engine;
pub mod framebuffer;
pub mod input;
pub mod lcg;
pub mod modes;
pub mod status;

use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;

pub use bitmap::Bitmap;
pub use color::{DrawMode, LcdColor, Pattern};
pub use dirty::{DirtyRegion, Refresh};
pub use engine::Engine;
pub use input::{ButtonState, Buttons};
pub use modes::Mode;

/// Display width in pixels.
pub const LCD_COLUMNS: i32 = 400;

/// Display height in pixels.
pub const LCD_ROWS: i32 = 240;

/// Framebuffer matching the handheld's panel.
pub type LcdFrameBuffer = framebuffer::FrameBuffer<
    { LCD_ROWS as usize },
    { LCD_COLUMNS as usize },
    { framebuffer::compute_stride(LCD_COLUMNS as usize) },
>;

/// Drawing and compositing services provided by the host.
///
/// Coordinates outside the screen are clipped. Fills take an [`LcdColor`]
/// and ignore the draw mode; bitmaps and text honour it.
pub trait Graphics {
    /// Fill the whole screen.
    fn fill_screen(&mut self, color: LcdColor);

    /// Fill a rectangle.
    fn fill_rect(&mut self, area: Rectangle, color: LcdColor);

    /// Paint one pixel.
    fn set_pixel(&mut self, p: Point, color: LcdColor);

    /// Select how bitmaps and text combine with what is already on screen.
    fn set_draw_mode(&mut self, mode: DrawMode);

    /// Draw a bitmap with its top-left corner at `top_left`.
    fn draw_bitmap(&mut self, bitmap: &Bitmap, top_left: Point);

    /// Draw text with its top-left corner at `position`. Lines are separated
    /// by `'\n'` and laid out 20 pixels apart.
    fn draw_text(&mut self, text: &str, position: Point);

    /// Mark the inclusive row range `first..=last` for the compositor.
    fn mark_updated_rows(&mut self, first: i32, last: i32);

    /// Measured frames per second.
    fn fps(&self) -> f32;
}

/// Input services provided by the host.
pub trait Input {
    /// Button state for this frame.
    fn button_state(&mut self) -> ButtonState;

    /// Crank movement since the previous call.
    fn crank_change(&mut self) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::OriginDimensions;

    #[test]
    fn test_panel_dimensions() {
        assert_eq!(LCD_COLUMNS, 400);
        assert_eq!(LCD_ROWS, 240);
    }

    #[test]
    fn test_lcd_framebuffer_geometry() {
        let fb = LcdFrameBuffer::new();
        let size = fb.size();
        assert_eq!(size.width, LCD_COLUMNS as u32);
        assert_eq!(size.height, LCD_ROWS as u32);
        assert_eq!(fb.row_bytes(0).len(), 52);
    }
}
