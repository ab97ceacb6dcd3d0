//! Packed 1-bit framebuffer for memory-in-pixel LCD panels.
//!
//! This is a reference implementation of the [`Graphics`] host interface.
//! Memory LCDs of the kind found in small handhelds keep their own image and
//! only need the rows that changed to be re-sent, so besides the pixel data
//! the framebuffer accumulates the range of rows marked for update since the
//! last time the compositor collected it.
//!
//! # Memory Layout
//! - One row per display line
//! - Each row is `STRIDE` bytes, most significant bit first, `1` = white
//! - `STRIDE` is rounded up to a 32-bit boundary (see [`compute_stride`]) so
//!   each line can be streamed out with word-sized DMA transfers
//!
//! # Example
//! ```rust
//! use embedded_graphics::prelude::*;
//! use embedded_graphics::primitives::Rectangle;
//! use lcdbench::framebuffer::{compute_stride, FrameBuffer};
//! use lcdbench::{Graphics, LcdColor};
//!
//! const ROWS: usize = 240;
//! const COLS: usize = 400;
//! const STRIDE: usize = compute_stride(COLS);
//!
//! let mut fb = FrameBuffer::<ROWS, COLS, STRIDE>::new();
//! fb.fill_rect(Rectangle::new(Point::new(10, 10), Size::new(20, 20)), LcdColor::Black);
//! fb.mark_updated_rows(10, 29);
//! assert_eq!(fb.take_updated_rows(), Some((10, 29)));
//! ```

use core::convert::Infallible;

use embedded_dma::ReadBuffer;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::mono_font::ascii::FONT_8X13;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{Dimensions, OriginDimensions, Point, Size};
use embedded_graphics::primitives::{PointsIter, Rectangle};
use embedded_graphics::text::{Baseline, LineHeight, Text, TextStyle, TextStyleBuilder};
use embedded_graphics::{Drawable, Pixel};

use crate::bitmap::Bitmap;
use crate::color::{is_white, DrawMode, LcdColor, Paint};
use crate::Graphics;

/// Vertical distance between consecutive lines of status text.
pub const LINE_HEIGHT: u32 = 20;

/// Computes the row stride in bytes for a display `cols` pixels wide.
///
/// Rows are padded to a multiple of four bytes.
#[must_use]
pub const fn compute_stride(cols: usize) -> usize {
    cols.div_ceil(32) * 4
}

/// Character style used for all status text.
#[must_use]
pub fn character_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_8X13, BinaryColor::On)
}

/// Text layout: top-left anchored, fixed line pitch.
#[must_use]
pub fn text_style() -> TextStyle {
    TextStyleBuilder::new()
        .baseline(Baseline::Top)
        .line_height(LineHeight::Pixels(LINE_HEIGHT))
        .build()
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(C)]
struct Row<const STRIDE: usize> {
    data: [u8; STRIDE],
}

impl<const STRIDE: usize> Row<STRIDE> {
    pub const fn new() -> Self {
        Self { data: [0; STRIDE] }
    }

    pub fn fill(&mut self, white: bool) {
        self.data = [if white { 0xff } else { 0x00 }; STRIDE];
    }

    pub fn get(&self, x: usize) -> bool {
        self.data[x / 8] & (0x80u8 >> (x % 8)) != 0
    }

    pub fn paint(&mut self, x: usize, paint: Paint) {
        let bit = 0x80u8 >> (x % 8);
        let byte = &mut self.data[x / 8];
        match paint {
            Paint::Set(true) => *byte |= bit,
            Paint::Set(false) => *byte &= !bit,
            Paint::Invert => *byte ^= bit,
            Paint::Skip => {}
        }
    }
}

impl<const STRIDE: usize> Default for Row<STRIDE> {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory 1-bit display.
///
/// # Type Parameters
/// - `ROWS`: Number of display lines
/// - `COLS`: Number of pixels per line
/// - `STRIDE`: Bytes per line, use [`compute_stride`]
#[derive(Clone)]
#[repr(C)]
#[repr(align(4))]
pub struct FrameBuffer<const ROWS: usize, const COLS: usize, const STRIDE: usize> {
    rows: [Row<STRIDE>; ROWS],
    draw_mode: DrawMode,
    updated: Option<(i32, i32)>,
    fps: f32,
}

impl<const ROWS: usize, const COLS: usize, const STRIDE: usize> Default
    for FrameBuffer<ROWS, COLS, STRIDE>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROWS: usize, const COLS: usize, const STRIDE: usize> FrameBuffer<ROWS, COLS, STRIDE> {
    /// Create an all-black framebuffer in copy mode with no pending updates.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: [Row::new(); ROWS],
            draw_mode: DrawMode::Copy,
            updated: None,
            fps: 0.0,
        }
    }

    /// Read a pixel, `None` when out of range.
    #[must_use]
    pub fn pixel(&self, p: Point) -> Option<bool> {
        let (x, y) = Self::locate(p)?;
        Some(self.rows[y].get(x))
    }

    /// Count the white pixels inside `area`.
    #[must_use]
    pub fn count_white(&self, area: Rectangle) -> usize {
        area.points().filter(|&p| self.pixel(p) == Some(true)).count()
    }

    /// Current draw mode for bitmaps and text.
    #[must_use]
    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Set the value [`Graphics::fps`] reports.
    pub fn set_fps(&mut self, fps: f32) {
        self.fps = fps;
    }

    /// Hand the accumulated updated-row range to the compositor and reset it.
    pub fn take_updated_rows(&mut self) -> Option<(i32, i32)> {
        self.updated.take()
    }

    /// Raw bytes of one line, including padding.
    #[must_use]
    pub fn row_bytes(&self, y: usize) -> &[u8] {
        &self.rows[y].data
    }

    fn locate(p: Point) -> Option<(usize, usize)> {
        if p.x < 0 || p.y < 0 {
            return None;
        }
        let (x, y) = (p.x as usize, p.y as usize);
        if x >= COLS || y >= ROWS {
            return None;
        }
        Some((x, y))
    }

    fn paint(&mut self, p: Point, paint: Paint) {
        if let Some((x, y)) = Self::locate(p) {
            self.rows[y].paint(x, paint);
        }
    }
}

impl<const ROWS: usize, const COLS: usize, const STRIDE: usize> Graphics
    for FrameBuffer<ROWS, COLS, STRIDE>
{
    fn fill_screen(&mut self, color: LcdColor) {
        match color {
            LcdColor::Black => self.rows.iter_mut().for_each(|row| row.fill(false)),
            LcdColor::White => self.rows.iter_mut().for_each(|row| row.fill(true)),
            _ => self.fill_rect(self.bounding_box(), color),
        }
    }

    fn fill_rect(&mut self, area: Rectangle, color: LcdColor) {
        let area = area.intersection(&self.bounding_box());
        for p in area.points() {
            self.paint(p, color.paint_at(p));
        }
    }

    fn set_pixel(&mut self, p: Point, color: LcdColor) {
        self.paint(p, color.paint_at(p));
    }

    fn set_draw_mode(&mut self, mode: DrawMode) {
        self.draw_mode = mode;
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, top_left: Point) {
        let visible = Rectangle::new(top_left, bitmap.size()).intersection(&self.bounding_box());
        for p in visible.points() {
            if let Some(white) = bitmap.pixel(p - top_left) {
                self.paint(p, self.draw_mode.paint(white));
            }
        }
    }

    fn draw_text(&mut self, text: &str, position: Point) {
        let _ = Text::with_text_style(text, position, character_style(), text_style()).draw(self);
    }

    fn mark_updated_rows(&mut self, first: i32, last: i32) {
        let first = first.max(0);
        let last = last.min(ROWS as i32 - 1);
        if first > last {
            return;
        }
        self.updated = Some(match self.updated {
            Some((lo, hi)) => (lo.min(first), hi.max(last)),
            None => (first, last),
        });
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}

impl<const ROWS: usize, const COLS: usize, const STRIDE: usize> OriginDimensions
    for FrameBuffer<ROWS, COLS, STRIDE>
{
    fn size(&self) -> Size {
        Size::new(COLS as u32, ROWS as u32)
    }
}

impl<const ROWS: usize, const COLS: usize, const STRIDE: usize> DrawTarget
    for FrameBuffer<ROWS, COLS, STRIDE>
{
    type Color = BinaryColor;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let mode = self.draw_mode;
        for Pixel(p, color) in pixels {
            self.paint(p, mode.paint(is_white(color)));
        }
        Ok(())
    }
}

unsafe impl<const ROWS: usize, const COLS: usize, const STRIDE: usize> ReadBuffer
    for FrameBuffer<ROWS, COLS, STRIDE>
{
    type Word = u8;

    unsafe fn read_buffer(&self) -> (*const u8, usize) {
        let ptr = &self.rows as *const _ as *const u8;
        let len = core::mem::size_of_val(&self.rows);
        (ptr, len)
    }
}

impl<const ROWS: usize, const COLS: usize, const STRIDE: usize> core::fmt::Debug
    for FrameBuffer<ROWS, COLS, STRIDE>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("size", &core::mem::size_of_val(&self.rows))
            .field("rows", &ROWS)
            .field("stride", &STRIDE)
            .field("draw_mode", &self.draw_mode)
            .field("updated", &self.updated)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<const ROWS: usize, const COLS: usize, const STRIDE: usize> defmt::Format
    for FrameBuffer<ROWS, COLS, STRIDE>
{
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "FrameBuffer<{}, {}, {}>", ROWS, COLS, STRIDE);
        defmt::write!(f, " size: {}", core::mem::size_of_val(&self.rows));
        defmt::write!(f, " draw_mode: {}", self.draw_mode);
    }
}
