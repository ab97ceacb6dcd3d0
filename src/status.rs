//! Status panel shared by the counter-driven benchmarks.
//!
//! The panel is a block of help text starting at (5, 5) with one line every
//! 20 rows: the frame rate, two lines of counter values, a blank line, then
//! one help line per button. A full refresh repaints the whole panel; an
//! incremental refresh repaints only the frame-rate line's bounding box.

use core::fmt::Write;

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::dirty::{DirtyRegion, Refresh};
use crate::{Graphics, LcdColor, LCD_COLUMNS};

/// Capacity of a status text buffer in bytes.
pub const STATUS_CAPACITY: usize = 512;

/// Fixed-capacity status text. Text past the capacity is dropped.
pub type StatusText = heapless::String<STATUS_CAPACITY>;

/// Where status text starts.
pub const TEXT_ORIGIN: Point = Point::new(5, 5);

/// Height of one highlight band.
pub const BAND_HEIGHT: u32 = 20;

/// Bounding box of the frame-rate line.
pub const FPS_AREA: Rectangle = Rectangle::new(Point::new(0, 0), Size::new(128, 25));

/// Area erased before the full panel is drawn.
pub const PANEL_AREA: Rectangle = Rectangle::new(Point::new(0, 0), Size::new(LCD_COLUMNS as u32, 185));

/// Top rows of the left, up, right and down help lines.
pub const HELP_ROWS: [i32; 4] = [85, 105, 125, 145];

/// Top row of the "adjust everything" help line.
pub const COMBINED_ROW: i32 = 165;

/// Format the frame-rate line.
#[must_use]
pub fn fps_text(fps: f32) -> StatusText {
    let mut text = StatusText::new();
    let _ = write!(text, "FPS = {fps:.1}");
    text
}

/// Invert a full-width band starting at row `top`.
pub fn highlight(gfx: &mut dyn Graphics, top: i32) {
    gfx.fill_rect(
        Rectangle::new(Point::new(0, top), Size::new(LCD_COLUMNS as u32, BAND_HEIGHT)),
        LcdColor::Xor,
    );
}

/// Draw the panel: `full_text` on a full refresh, the frame rate otherwise.
pub fn draw_panel(gfx: &mut dyn Graphics, refresh: Refresh, full_text: &str) {
    if refresh.is_full() {
        gfx.fill_rect(PANEL_AREA, LcdColor::White);
        gfx.draw_text(full_text, TEXT_ORIGIN);
    } else {
        gfx.fill_rect(FPS_AREA, LcdColor::White);
        let text = fps_text(gfx.fps());
        gfx.draw_text(&text, TEXT_ORIGIN);
    }
}

/// Rows touched by [`draw_panel`] and the highlight bands.
#[must_use]
pub const fn panel_region(refresh: Refresh) -> DirtyRegion {
    let last = match refresh {
        Refresh::Full => PANEL_AREA.size.height as i32 - 1,
        Refresh::Incremental => FPS_AREA.size.height as i32 - 1,
    };
    DirtyRegion::rows(TEXT_ORIGIN.y, last)
}
