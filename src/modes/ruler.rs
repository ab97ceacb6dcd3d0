//! Calibration rulers.
//!
//! Not a benchmark: draws a physical grid (metric or imperial) using the
//! panel's dot pitch, plus an XOR box whose edges are moved with the d-pad
//! and crank. Holding a button redraws everything; idle frames draw nothing
//! and only report the status line.

use core::fmt::Write;

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::dirty::DirtyRegion;
use crate::input::Buttons;
use crate::modes::{Benchmark, Frame};
use crate::status::StatusText;
use crate::{Graphics, LcdColor, Pattern, LCD_COLUMNS, LCD_ROWS};

/// Columns covered by the grid.
pub const GRID_WIDTH: i32 = LCD_COLUMNS;

/// Rows covered by the grid; the rest holds the status line.
pub const GRID_HEIGHT: i32 = LCD_ROWS - 20;

/// Millimetres per pixel, from the panel datasheet.
pub const DOT_PITCH_MM: f32 = 0.147;

/// Inches per pixel.
pub const DOT_PITCH_IN: f32 = DOT_PITCH_MM / 25.4;

/// Where the measurement text is drawn.
pub const STATUS_ORIGIN: Point = Point::new(1, GRID_HEIGHT + 1);

/// Pixels where the distance from the origin, truncated to whole grid
/// units, changes, paired with that distance.
fn unit_steps(pitch: f32, span: i32) -> impl Iterator<Item = (i32, i32)> {
    let mut last = -1;
    (0..span).filter_map(move |pixel| {
        let units = (pixel as f32 * pitch) as i32;
        if units == last {
            None
        } else {
            last = units;
            Some((pixel, units))
        }
    })
}

/// Ruler units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scale {
    /// Dots every millimetre, dotted lines every 5 mm, solid every centimetre.
    Metric,
    /// Dots every 1/32 in, dotted lines every 1/8 in, solid every inch.
    Imperial,
}

impl Scale {
    /// Unit suffix in the status line.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Metric => "mm",
            Self::Imperial => "in",
        }
    }

    /// Physical size of one pixel in display units.
    #[must_use]
    pub const fn pitch(self) -> f32 {
        match self {
            Self::Metric => DOT_PITCH_MM,
            Self::Imperial => DOT_PITCH_IN,
        }
    }

    /// Grid pitch in grid units per pixel, then units per minor and per
    /// major line.
    const fn grid(self) -> (f32, i32, i32) {
        match self {
            Self::Metric => (DOT_PITCH_MM, 5, 10),
            Self::Imperial => (DOT_PITCH_IN * 32.0, 4, 32),
        }
    }

    /// Box edge length in pixels when the ruler starts: 1 cm or 1 in,
    /// rounded to the nearest pixel.
    #[must_use]
    pub fn default_extent(self) -> i32 {
        let length = match self {
            Self::Metric => 10.0,
            Self::Imperial => 1.0,
        };
        (length / self.pitch() + 0.5) as i32
    }

    /// Box size line, e.g. `68 x 68 = 10.00 mm x 10.00 mm = 99.92 mm^2`.
    #[must_use]
    pub fn measurement_text(self, measure: &RulerBox) -> StatusText {
        let (w, h) = (measure.width(), measure.height());
        let (w_units, h_units) = (w as f32 * self.pitch(), h as f32 * self.pitch());
        let unit = self.unit();
        let mut text = StatusText::new();
        let _ = write!(
            text,
            "{w} x {h} = {w_units:.2} {unit} x {h_units:.2} {unit} = {:.2} {unit}^2",
            w_units * h_units,
        );
        text
    }

    /// Draw the grid over the grid area.
    pub fn draw_grid(self, gfx: &mut dyn Graphics) {
        let (pitch, minor, major) = self.grid();

        for (x, units) in unit_steps(pitch, GRID_WIDTH) {
            if units % major == 0 {
                gfx.fill_rect(Rectangle::new(Point::new(x, 0), Size::new(1, GRID_HEIGHT as u32)), LcdColor::Black);
            } else if units % minor == 0 {
                for (y, _) in unit_steps(pitch, GRID_HEIGHT) {
                    gfx.set_pixel(Point::new(x, y), LcdColor::Black);
                }
            }
        }
        for (y, units) in unit_steps(pitch, GRID_HEIGHT) {
            if units % major == 0 {
                gfx.fill_rect(Rectangle::new(Point::new(0, y), Size::new(GRID_WIDTH as u32, 1)), LcdColor::Black);
            } else if units % minor == 0 {
                for (x, _) in unit_steps(pitch, GRID_WIDTH) {
                    gfx.set_pixel(Point::new(x, y), LcdColor::Black);
                }
            }
        }
    }
}

/// Measurement box in pixel coordinates.
///
/// Edges stay inside the grid and never cross: moving one edge past its
/// opposite drags the opposite edge along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RulerBox {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl RulerBox {
    /// Square box of edge `extent` at the top-left corner.
    #[must_use]
    pub fn square(extent: i32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: extent.clamp(0, GRID_WIDTH),
            bottom: extent.clamp(0, GRID_HEIGHT),
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.left
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.top
    }

    /// Right edge, exclusive.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.right
    }

    /// Bottom edge, exclusive.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.bottom
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Area covered by the box.
    #[must_use]
    pub const fn area(&self) -> Rectangle {
        Rectangle::new(
            Point::new(self.left, self.top),
            Size::new(self.width() as u32, self.height() as u32),
        )
    }

    /// Move the left edge; crossing the right edge drags it along.
    pub fn adjust_left(&mut self, delta: i32) {
        self.left = self.left.saturating_add(delta).clamp(0, GRID_WIDTH);
        if self.left > self.right {
            self.right = self.left;
        }
    }

    /// Move the right edge; crossing the left edge drags it along.
    pub fn adjust_right(&mut self, delta: i32) {
        self.right = self.right.saturating_add(delta).clamp(0, GRID_WIDTH);
        if self.right < self.left {
            self.left = self.right;
        }
    }

    /// Move the top edge; crossing the bottom edge drags it along.
    pub fn adjust_top(&mut self, delta: i32) {
        self.top = self.top.saturating_add(delta).clamp(0, GRID_HEIGHT);
        if self.top > self.bottom {
            self.bottom = self.top;
        }
    }

    /// Move the bottom edge; crossing the top edge drags it along.
    pub fn adjust_bottom(&mut self, delta: i32) {
        self.bottom = self.bottom.saturating_add(delta).clamp(0, GRID_HEIGHT);
        if self.bottom < self.top {
            self.top = self.bottom;
        }
    }
}

/// Ruler state shared by both scales.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ruler {
    scale: Scale,
    measure: Option<RulerBox>,
}

impl Default for Ruler {
    fn default() -> Self {
        Self::new(Scale::Metric)
    }
}

impl Ruler {
    /// Ruler with no box yet; the first frame places one sized for `scale`.
    #[must_use]
    pub const fn new(scale: Scale) -> Self {
        Self { scale, measure: None }
    }

    /// Current units.
    #[must_use]
    pub const fn scale(&self) -> Scale {
        self.scale
    }

    /// Switch units. The box is kept.
    pub fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    /// Measurement box, once placed.
    #[must_use]
    pub const fn measure(&self) -> Option<&RulerBox> {
        self.measure.as_ref()
    }

    /// Box size line for the placed box.
    #[must_use]
    pub fn status_text(&self) -> Option<StatusText> {
        self.measure.as_ref().map(|measure| self.scale.measurement_text(measure))
    }

    fn handle_input(measure: &mut RulerBox, gfx: &mut dyn Graphics, buttons: Buttons, delta: i32) {
        let buttons = buttons.with_combined();
        let tangent_x = |x| Rectangle::new(Point::new(x, 0), Size::new(1, GRID_HEIGHT as u32));
        let tangent_y = |y| Rectangle::new(Point::new(0, y), Size::new(GRID_WIDTH as u32, 1));
        let vertical = LcdColor::Pattern(Pattern::HORIZONTAL_STRIPES);
        let horizontal = LcdColor::Pattern(Pattern::VERTICAL_STRIPES);

        // Tangents mark the edge where it was drawn this frame.
        if buttons.left() {
            gfx.fill_rect(tangent_x(measure.left()), vertical);
            measure.adjust_left(delta);
        }
        if buttons.right() {
            gfx.fill_rect(tangent_x(measure.right()), vertical);
            measure.adjust_right(delta);
        }
        if buttons.up() {
            gfx.fill_rect(tangent_y(measure.top()), horizontal);
            measure.adjust_top(delta);
        }
        if buttons.down() {
            gfx.fill_rect(tangent_y(measure.bottom()), horizontal);
            measure.adjust_bottom(delta);
        }
    }
}

impl Benchmark for Ruler {
    /// Redraws everything while a button is held or when forced, otherwise
    /// reports just the status line.
    fn run_frame(&mut self, frame: &mut Frame<'_>) -> DirtyRegion {
        let scale = self.scale;
        let measure = self
            .measure
            .get_or_insert_with(|| RulerBox::square(scale.default_extent()));

        let redraw = frame.full_refresh || !frame.buttons.is_empty();
        if redraw {
            frame.gfx.fill_screen(LcdColor::White);
            scale.draw_grid(frame.gfx);
            frame.gfx.fill_rect(measure.area(), LcdColor::Xor);
            frame.gfx.draw_text(&scale.measurement_text(measure), STATUS_ORIGIN);
        }

        Self::handle_input(measure, frame.gfx, frame.buttons, frame.crank);

        if redraw {
            DirtyRegion::Full
        } else {
            DirtyRegion::rows(GRID_HEIGHT, LCD_ROWS - 1)
        }
    }

    /// Forgets the box; the next frame places a fresh one.
    fn reset(&mut self) {
        self.measure = None;
    }
}
