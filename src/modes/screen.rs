//! Partial refresh benchmark.
//!
//! Only the rows inside an adjustable window are reported as updated on
//! idle frames, so the frame rate shows what refreshing a band of a given
//! height costs. The frame-rate line sits in the middle of the window and the
//! help text in the other half of the screen.

use core::fmt::Write;

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::counter::{BoundedCounter, ParameterSet};
use crate::dirty::{DirtyRegion, Refresh};
use crate::input::{scale_crank, Buttons};
use crate::modes::sweep::SweepStrip;
use crate::modes::{Benchmark, Frame};
use crate::status::{fps_text, highlight, StatusText, BAND_HEIGHT};
use crate::{Graphics, LcdColor, Pattern, LCD_COLUMNS, LCD_ROWS};

/// Smallest window height: one line of text, since the frame rate is
/// always redrawn inside the window.
pub const MIN_REFRESH_HEIGHT: i32 = 20;

/// Column where the text starts.
const TEXT_X: i32 = 5;

const HELP_TEXT: &str = "up + crank: adjust minimum row\n\
                         left + crank: adjust maximum row\n\
                         A/B + crank: adjust both rows once";

const CRANK_MULTIPLIER: i32 = 1;

const MIN_ROW: usize = 0;
const MAX_ROW: usize = 1;

/// Inclusive row range refreshed on idle frames.
///
/// The window is always at least [`MIN_REFRESH_HEIGHT`] rows tall. Moving
/// one edge past that limit drags the other edge along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshWindow {
    rows: ParameterSet<2>,
}

impl Default for RefreshWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshWindow {
    /// The whole screen.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: ParameterSet::new(
                ["min-row", "max-row"],
                [
                    BoundedCounter::new(0, 0, LCD_ROWS - MIN_REFRESH_HEIGHT),
                    BoundedCounter::new(LCD_ROWS - 1, MIN_REFRESH_HEIGHT - 1, LCD_ROWS - 1),
                ],
            ),
        }
    }

    /// First refreshed row.
    #[must_use]
    pub fn min_row(&self) -> i32 {
        self.rows.get(MIN_ROW)
    }

    /// Last refreshed row.
    #[must_use]
    pub fn max_row(&self) -> i32 {
        self.rows.get(MAX_ROW)
    }

    /// Rows in the window.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.max_row() - self.min_row() + 1
    }

    /// Move the first row, pushing the last row down if needed.
    pub fn adjust_min(&mut self, delta: i32) {
        let min = self.rows.adjust(MIN_ROW, delta);
        if min + MIN_REFRESH_HEIGHT - 1 > self.max_row() {
            self.rows.set(MAX_ROW, min + MIN_REFRESH_HEIGHT - 1);
        }
    }

    /// Move the last row, pulling the first row up if needed.
    pub fn adjust_max(&mut self, delta: i32) {
        let max = self.rows.adjust(MAX_ROW, delta);
        if max - MIN_REFRESH_HEIGHT + 1 < self.min_row() {
            self.rows.set(MIN_ROW, max - MIN_REFRESH_HEIGHT + 1);
        }
    }

    /// Top of the frame-rate line, centred in the window.
    #[must_use]
    pub fn fps_row(&self) -> i32 {
        (self.min_row() + self.max_row() - MIN_REFRESH_HEIGHT) / 2
    }

    /// Top of the help text, in the half of the screen the frame rate is not in.
    #[must_use]
    pub fn help_row(&self) -> i32 {
        if self.fps_row() > LCD_ROWS / 2 {
            5
        } else {
            LCD_ROWS - 65
        }
    }

    /// Back to the whole screen.
    pub fn reset(&mut self) {
        self.rows.reset();
    }
}

/// Partial refresh benchmark state.
#[derive(Clone, Debug)]
pub struct Screen {
    window: RefreshWindow,
    sweep: Option<SweepStrip>,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Full-screen window with the sweep strip enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            window: RefreshWindow::new(),
            sweep: Some(SweepStrip::new()),
        }
    }

    /// Full-screen window without the sweep strip.
    #[must_use]
    pub const fn without_sweep() -> Self {
        Self {
            window: RefreshWindow::new(),
            sweep: None,
        }
    }

    /// Turn the sweep strip on or off. Turning it on starts a fresh strip.
    pub fn set_sweep(&mut self, enabled: bool) {
        self.sweep = enabled.then(SweepStrip::new);
    }

    /// Sweep strip, when enabled.
    #[must_use]
    pub fn sweep(&self) -> Option<&SweepStrip> {
        self.sweep.as_ref()
    }

    /// Refresh window.
    #[must_use]
    pub fn window(&self) -> &RefreshWindow {
        &self.window
    }

    /// Refresh window, for hosts that preset it.
    pub fn window_mut(&mut self) -> &mut RefreshWindow {
        &mut self.window
    }

    /// Frame rate and window text drawn on a full refresh.
    #[must_use]
    pub fn status_text(&self, fps: f32) -> StatusText {
        let w = &self.window;
        let mut text = StatusText::new();
        let _ = write!(
            text,
            "FPS = {fps:.1}\nrefresh rows: min = {}, max = {}, size = {}",
            w.min_row(),
            w.max_row(),
            w.height(),
        );
        text
    }

    fn draw_status(&mut self, gfx: &mut dyn Graphics, refresh: Refresh, fps_row: i32, help_row: i32) {
        let (first, last) = (self.window.min_row(), self.window.max_row());
        match refresh {
            Refresh::Full => {
                gfx.fill_screen(LcdColor::White);
                let text = self.status_text(gfx.fps());
                gfx.draw_text(&text, Point::new(TEXT_X, fps_row));
                gfx.draw_text(HELP_TEXT, Point::new(TEXT_X, help_row));
                if let Some(sweep) = &mut self.sweep {
                    sweep.restart();
                }
            }
            Refresh::Incremental => {
                if let Some(sweep) = &mut self.sweep {
                    sweep.advance(gfx, first, last);
                }
                gfx.fill_rect(
                    Rectangle::new(Point::new(0, fps_row), Size::new(LCD_COLUMNS as u32, BAND_HEIGHT)),
                    LcdColor::White,
                );
                gfx.draw_text(&fps_text(gfx.fps()), Point::new(TEXT_X, fps_row));
                if let Some(sweep) = &self.sweep {
                    sweep.patch(gfx, fps_row);
                }
            }
        }
    }

    fn handle_input(&mut self, gfx: &mut dyn Graphics, buttons: Buttons, crank: i32, help_row: i32) {
        if buttons.is_combined() {
            highlight(gfx, help_row + 40);
        }
        let buttons = buttons.with_combined();

        if buttons.intersects(Buttons::DIRECTIONS) {
            for row in [self.window.min_row(), self.window.max_row()] {
                gfx.fill_rect(
                    Rectangle::new(Point::new(0, row), Size::new(LCD_COLUMNS as u32, 1)),
                    LcdColor::Pattern(Pattern::DOTTED_LINE),
                );
            }
        }

        let delta = scale_crank(crank, CRANK_MULTIPLIER);
        if buttons.intersects(Buttons::UP | Buttons::RIGHT) {
            highlight(gfx, help_row);
            self.window.adjust_min(delta);
        }
        if buttons.intersects(Buttons::DOWN | Buttons::LEFT) {
            highlight(gfx, help_row + 20);
            self.window.adjust_max(delta);
        }
    }
}

impl Benchmark for Screen {
    fn run_frame(&mut self, frame: &mut Frame<'_>) -> DirtyRegion {
        let refresh = Refresh::decide(frame.full_refresh, frame.buttons);
        let fps_row = self.window.fps_row();
        let help_row = self.window.help_row();

        self.draw_status(frame.gfx, refresh, fps_row, help_row);
        self.handle_input(frame.gfx, frame.buttons, frame.crank, help_row);

        match refresh {
            Refresh::Full => DirtyRegion::Full,
            Refresh::Incremental => DirtyRegion::rows(self.window.min_row(), self.window.max_row()),
        }
    }

    fn reset(&mut self) {
        self.window.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lcg::Lcg;
    use crate::LcdFrameBuffer;

    fn run(screen: &mut Screen, fb: &mut LcdFrameBuffer, buttons: Buttons, crank: i32, full: bool) -> DirtyRegion {
        let mut rng = Lcg::default();
        screen.run_frame(&mut Frame {
            gfx: fb,
            rng: &mut rng,
            buttons,
            crank,
            full_refresh: full,
        })
    }

    fn assert_valid(window: &RefreshWindow) {
        assert!(window.min_row() >= 0);
        assert!(window.max_row() < LCD_ROWS);
        assert!(window.height() >= MIN_REFRESH_HEIGHT);
    }

    #[test]
    fn test_default_layout() {
        let window = RefreshWindow::new();
        assert_eq!((window.min_row(), window.max_row()), (0, 239));
        assert_eq!(window.fps_row(), 109);
        assert_eq!(window.help_row(), 175);
    }

    #[test]
    fn test_help_moves_to_top_when_window_is_low() {
        let mut window = RefreshWindow::new();
        window.adjust_min(200);
        assert_eq!(window.fps_row(), 209);
        assert_eq!(window.help_row(), 5);
    }

    #[test]
    fn test_min_pushes_max() {
        let mut window = RefreshWindow::new();
        window.adjust_max(-139);
        assert_eq!(window.max_row(), 100);
        window.adjust_min(90);
        assert_eq!((window.min_row(), window.max_row()), (90, 109));
        window.adjust_min(1000);
        assert_eq!((window.min_row(), window.max_row()), (220, 239));
    }

    #[test]
    fn test_max_pulls_min() {
        let mut window = RefreshWindow::new();
        window.adjust_min(150);
        window.adjust_max(-100);
        assert_eq!((window.min_row(), window.max_row()), (120, 139));
        window.adjust_max(-1000);
        assert_eq!((window.min_row(), window.max_row()), (0, 19));
    }

    #[test]
    fn test_window_stays_valid() {
        let mut window = RefreshWindow::new();
        let mut rng = Lcg::new(11);
        for _ in 0..1000 {
            let delta = rng.below(601) as i32 - 300;
            if rng.below(2) == 0 {
                window.adjust_min(delta);
            } else {
                window.adjust_max(delta);
            }
            assert_valid(&window);
        }
    }

    #[test]
    fn test_idle_frame_reports_window() {
        let mut fb = LcdFrameBuffer::new();
        let mut screen = Screen::new();
        screen.window_mut().adjust_min(40);
        screen.window_mut().adjust_max(-100);

        assert_eq!(run(&mut screen, &mut fb, Buttons::new(), 0, true), DirtyRegion::Full);
        assert_eq!(
            run(&mut screen, &mut fb, Buttons::new(), 0, false),
            DirtyRegion::rows(40, 139)
        );
    }

    #[test]
    fn test_sweep_column_spans_window() {
        let mut fb = LcdFrameBuffer::new();
        let mut screen = Screen::new();
        run(&mut screen, &mut fb, Buttons::new(), 0, true);
        run(&mut screen, &mut fb, Buttons::new(), 0, false);

        assert_eq!(screen.sweep().map(SweepStrip::width), Some(1));
        // Column 0 is inverted on every row, including the redrawn FPS band.
        assert_eq!(fb.pixel(Point::new(0, 50)), Some(false));
        assert_eq!(fb.pixel(Point::new(0, 115)), Some(false));
        assert_eq!(fb.pixel(Point::new(1, 50)), Some(true));
    }

    #[test]
    fn test_without_sweep() {
        let mut fb = LcdFrameBuffer::new();
        let mut screen = Screen::without_sweep();
        run(&mut screen, &mut fb, Buttons::new(), 0, true);
        run(&mut screen, &mut fb, Buttons::new(), 0, false);
        assert!(screen.sweep().is_none());
        assert_eq!(fb.pixel(Point::new(0, 50)), Some(true));
        assert_eq!(fb.pixel(Point::new(0, 115)), Some(true));

        screen.set_sweep(true);
        assert_eq!(screen.sweep(), Some(&SweepStrip::new()));
    }

    #[test]
    fn test_full_refresh_restarts_sweep() {
        let mut fb = LcdFrameBuffer::new();
        let mut screen = Screen::new();
        for _ in 0..5 {
            run(&mut screen, &mut fb, Buttons::new(), 0, false);
        }
        assert_eq!(screen.sweep().map(SweepStrip::width), Some(5));
        run(&mut screen, &mut fb, Buttons::new(), 0, true);
        let sweep = screen.sweep().copied();
        assert_eq!(sweep.map(|s| (s.x(), s.width())), Some((5, 0)));
    }

    #[test]
    fn test_buttons_adjust_window() {
        let mut fb = LcdFrameBuffer::new();
        let mut screen = Screen::new();

        assert_eq!(run(&mut screen, &mut fb, Buttons::RIGHT, 30, false), DirtyRegion::Full);
        assert_eq!(screen.window().min_row(), 30);

        run(&mut screen, &mut fb, Buttons::LEFT, -40, false);
        assert_eq!(screen.window().max_row(), 199);

        run(&mut screen, &mut fb, Buttons::A, 5, false);
        assert_eq!((screen.window().min_row(), screen.window().max_row()), (35, 204));
    }

    #[test]
    fn test_dotted_markers_on_window_edges() {
        let mut fb = LcdFrameBuffer::new();
        let mut screen = Screen::new();
        screen.window_mut().adjust_min(60);
        run(&mut screen, &mut fb, Buttons::UP, 0, false);
        // Dotted marker: even columns black, odd columns white.
        assert_eq!(fb.pixel(Point::new(0, 60)), Some(false));
        assert_eq!(fb.pixel(Point::new(1, 60)), Some(true));
        assert_eq!(screen.window().min_row(), 60);
    }

    #[test]
    fn test_reset() {
        let mut screen = Screen::new();
        screen.window_mut().adjust_min(100);
        screen.reset();
        assert_eq!(screen.window(), &RefreshWindow::new());
    }

    #[test]
    fn test_help_text_lines() {
        let mut lines = HELP_TEXT.lines();
        assert_eq!(lines.next(), Some("up + crank: adjust minimum row"));
        assert_eq!(lines.next(), Some("left + crank: adjust maximum row"));
        assert_eq!(lines.next(), Some("A/B + crank: adjust both rows once"));
        assert_eq!(lines.next(), None);
    }
}
