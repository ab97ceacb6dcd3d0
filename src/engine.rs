//! Mode controller.
//!
//! [`Engine`] owns every mode's state and runs the active mode once per
//! frame. It turns mode switches, reset commands and button state changes
//! into a forced full refresh, and hands exactly one updated row range to
//! the host at the end of each frame.
//!
//! # Example
//! ```rust
//! use lcdbench::{ButtonState, Buttons, DirtyRegion, Engine, Input, LcdFrameBuffer, Mode};
//! use lcdbench::lcg::Lcg;
//!
//! struct Idle;
//!
//! impl Input for Idle {
//!     fn button_state(&mut self) -> ButtonState {
//!         ButtonState::held(Buttons::new())
//!     }
//!
//!     fn crank_change(&mut self) -> i32 {
//!         0
//!     }
//! }
//!
//! let mut fb = LcdFrameBuffer::new();
//! let mut engine = Engine::new(Lcg::new(42));
//! engine.select_mode(Mode::Memory);
//!
//! assert_eq!(engine.update(&mut fb, &mut Idle), DirtyRegion::Full);
//! assert_eq!(engine.update(&mut fb, &mut Idle), DirtyRegion::rows(5, 24));
//! assert_eq!(fb.take_updated_rows(), Some((0, 239)));
//! ```

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Text;
use embedded_graphics::Drawable;
use rand_core::RngCore;

use crate::bitmap::Bitmap;
use crate::dirty::DirtyRegion;
use crate::framebuffer::{character_style, text_style};
use crate::input::Buttons;
use crate::modes::{Arithmetic, Benchmark, Frame, Memory, Mode, Ruler, Scale, Screen, Sprites};
use crate::{Graphics, Input, LcdColor, Pattern, LCD_COLUMNS, LCD_ROWS};

/// Version line on the pause-menu card.
pub const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Rows of the info card covered by the shade pattern.
const SHADE_HEIGHT: u32 = 196;

/// Runs the benchmark modes.
///
/// `R` is the host's general-purpose random source, used for sprite
/// placement and glyph dithering. The memory benchmark keeps its own
/// deterministic generator.
pub struct Engine<R: RngCore> {
    mode: Mode,
    previous_mode: Option<Mode>,
    previous_buttons: Buttons,
    rng: R,
    arithmetic: Arithmetic,
    memory: Memory,
    sprites: Sprites,
    screen: Screen,
    ruler: Ruler,
}

impl<R: RngCore> Engine<R> {
    /// Allocate every mode's buffers and start in [`Mode::Arithmetic`].
    ///
    /// The first frame is always a full refresh.
    pub fn new(rng: R) -> Self {
        Self {
            mode: Mode::Arithmetic,
            previous_mode: None,
            previous_buttons: Buttons::A | Buttons::B,
            rng,
            arithmetic: Arithmetic::new(),
            memory: Memory::new(),
            sprites: Sprites::new(),
            screen: Screen::new(),
            ruler: Ruler::new(Scale::Metric),
        }
    }

    /// Active mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch modes. Parameters of every mode are kept; the next frame
    /// starts from a cleared screen.
    pub fn select_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            info!("mode {} -> {}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Restore the active mode's defaults and force a full refresh.
    pub fn reset(&mut self) {
        info!("reset {}", self.mode);
        match self.mode {
            Mode::Arithmetic => self.arithmetic.reset(),
            Mode::Memory => self.memory.reset(),
            Mode::Sprites => self.sprites.reset(),
            Mode::Screen => self.screen.reset(),
            Mode::MetricRuler | Mode::ImperialRuler => self.ruler.reset(),
        }
        self.previous_mode = None;
    }

    /// Run one frame of the active mode and mark its rows as updated.
    pub fn update(&mut self, gfx: &mut dyn Graphics, input: &mut dyn Input) -> DirtyRegion {
        let mode = self.mode;
        let mode_changed = self.previous_mode != Some(mode);
        if mode_changed {
            gfx.fill_screen(LcdColor::White);
        }

        let buttons = input.button_state().current;
        let buttons_changed = buttons != self.previous_buttons;
        self.previous_buttons = buttons;
        let crank = input.crank_change();

        let full_refresh = mode_changed || buttons_changed;
        if full_refresh {
            trace!("full refresh: mode changed {}, buttons changed {}", mode_changed, buttons_changed);
        }

        let region = {
            let Self {
                arithmetic,
                memory,
                sprites,
                screen,
                ruler,
                rng,
                ..
            } = self;
            let benchmark: &mut dyn Benchmark = match mode {
                Mode::Arithmetic => arithmetic,
                Mode::Memory => memory,
                Mode::Sprites => sprites,
                Mode::Screen => screen,
                Mode::MetricRuler => {
                    ruler.set_scale(Scale::Metric);
                    ruler
                }
                Mode::ImperialRuler => {
                    ruler.set_scale(Scale::Imperial);
                    ruler
                }
            };
            benchmark.run_frame(&mut Frame {
                gfx: &mut *gfx,
                rng,
                buttons,
                crank,
                full_refresh,
            })
        };
        self.previous_mode = Some(mode);

        let region = if mode_changed { DirtyRegion::Full } else { region };
        let (first, last) = region.span();
        gfx.mark_updated_rows(first, last);
        region
    }

    /// Arithmetic benchmark state.
    #[must_use]
    pub fn arithmetic(&self) -> &Arithmetic {
        &self.arithmetic
    }

    /// Memory benchmark state.
    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Sprite benchmark state.
    #[must_use]
    pub fn sprites(&self) -> &Sprites {
        &self.sprites
    }

    /// Partial refresh benchmark state.
    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Mutable partial refresh state, e.g. to turn the sweep strip off.
    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Ruler state shared by both ruler modes.
    #[must_use]
    pub fn ruler(&self) -> &Ruler {
        &self.ruler
    }
}

impl<R: RngCore> core::fmt::Debug for Engine<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("mode", &self.mode)
            .field("previous_mode", &self.previous_mode)
            .field("previous_buttons", &self.previous_buttons)
            .finish_non_exhaustive()
    }
}

/// Render the pause-menu card.
///
/// The card is screen sized and transparent: a light shade over the top,
/// so the paused benchmark shows through, and a white strip at the bottom
/// with the version line.
#[must_use]
pub fn info_card() -> Bitmap {
    let mut card = Bitmap::new(Size::new(LCD_COLUMNS as u32, LCD_ROWS as u32), LcdColor::Clear);
    card.fill_rect(
        Rectangle::new(Point::zero(), Size::new(LCD_COLUMNS as u32, SHADE_HEIGHT)),
        LcdColor::Pattern(Pattern::SHADE),
    );
    card.fill_rect(
        Rectangle::new(
            Point::new(0, SHADE_HEIGHT as i32),
            Size::new(LCD_COLUMNS as u32, LCD_ROWS as u32 - SHADE_HEIGHT),
        ),
        LcdColor::White,
    );
    let _ = Text::with_text_style(VERSION, Point::new(4, 198), character_style(), text_style()).draw(&mut card);
    card
}
