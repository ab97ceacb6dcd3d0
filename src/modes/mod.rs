//! Benchmark modes.
//!
//! Every mode implements [`Benchmark`]: once per frame it runs its workload,
//! draws whatever the redraw decision requires, applies the held buttons and
//! crank to its parameters, and returns the rows it touched.

use rand_core::RngCore;

use crate::counter::ParameterSet;
use crate::dirty::DirtyRegion;
use crate::input::{scale_crank, Buttons};
use crate::status::{highlight, COMBINED_ROW, HELP_ROWS};
use crate::Graphics;

pub mod arithmetic;
pub mod memory;
pub mod ruler;
pub mod screen;
pub mod sprites;
pub mod sweep;

pub use arithmetic::Arithmetic;
pub use memory::Memory;
pub use ruler::{Ruler, RulerBox, Scale};
pub use screen::{RefreshWindow, Screen};
pub use sprites::Sprites;
pub use sweep::SweepStrip;

/// Selectable modes, in menu order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Integer and floating point arithmetic.
    Arithmetic,
    /// Sequential and random memory access.
    Memory,
    /// Animated bitmap sprites.
    Sprites,
    /// Partial screen refresh.
    Screen,
    /// Millimetre grid.
    MetricRuler,
    /// Inch grid.
    ImperialRuler,
}

impl Mode {
    /// Every mode in menu order.
    pub const ALL: [Self; 6] = [
        Self::Arithmetic,
        Self::Memory,
        Self::Sprites,
        Self::Screen,
        Self::MetricRuler,
        Self::ImperialRuler,
    ];

    /// Menu label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Arithmetic => "math",
            Self::Memory => "memory",
            Self::Sprites => "sprites",
            Self::Screen => "screen",
            Self::MetricRuler => "metric ruler",
            Self::ImperialRuler => "imperial ruler",
        }
    }

    /// Mode at a menu index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Mode with the given menu label.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.name() == name)
    }
}

/// Everything a mode gets to see and touch during one frame.
pub struct Frame<'a> {
    /// Screen.
    pub gfx: &'a mut dyn Graphics,
    /// Host random source.
    pub rng: &'a mut dyn RngCore,
    /// Buttons held this frame.
    pub buttons: Buttons,
    /// Crank movement since the previous frame.
    pub crank: i32,
    /// Set by the controller on mode switch, reset, or button change.
    pub full_refresh: bool,
}

/// One benchmark (or ruler) mode.
pub trait Benchmark {
    /// Run one frame and return the rows that must be recomposited.
    fn run_frame(&mut self, frame: &mut Frame<'_>) -> DirtyRegion;

    /// Restore the mode's parameters to their defaults.
    fn reset(&mut self);
}

/// Apply held buttons to a four-knob parameter set.
///
/// Knobs are bound to left, up, right and down in that order. The combined
/// gesture adjusts all four by the same amount. Each adjusted knob's help
/// line is inverted before the change is applied, so holding a button with
/// the crank still just highlights it.
pub(crate) fn adjust_knobs(
    gfx: &mut dyn Graphics,
    buttons: Buttons,
    crank: i32,
    multiplier: i32,
    params: &mut ParameterSet<4>,
) {
    if buttons.is_combined() {
        highlight(gfx, COMBINED_ROW);
    }
    let buttons = buttons.with_combined();
    let delta = scale_crank(crank, multiplier);

    let bindings = [
        buttons.left(),
        buttons.up(),
        buttons.right(),
        buttons.down(),
    ];
    for (index, held) in bindings.into_iter().enumerate() {
        if held {
            highlight(gfx, HELP_ROWS[index]);
            params.adjust(index, delta);
        }
    }
}
