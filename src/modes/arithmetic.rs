//! Arithmetic throughput benchmark.
//!
//! Four counted loops run back to back every frame: integer additions,
//! integer multiplications, float additions and float multiplications.
//! The accumulators go through [`black_box`] on every iteration so the
//! optimizer has to keep each operation.

use core::fmt::Write;
use core::hint::black_box;

use crate::counter::{BoundedCounter, ParameterSet};
use crate::dirty::{DirtyRegion, Refresh};
use crate::modes::{adjust_knobs, Benchmark, Frame};
use crate::status::{draw_panel, panel_region, StatusText};

/// Operations per loop at startup and after reset.
///
/// Zero would make the frame rate too high to read.
pub const DEFAULT_OPERATIONS: i32 = 0x8000;

/// Upper bound for every loop.
pub const MAX_OPERATIONS: i32 = 0xff_ffff;

/// Operations per crank degree.
pub const CRANK_MULTIPLIER: i32 = 100;

/// Knob index of the integer addition count.
pub const INT_ADD: usize = 0;
/// Knob index of the integer multiplication count.
pub const INT_MUL: usize = 1;
/// Knob index of the float addition count.
pub const FLOAT_ADD: usize = 2;
/// Knob index of the float multiplication count.
pub const FLOAT_MUL: usize = 3;

const KNOB: BoundedCounter = BoundedCounter::new(DEFAULT_OPERATIONS, 0, MAX_OPERATIONS);

/// Arithmetic benchmark state.
#[derive(Clone, Debug)]
pub struct Arithmetic {
    params: ParameterSet<4>,
    #[cfg(test)]
    executed: u64,
}

impl Default for Arithmetic {
    fn default() -> Self {
        Self::new()
    }
}

impl Arithmetic {
    /// Create the benchmark with default operation counts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            params: ParameterSet::new(["int-add", "int-mul", "float-add", "float-mul"], [KNOB; 4]),
            #[cfg(test)]
            executed: 0,
        }
    }

    /// Operation counts.
    #[must_use]
    pub fn params(&self) -> &ParameterSet<4> {
        &self.params
    }

    /// Operation counts, for hosts that persist or preset them.
    pub fn params_mut(&mut self) -> &mut ParameterSet<4> {
        &mut self.params
    }

    /// Run every loop once and return the final accumulators.
    pub fn run_workload(&mut self) -> (i32, f32) {
        let mut int_result = 0i32;
        let mut float_result = 0f32;

        for i in 0..self.params.get(INT_ADD) {
            int_result = black_box(int_result).wrapping_add(i);
            #[cfg(test)]
            {
                self.executed += 1;
            }
        }
        for i in 0..self.params.get(INT_MUL) {
            int_result = black_box(int_result).wrapping_mul(i);
            #[cfg(test)]
            {
                self.executed += 1;
            }
        }
        for i in 0..self.params.get(FLOAT_ADD) {
            float_result = black_box(float_result) + i as f32;
            #[cfg(test)]
            {
                self.executed += 1;
            }
        }
        for i in 0..self.params.get(FLOAT_MUL) {
            float_result = black_box(float_result) * i as f32;
            #[cfg(test)]
            {
                self.executed += 1;
            }
        }

        (int_result, float_result)
    }

    /// Full status panel text.
    #[must_use]
    pub fn status_text(&self, fps: f32) -> StatusText {
        let p = &self.params;
        let mut text = StatusText::new();
        let _ = write!(
            text,
            "FPS = {fps:.1}\n\
             int: add = {}, mul = {}\n\
             float: add = {}, mul = {}\n\n\
             left + crank: adjust integer additions\n\
             up + crank: adjust integer multiplications\n\
             right + crank: adjust float additions\n\
             down + crank: adjust float multiplications\n\
             A/B + crank: adjust everything at once",
            p.get(INT_ADD),
            p.get(INT_MUL),
            p.get(FLOAT_ADD),
            p.get(FLOAT_MUL),
        );
        text
    }
}

impl Benchmark for Arithmetic {
    fn run_frame(&mut self, frame: &mut Frame<'_>) -> DirtyRegion {
        let refresh = Refresh::decide(frame.full_refresh, frame.buttons);

        black_box(self.run_workload());

        let text = match refresh {
            Refresh::Full => self.status_text(frame.gfx.fps()),
            Refresh::Incremental => StatusText::new(),
        };
        draw_panel(frame.gfx, refresh, &text);
        adjust_knobs(frame.gfx, frame.buttons, frame.crank, CRANK_MULTIPLIER, &mut self.params);

        panel_region(refresh)
    }

    fn reset(&mut self) {
        self.params.reset();
    }
}
