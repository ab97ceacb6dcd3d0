//! Memory access benchmark.
//!
//! Sequential writes and reads walk the front of one preallocated word
//! buffer. Random writes and reads pick indices with the [`Lcg`] reduced by
//! the current random access count, so the touched span grows with the
//! knob. The generator state survives across frames: all frames together
//! trace one long reproducible access pattern.

use alloc::boxed::Box;
use alloc::vec;
use core::fmt::Write;
use core::hint::black_box;

use crate::counter::{BoundedCounter, ParameterSet};
use crate::dirty::{DirtyRegion, Refresh};
use crate::lcg::Lcg;
use crate::modes::{adjust_knobs, Benchmark, Frame};
use crate::status::{draw_panel, panel_region, StatusText};

/// Accesses per loop at startup and after reset.
pub const DEFAULT_ACCESSES: i32 = 0x2000;

/// Size of the word buffer, and the upper bound for every loop.
pub const MAX_WORDS: usize = 0x20_0000;

/// Words per crank degree.
pub const CRANK_MULTIPLIER: i32 = 256;

/// Initial generator state.
pub const INITIAL_SEED: u32 = 1;

/// Knob index of the sequential write count.
pub const SEQ_WRITE: usize = 0;
/// Knob index of the sequential read count.
pub const SEQ_READ: usize = 1;
/// Knob index of the random write count.
pub const RAND_WRITE: usize = 2;
/// Knob index of the random read count.
pub const RAND_READ: usize = 3;

const WORD_BYTES: usize = core::mem::size_of::<i32>();

const KNOB: BoundedCounter = BoundedCounter::new(DEFAULT_ACCESSES, 0, MAX_WORDS as i32);

/// Memory benchmark state.
#[derive(Clone)]
pub struct Memory {
    params: ParameterSet<4>,
    words: Box<[i32]>,
    lcg: Lcg,
    #[cfg(test)]
    executed: u64,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Allocate the word buffer and start with default access counts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            params: ParameterSet::new(["seq-write", "seq-read", "rand-write", "rand-read"], [KNOB; 4]),
            words: vec![0; MAX_WORDS].into_boxed_slice(),
            lcg: Lcg::new(INITIAL_SEED),
            #[cfg(test)]
            executed: 0,
        }
    }

    /// Access counts, in words.
    #[must_use]
    pub fn params(&self) -> &ParameterSet<4> {
        &self.params
    }

    /// Access counts, for hosts that persist or preset them.
    pub fn params_mut(&mut self) -> &mut ParameterSet<4> {
        &mut self.params
    }

    /// Generator state carried into the next frame.
    #[must_use]
    pub fn seed(&self) -> u32 {
        self.lcg.seed()
    }

    /// Run every access loop once.
    ///
    /// The last value read is folded into the generator state, which keeps
    /// the reads observable.
    pub fn run_workload(&mut self) {
        let mut read_result = 0i32;

        for i in 0..self.params.counter(SEQ_WRITE).count() {
            *black_box(&mut self.words[i]) = i as i32;
            #[cfg(test)]
            {
                self.executed += 1;
            }
        }
        for i in 0..self.params.counter(SEQ_READ).count() {
            read_result = *black_box(&self.words[i]);
            #[cfg(test)]
            {
                self.executed += 1;
            }
        }

        let mut lcg = self.lcg;
        let rand_write = self.params.counter(RAND_WRITE).count();
        if rand_write > 0 {
            for i in 0..rand_write {
                let index = lcg.below(rand_write as u32) as usize;
                *black_box(&mut self.words[index]) = i as i32;
                #[cfg(test)]
                {
                    self.executed += 1;
                }
            }
        }
        let rand_read = self.params.counter(RAND_READ).count();
        if rand_read > 0 {
            for _ in 0..rand_read {
                let index = lcg.below(rand_read as u32) as usize;
                read_result = *black_box(&self.words[index]);
                #[cfg(test)]
                {
                    self.executed += 1;
                }
            }
        }

        lcg.fold((read_result & 1) as u32);
        self.lcg = lcg;
    }

    /// Full status panel text. Counts are shown in bytes.
    #[must_use]
    pub fn status_text(&self, fps: f32) -> StatusText {
        let bytes = |index| self.params.counter(index).count() * WORD_BYTES;
        let mut text = StatusText::new();
        let _ = write!(
            text,
            "FPS = {fps:.1}\n\
             sequential: write = {}, read = {}\n\
             random: write = {}, read = {}\n\n\
             left + crank: adjust sequential writes\n\
             up + crank: adjust sequential reads\n\
             right + crank: adjust random writes\n\
             down + crank: adjust random reads\n\
             A/B + crank: adjust everything at once",
            bytes(SEQ_WRITE),
            bytes(SEQ_READ),
            bytes(RAND_WRITE),
            bytes(RAND_READ),
        );
        text
    }
}

impl Benchmark for Memory {
    fn run_frame(&mut self, frame: &mut Frame<'_>) -> DirtyRegion {
        let refresh = Refresh::decide(frame.full_refresh, frame.buttons);

        self.run_workload();

        let text = match refresh {
            Refresh::Full => self.status_text(frame.gfx.fps()),
            Refresh::Incremental => StatusText::new(),
        };
        draw_panel(frame.gfx, refresh, &text);
        adjust_knobs(frame.gfx, frame.buttons, frame.crank, CRANK_MULTIPLIER, &mut self.params);

        panel_region(refresh)
    }

    /// Restores the access counts. The generator keeps its state.
    fn reset(&mut self) {
        self.params.reset();
    }
}

impl core::fmt::Debug for Memory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Memory")
            .field("params", &self.params)
            .field("words", &self.words.len())
            .field("lcg", &self.lcg)
            .finish_non_exhaustive()
    }
}
