//! Per-frame redraw decisions.
//!
//! Memory LCDs only re-send rows that were marked as updated, so every frame
//! the active mode decides between repainting everything and repainting the
//! few pixels that actually change (the frame-rate counter), and reports
//! exactly one row range to the compositor.

use crate::input::Buttons;
use crate::LCD_ROWS;

/// Whether this frame repaints the whole screen or only what changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Refresh {
    /// Everything is redrawn.
    Full,
    /// Only continuously changing elements are redrawn.
    Incremental,
}

impl Refresh {
    /// Full when forced by the controller (mode switch, reset, button state
    /// change) or when any button is held, incremental otherwise.
    #[must_use]
    pub const fn decide(forced: bool, buttons: Buttons) -> Self {
        if forced || !buttons.is_empty() {
            Self::Full
        } else {
            Self::Incremental
        }
    }

    /// True for [`Refresh::Full`].
    #[must_use]
    pub const fn is_full(self) -> bool {
        matches!(self, Self::Full)
    }
}

/// Rows handed to the compositor at the end of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DirtyRegion {
    /// The whole screen.
    Full,
    /// Inclusive row range `first..=last`.
    Rows {
        /// First updated row.
        first: i32,
        /// Last updated row.
        last: i32,
    },
}

impl DirtyRegion {
    /// Inclusive row range; the bounds are put in order.
    #[must_use]
    pub const fn rows(first: i32, last: i32) -> Self {
        if first <= last {
            Self::Rows { first, last }
        } else {
            Self::Rows {
                first: last,
                last: first,
            }
        }
    }

    /// Inclusive row span this region covers.
    #[must_use]
    pub const fn span(self) -> (i32, i32) {
        match self {
            Self::Full => (0, LCD_ROWS - 1),
            Self::Rows { first, last } => (first, last),
        }
    }

    /// True when the region is the whole screen.
    #[must_use]
    pub const fn is_full(self) -> bool {
        let (first, last) = self.span();
        first <= 0 && last >= LCD_ROWS - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_decision() {
        assert_eq!(Refresh::decide(false, Buttons::new()), Refresh::Incremental);
        assert_eq!(Refresh::decide(true, Buttons::new()), Refresh::Full);
        assert_eq!(Refresh::decide(false, Buttons::LEFT), Refresh::Full);
        assert_eq!(Refresh::decide(false, Buttons::A), Refresh::Full);
        assert!(Refresh::Full.is_full());
        assert!(!Refresh::Incremental.is_full());
    }

    #[test]
    fn test_full_span() {
        assert_eq!(DirtyRegion::Full.span(), (0, LCD_ROWS - 1));
        assert!(DirtyRegion::Full.is_full());
    }

    #[test]
    fn test_rows_ordered() {
        assert_eq!(DirtyRegion::rows(24, 5), DirtyRegion::Rows { first: 5, last: 24 });
        assert_eq!(DirtyRegion::rows(5, 24).span(), (5, 24));
    }

    #[test]
    fn test_rows_covering_everything_count_as_full() {
        assert!(DirtyRegion::rows(0, LCD_ROWS - 1).is_full());
        assert!(!DirtyRegion::rows(5, 184).is_full());
    }
}
