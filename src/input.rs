//! Button bitmask and per-frame input snapshot.

use bitfield::bitfield;

bitfield! {
    /// Held, pushed or released buttons.
    ///
    /// The bit layout matches the host's button word:
    /// - Bit 5: A
    /// - Bit 4: B
    /// - Bit 3: Down
    /// - Bit 2: Up
    /// - Bit 1: Right
    /// - Bit 0: Left
    ///
    /// Either A or B is the "adjust everything" gesture.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct Buttons(u8);
    impl Debug;
    /// A button.
    pub a, set_a: 5;
    /// B button.
    pub b, set_b: 4;
    /// Down on the d-pad.
    pub down, set_down: 3;
    /// Up on the d-pad.
    pub up, set_up: 2;
    /// Right on the d-pad.
    pub right, set_right: 1;
    /// Left on the d-pad.
    pub left, set_left: 0;
}

impl Buttons {
    /// Left on the d-pad.
    pub const LEFT: Self = Self(1);
    /// Right on the d-pad.
    pub const RIGHT: Self = Self(1 << 1);
    /// Up on the d-pad.
    pub const UP: Self = Self(1 << 2);
    /// Down on the d-pad.
    pub const DOWN: Self = Self(1 << 3);
    /// The B button.
    pub const B: Self = Self(1 << 4);
    /// The A button.
    pub const A: Self = Self(1 << 5);
    /// All four directions.
    pub const DIRECTIONS: Self = Self(0b1111);
    /// Either action button.
    pub const COMBINED: Self = Self(0b11_0000);

    /// No buttons.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Build from the host's raw button word; unknown bits are dropped.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b11_1111)
    }

    /// Raw button word.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True when no button is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when any button of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Buttons set in either.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True when the combined "adjust everything" gesture is held.
    #[must_use]
    pub const fn is_combined(self) -> bool {
        self.intersects(Self::COMBINED)
    }

    /// Treat the combined gesture as all four directions held at once.
    #[must_use]
    pub const fn with_combined(self) -> Self {
        if self.is_combined() {
            self.union(Self::DIRECTIONS)
        } else {
            self
        }
    }
}

impl core::ops::BitOr for Buttons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Buttons {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Buttons({=u8:#08b})", self.0);
    }
}

/// Button snapshot for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonState {
    /// Buttons currently held.
    pub current: Buttons,
    /// Buttons that went down since the last frame.
    pub pushed: Buttons,
    /// Buttons that went up since the last frame.
    pub released: Buttons,
}

impl ButtonState {
    /// Snapshot with `current` held and no edges.
    #[must_use]
    pub const fn held(current: Buttons) -> Self {
        Self {
            current,
            pushed: Buttons::new(),
            released: Buttons::new(),
        }
    }
}

/// Scale a raw crank delta by a mode's adjustment granularity.
#[must_use]
pub const fn scale_crank(delta: i32, multiplier: i32) -> i32 {
    delta.saturating_mul(multiplier)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::format;

    use super::*;

    #[test]
    fn test_bit_layout() {
        assert_eq!(Buttons::LEFT.bits(), 1);
        assert_eq!(Buttons::RIGHT.bits(), 2);
        assert_eq!(Buttons::UP.bits(), 4);
        assert_eq!(Buttons::DOWN.bits(), 8);
        assert_eq!(Buttons::B.bits(), 16);
        assert_eq!(Buttons::A.bits(), 32);
    }

    #[test]
    fn test_accessors() {
        let buttons = Buttons::LEFT | Buttons::A;
        assert!(buttons.left());
        assert!(buttons.a());
        assert!(!buttons.right());
        assert!(!buttons.b());

        let mut buttons = Buttons::new();
        buttons.set_down(true);
        assert_eq!(buttons, Buttons::DOWN);
    }

    #[test]
    fn test_from_bits_masks_unknown() {
        assert_eq!(Buttons::from_bits(0xff).bits(), 0b11_1111);
        assert!(Buttons::from_bits(0b1100_0000).is_empty());
    }

    #[test]
    fn test_combined_expands_to_all_directions() {
        for action in [Buttons::A, Buttons::B] {
            let expanded = action.with_combined();
            assert!(expanded.left() && expanded.right() && expanded.up() && expanded.down());
            assert!(expanded.is_combined());
        }
        assert_eq!(Buttons::UP.with_combined(), Buttons::UP);
        assert_eq!(Buttons::new().with_combined(), Buttons::new());
    }

    #[test]
    fn test_held_state() {
        let state = ButtonState::held(Buttons::RIGHT);
        assert_eq!(state.current, Buttons::RIGHT);
        assert!(state.pushed.is_empty());
        assert!(state.released.is_empty());
    }

    #[test]
    fn test_scale_crank() {
        assert_eq!(scale_crank(3, 100), 300);
        assert_eq!(scale_crank(-2, 256), -512);
        assert_eq!(scale_crank(0, 256), 0);
        assert_eq!(scale_crank(i32::MAX, 2), i32::MAX);
        assert_eq!(scale_crank(i32::MIN, 2), i32::MIN);
    }

    #[test]
    fn test_accessors_follow_bit_layout() {
        assert!(Buttons::LEFT.left() && !Buttons::LEFT.right());
        assert!(Buttons::RIGHT.right());
        assert!(Buttons::UP.up());
        assert!(Buttons::DOWN.down());
        assert!(Buttons::B.b() && !Buttons::B.a());
        assert!(Buttons::A.a());

        let mut buttons = Buttons::new();
        buttons.set_down(true);
        buttons.set_a(true);
        assert_eq!(buttons, Buttons::DOWN | Buttons::A);
        buttons.set_a(false);
        assert_eq!(buttons, Buttons::DOWN);
    }

    #[test]
    fn test_debug_output() {
        let debug = format!("{:?}", Buttons::UP);
        assert!(debug.contains("up: true"));
        assert!(debug.contains("down: false"));
    }
}
