//! Bounded workload knobs.
//!
//! Every benchmark parameter is an integer confined to a closed range.
//! Adjustments saturate at the bounds; nothing here ever fails.

/// Integer that stays within `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoundedCounter {
    value: i32,
    default: i32,
    min: i32,
    max: i32,
}

impl BoundedCounter {
    /// Create a counter holding `default`.
    ///
    /// `default` is clamped into range, and `max` is raised to `min` if the
    /// bounds are given in the wrong order.
    #[must_use]
    pub const fn new(default: i32, min: i32, max: i32) -> Self {
        let max = if max < min { min } else { max };
        let default = clamp(default, min, max);
        Self {
            value: default,
            default,
            min,
            max,
        }
    }

    /// Current value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.value
    }

    /// Current value as an element count.
    #[must_use]
    pub const fn count(&self) -> usize {
        if self.value < 0 {
            0
        } else {
            self.value as usize
        }
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> i32 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// Value restored by [`reset`](Self::reset).
    #[must_use]
    pub const fn default_value(&self) -> i32 {
        self.default
    }

    /// Add `delta`, saturating at the bounds, and return the new value.
    pub fn adjust(&mut self, delta: i32) -> i32 {
        self.value = clamp(self.value.saturating_add(delta), self.min, self.max);
        self.value
    }

    /// Restore the default value.
    pub fn reset(&mut self) {
        self.value = self.default;
    }
}

const fn clamp(value: i32, min: i32, max: i32) -> i32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// One mode's ordered set of named counters.
///
/// The order is the order in which the counters are bound to the left, up,
/// right and down buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParameterSet<const N: usize> {
    names: [&'static str; N],
    counters: [BoundedCounter; N],
}

impl<const N: usize> ParameterSet<N> {
    /// Group counters under their names.
    #[must_use]
    pub const fn new(names: [&'static str; N], counters: [BoundedCounter; N]) -> Self {
        Self { names, counters }
    }

    /// Counter at `index`.
    ///
    /// # Panics
    /// If `index >= N`.
    #[must_use]
    pub fn counter(&self, index: usize) -> &BoundedCounter {
        &self.counters[index]
    }

    /// Value of the counter at `index`.
    ///
    /// # Panics
    /// If `index >= N`.
    #[must_use]
    pub fn get(&self, index: usize) -> i32 {
        self.counters[index].get()
    }

    /// Counter names in binding order.
    #[must_use]
    pub fn names(&self) -> &[&'static str; N] {
        &self.names
    }

    /// Adjust the counter at `index`.
    ///
    /// # Panics
    /// If `index >= N`.
    pub fn adjust(&mut self, index: usize, delta: i32) -> i32 {
        self.counters[index].adjust(delta)
    }

    /// Overwrite the counter at `index`, saturating at its bounds.
    ///
    /// # Panics
    /// If `index >= N`.
    pub fn set(&mut self, index: usize, value: i32) -> i32 {
        let counter = &mut self.counters[index];
        counter.value = clamp(value, counter.min, counter.max);
        counter.value
    }

    /// Restore every counter to its default.
    pub fn reset(&mut self) {
        for counter in &mut self.counters {
            counter.reset();
        }
    }

    /// Iterate `(name, counter)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &BoundedCounter)> {
        self.names.iter().copied().zip(self.counters.iter())
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for ParameterSet<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ParameterSet {{");
        for (name, counter) in self.iter() {
            defmt::write!(f, " {=str}: {}", name, counter.get());
        }
        defmt::write!(f, " }}");
    }
}
