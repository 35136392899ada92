use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// A flexible length in millipoints: a natural size plus the amounts it
/// may legitimately stretch or shrink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlexMeasure {
    pub natural: i32,
    pub stretch: i32,
    pub shrink: i32,
}

impl FlexMeasure {
    pub fn new(natural: i32, stretch: i32, shrink: i32) -> Self {
        Self {
            natural,
            stretch,
            shrink,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// A rigid measure with no flexibility.
    pub fn from_natural(natural: i32) -> Self {
        Self {
            natural,
            stretch: 0,
            shrink: 0,
        }
    }

    /// Largest length this measure can be stretched to.
    pub fn max_length(self) -> i32 {
        self.natural + self.stretch
    }

    /// Smallest length this measure can be shrunk to.
    pub fn min_length(self) -> i32 {
        self.natural - self.shrink
    }
}

impl Add for FlexMeasure {
    type Output = FlexMeasure;

    fn add(self, rhs: FlexMeasure) -> FlexMeasure {
        FlexMeasure {
            natural: self.natural + rhs.natural,
            stretch: self.stretch + rhs.stretch,
            shrink: self.shrink + rhs.shrink,
        }
    }
}

impl AddAssign for FlexMeasure {
    fn add_assign(&mut self, rhs: FlexMeasure) {
        *self = *self + rhs;
    }
}

impl Sub for FlexMeasure {
    type Output = FlexMeasure;

    fn sub(self, rhs: FlexMeasure) -> FlexMeasure {
        FlexMeasure {
            natural: self.natural - rhs.natural,
            stretch: self.stretch - rhs.stretch,
            shrink: self.shrink - rhs.shrink,
        }
    }
}

impl fmt::Display for FlexMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}-{}", self.natural, self.stretch, self.shrink)
    }
}
