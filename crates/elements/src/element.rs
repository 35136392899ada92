use crate::measure::FlexMeasure;
use serde::{Deserialize, Serialize};

/// Penalty values at or above this sentinel mark an illegal break point;
/// values at or below its negation force the break.
pub const INFINITE_PENALTY: i32 = 1000;

/// Kind of structural break a penalty asks for, ordered by precedence:
/// when two break opportunities coincide the stronger class wins.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum BreakClass {
    #[default]
    Auto,
    Column,
    Page,
    EvenPage,
    OddPage,
}

impl BreakClass {
    /// Combines two classes, keeping the one with the stronger effect.
    pub fn combine(self, other: BreakClass) -> BreakClass {
        self.max(other)
    }
}

impl TryFrom<i32> for BreakClass {
    type Error = i32;

    /// Converts a raw break-class code. Out-of-range codes are returned
    /// as the error so callers can surface a structural error instead of
    /// silently accepting the penalty.
    fn try_from(code: i32) -> Result<Self, i32> {
        match code {
            0 => Ok(BreakClass::Auto),
            1 => Ok(BreakClass::Column),
            2 => Ok(BreakClass::Page),
            3 => Ok(BreakClass::EvenPage),
            4 => Ok(BreakClass::OddPage),
            other => Err(other),
        }
    }
}

/// One node of a breakable element stream. Immutable once created.
///
/// A break is legal only at a glue directly preceded by a box, or at a
/// penalty whose value is below [`INFINITE_PENALTY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Element {
    /// Fixed-size, unbreakable content.
    Box { length: i32 },
    /// Breakable whitespace with stretch and shrink limits.
    Glue(FlexMeasure),
    /// An explicit break opportunity, possibly illegal or forced.
    /// `length` is consumed only when the break is actually taken (e.g.
    /// a hyphen, or the rule before a deferred block). Flagged penalties
    /// mark hyphenation points and may be ignored by the driver.
    Penalty {
        length: i32,
        value: i32,
        class: BreakClass,
        flagged: bool,
    },
}

impl Element {
    pub fn glue(natural: i32, stretch: i32, shrink: i32) -> Element {
        Element::Glue(FlexMeasure::new(natural, stretch, shrink))
    }

    /// A plain, unflagged penalty with automatic break class.
    pub fn penalty(length: i32, value: i32) -> Element {
        Element::Penalty {
            length,
            value,
            class: BreakClass::Auto,
            flagged: false,
        }
    }

    /// A penalty that forces a break.
    pub fn forced_break(length: i32) -> Element {
        Element::penalty(length, -INFINITE_PENALTY)
    }

    pub fn is_box(&self) -> bool {
        matches!(self, Element::Box { .. })
    }

    pub fn is_glue(&self) -> bool {
        matches!(self, Element::Glue(_))
    }

    pub fn is_penalty(&self) -> bool {
        matches!(self, Element::Penalty { .. })
    }

    /// Natural length of this element. For penalties this is the length
    /// consumed only when the break is taken.
    pub fn length(&self) -> i32 {
        match self {
            Element::Box { length } => *length,
            Element::Glue(g) => g.natural,
            Element::Penalty { length, .. } => *length,
        }
    }

    pub fn is_forced_break(&self) -> bool {
        matches!(self, Element::Penalty { value, .. } if *value <= -INFINITE_PENALTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_break_detection() {
        assert!(Element::forced_break(0).is_forced_break());
        assert!(!Element::penalty(0, 0).is_forced_break());
        assert!(!Element::penalty(0, INFINITE_PENALTY).is_forced_break());
        assert!(!Element::Box { length: 100 }.is_forced_break());
    }

    #[test]
    fn test_break_class_precedence() {
        assert_eq!(
            BreakClass::Auto.combine(BreakClass::Page),
            BreakClass::Page
        );
        assert_eq!(
            BreakClass::EvenPage.combine(BreakClass::Column),
            BreakClass::EvenPage
        );
    }

    #[test]
    fn test_break_class_from_code() {
        assert_eq!(BreakClass::try_from(2), Ok(BreakClass::Page));
        assert_eq!(BreakClass::try_from(9), Err(9));
    }
}
