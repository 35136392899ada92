use folio_elements::{Element, FlexMeasure};

/// Running totals for one in-progress layout at a given level: the
/// flexible length consumed so far and the index of the part currently
/// being filled.
///
/// Totals only ever grow; the engine never resets them in place.
/// A break instead forks a fresh candidate carrying the totals recorded
/// at the break point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub total: FlexMeasure,
    pub part: u32,
}

impl Progress {
    /// Progress of the root candidate: nothing consumed, first part.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(total: FlexMeasure, part: u32) -> Self {
        Self { total, part }
    }

    /// Folds one element into the running totals. Penalty lengths are
    /// not accumulated here; they count only when a break is taken.
    pub fn absorb(&mut self, element: &Element) {
        match element {
            Element::Box { length } => self.total.natural += length,
            Element::Glue(g) => self.total += *g,
            Element::Penalty { .. } => {}
        }
    }
}
